//! Bulk directory import.

#![allow(clippy::unwrap_used)]

mod support;

use std::sync::Arc;

use devportal::config::{ImportConfig, PortalConfig};
use devportal::domain::ports::{RemoteOrg, RemoteUser};
use devportal::infra::storage::repos::IdentityUsersRepo;
use devportal::Portal;
use devportal_sdk::{PageRequest, TaskKind, TaskState};
use sea_orm::DatabaseConnection;
use support::{test_db, FakeProvider};

fn directory(org_count: usize, users_per_org: usize) -> FakeProvider {
    let mut provider = FakeProvider::default();
    for o in 0..org_count {
        let org_id = format!("org-{o}");
        provider.orgs.push(RemoteOrg {
            provider_org_id: org_id.clone(),
            name: Some(format!("Org {o}")),
        });
        let users = (0..users_per_org)
            .map(|u| RemoteUser {
                provider_user_id: format!("{org_id}-user-{u}"),
                email: format!("user{u}@{org_id}.test"),
                display_name: None,
            })
            .collect();
        provider.users_by_org.insert(org_id, users);
    }
    provider
}

async fn import_portal(
    provider: FakeProvider,
    page_size: u64,
) -> (Portal, DatabaseConnection) {
    let db = test_db().await;
    let config = PortalConfig {
        import: ImportConfig { page_size },
        ..PortalConfig::default()
    };
    (Portal::new(db.clone(), &config, Arc::new(provider)), db)
}

#[tokio::test]
async fn import_walks_multiple_pages_and_completes() {
    // 3 orgs with 5 users each against a page size of 2 forces several
    // pages in both walks.
    let (portal, db) = import_portal(directory(3, 5), 2).await;

    let task = portal.tasks.create(TaskKind::UserImport, "test").await.unwrap();
    portal.import.run(task.id).await.unwrap();

    let task = portal.tasks.get(task.id).await.unwrap();
    assert_eq!(task.state, TaskState::Completed);
    assert_eq!(task.message.as_deref(), Some("import finished"));

    let tenants = portal.tenants.list(PageRequest::default()).await.unwrap();
    assert_eq!(tenants.total, 3);
    let (_, user_total) = IdentityUsersRepo::list(&db, &Default::default()).await.unwrap();
    assert_eq!(user_total, 15);
}

#[tokio::test]
async fn import_is_idempotent_across_runs() {
    let (portal, db) = import_portal(directory(2, 3), 10).await;

    let first = portal.tasks.create(TaskKind::UserImport, "test").await.unwrap();
    portal.import.run(first.id).await.unwrap();
    let second = portal.tasks.create(TaskKind::UserImport, "test").await.unwrap();
    portal.import.run(second.id).await.unwrap();

    let tenants = portal.tenants.list(PageRequest::default()).await.unwrap();
    assert_eq!(tenants.total, 2);
    let (_, user_total) = IdentityUsersRepo::list(&db, &Default::default()).await.unwrap();
    assert_eq!(user_total, 6);
    assert_eq!(
        portal.tasks.get(second.id).await.unwrap().state,
        TaskState::Completed
    );
}

#[tokio::test]
async fn provider_failure_marks_the_task_failed() {
    let mut provider = directory(1, 2);
    provider.fail_users = true;
    let (portal, _db) = import_portal(provider, 10).await;

    let task = portal.tasks.create(TaskKind::UserImport, "test").await.unwrap();
    portal.import.run(task.id).await.unwrap();

    let task = portal.tasks.get(task.id).await.unwrap();
    assert_eq!(task.state, TaskState::Failed);
    assert!(task.message.unwrap().contains("directory unavailable"));
}

#[tokio::test]
async fn task_listing_is_paginated() {
    let (portal, _db) = import_portal(FakeProvider::default(), 10).await;
    for _ in 0..3 {
        portal.tasks.create(TaskKind::UserImport, "test").await.unwrap();
    }

    let page = portal
        .tasks
        .list(Some(TaskKind::UserImport), PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
    for task in &page.items {
        assert_eq!(task.state, TaskState::Pending);
    }
}
