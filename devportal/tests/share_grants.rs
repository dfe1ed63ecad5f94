//! Creating and revoking share grants.

#![allow(clippy::unwrap_used)]

mod support;

use devportal::domain::error::DomainError;
use devportal::infra::storage::repos::{BindingsRepo, DevicesRepo, SharesRepo};
use devportal_sdk::ShareFilter;
use support::{admin_actor, seed_user, test_portal};
use uuid::Uuid;

#[tokio::test]
async fn duplicate_share_is_a_conflict_with_no_second_row() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();
    let actor = admin_actor(&db).await;

    portal
        .shares
        .create(&actor, device.id, binding.id, recipient)
        .await
        .unwrap();
    let err = portal
        .shares
        .create(&actor, device.id, binding.id, recipient)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let page = portal
        .shares
        .list(&actor, ShareFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn share_creation_verifies_every_participant() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();
    let actor = admin_actor(&db).await;

    for err in [
        portal
            .shares
            .create(&actor, Uuid::now_v7(), binding.id, recipient)
            .await
            .unwrap_err(),
        portal
            .shares
            .create(&actor, device.id, Uuid::now_v7(), recipient)
            .await
            .unwrap_err(),
        portal
            .shares
            .create(&actor, device.id, binding.id, Uuid::now_v7())
            .await
            .unwrap_err(),
    ] {
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

#[tokio::test]
async fn removing_a_share_leaves_the_binding_alone() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();
    let actor = admin_actor(&db).await;

    let share = portal
        .shares
        .create(&actor, device.id, binding.id, recipient)
        .await
        .unwrap();
    portal.shares.remove(&actor, share.id).await.unwrap();

    assert!(SharesRepo::by_id(&db, share.id).await.unwrap().is_none());
    assert!(BindingsRepo::by_id(&db, binding.id).await.unwrap().is_some());

    let err = portal.shares.remove(&actor, share.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
