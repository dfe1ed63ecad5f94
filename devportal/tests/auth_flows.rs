//! End-user and portal authentication flows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use devportal::domain::error::DomainError;
use devportal::domain::service::CreatePortalUser;
use devportal::infra::storage::repos::{IdentityUsersRepo, PortalUsersRepo, TenantsRepo};
use devportal_sdk::{DeviceActivityFilter, DeviceActivityKind, Role};
use support::{admin_actor, seed_user, test_portal, test_portal_with, FakeProvider};
use uuid::Uuid;

#[tokio::test]
async fn password_login_mirrors_the_user_and_attaches_the_tenant() {
    let provider = FakeProvider::with_credentials("alice@corp.test", "hunter2", Some("org-1"));
    let (portal, db) = test_portal_with(provider).await;
    let tenant = TenantsRepo::create(&db, "org-1".into(), None, "test").await.unwrap();

    let session = portal
        .auth
        .password_login("alice@corp.test", "hunter2", "dev-1", "alice")
        .await
        .unwrap();

    assert!(!session.pin_set);
    let claims = portal.tokens.verify(&session.token).unwrap();
    assert_eq!(claims.email, "alice@corp.test");
    assert!(claims.role.is_none());

    let user = IdentityUsersRepo::by_email(&db, "alice@corp.test")
        .await
        .unwrap()
        .expect("user mirrored locally");
    assert_eq!(user.tenant_id, Some(tenant.id));

    // A second login reuses the mirror.
    portal
        .auth
        .password_login("alice@corp.test", "hunter2", "dev-1", "alice")
        .await
        .unwrap();
    let page = IdentityUsersRepo::list(&db, &Default::default()).await.unwrap();
    assert_eq!(page.1, 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let provider = FakeProvider::with_credentials("alice@corp.test", "hunter2", None);
    let (portal, _db) = test_portal_with(provider).await;

    let err = portal
        .auth
        .password_login("alice@corp.test", "wrong", "dev-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized { .. }));
}

#[tokio::test]
async fn pin_flow_set_then_login() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "alice@corp.test", None).await;

    // No PIN yet.
    let err = portal
        .auth
        .pin_login("alice@corp.test", "1234", "dev-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized { .. }));

    let session = portal.auth.set_pin(user, "1234", "dev-1", "alice").await.unwrap();
    assert!(session.pin_set);

    let session = portal
        .auth
        .pin_login("alice@corp.test", "1234", "dev-1", "alice")
        .await
        .unwrap();
    assert!(session.pin_set);

    let err = portal
        .auth
        .pin_login("alice@corp.test", "9999", "dev-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized { .. }));

    // The stored value is a hash, never the PIN itself.
    let stored = IdentityUsersRepo::by_id(&db, user).await.unwrap().unwrap();
    assert_ne!(stored.pin_hash.as_deref(), Some("1234"));
}

#[tokio::test]
async fn connect_device_is_idempotent_and_logged() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "alice@corp.test", None).await;
    let actor = admin_actor(&db).await;

    portal
        .auth
        .connect_device(user, "dev-1", Some("Laptop".into()), "alice")
        .await
        .unwrap();
    portal
        .auth
        .connect_device(user, "dev-1", None, "alice")
        .await
        .unwrap();

    let log = portal
        .activity
        .list_device(&actor, DeviceActivityFilter::default())
        .await
        .unwrap();
    let kinds: Vec<_> = log.items.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&DeviceActivityKind::DeviceCreated));
    assert!(kinds.contains(&DeviceActivityKind::DeviceAdded));
    assert_eq!(log.total, 2);
}

#[tokio::test]
async fn portal_user_lifecycle() {
    let (portal, db) = test_portal().await;
    let actor = admin_actor(&db).await;

    let created = portal
        .portal_users
        .create(
            &actor,
            CreatePortalUser {
                email: "ops@portal.test".into(),
                name: Some("Ops".into()),
                password: "s3cret".into(),
                role: Some(Role::Admin),
                tenant_id: None,
            },
        )
        .await
        .unwrap();
    assert!(created.active);

    // The password is stored hashed.
    let stored = PortalUsersRepo::by_id(&db, created.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "s3cret");

    // Duplicate email is a conflict.
    let err = portal
        .portal_users
        .create(
            &actor,
            CreatePortalUser {
                email: "ops@portal.test".into(),
                name: None,
                password: "other".into(),
                role: None,
                tenant_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let session = portal
        .portal_users
        .login("ops@portal.test", "s3cret")
        .await
        .unwrap();
    assert_eq!(session.role, Role::Admin);
    let claims = portal.tokens.verify(&session.token).unwrap();
    claims.require_admin().unwrap();
    let portal_actor = claims.portal_actor().unwrap();
    assert_eq!(portal_actor.portal_user_id, created.id);

    // Deactivation keeps the row but blocks login.
    portal.portal_users.deactivate(&actor, created.id).await.unwrap();
    let after = portal.portal_users.get(created.id).await.unwrap();
    assert!(!after.active);
    let err = portal
        .portal_users
        .login("ops@portal.test", "s3cret")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized { .. }));
}

#[tokio::test]
async fn portal_user_update_checks_email_conflicts() {
    let (portal, db) = test_portal().await;
    let actor = admin_actor(&db).await;

    let first = portal
        .portal_users
        .create(
            &actor,
            CreatePortalUser {
                email: "one@portal.test".into(),
                name: None,
                password: "pw-one".into(),
                role: None,
                tenant_id: None,
            },
        )
        .await
        .unwrap();
    let second = portal
        .portal_users
        .create(
            &actor,
            CreatePortalUser {
                email: "two@portal.test".into(),
                name: None,
                password: "pw-two".into(),
                role: None,
                tenant_id: None,
            },
        )
        .await
        .unwrap();

    let err = portal
        .portal_users
        .update(
            &actor,
            second.id,
            devportal::domain::service::UpdatePortalUser {
                email: Some("one@portal.test".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    // Keeping your own email is not a conflict.
    let updated = portal
        .portal_users
        .update(
            &actor,
            first.id,
            devportal::domain::service::UpdatePortalUser {
                email: Some("one@portal.test".into()),
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn set_pin_for_unknown_user_is_not_found() {
    let (portal, _db) = test_portal().await;
    let err = portal
        .auth
        .set_pin(Uuid::now_v7(), "1234", "dev-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
