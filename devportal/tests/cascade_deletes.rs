//! Ordered cascade deletion through the service layer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use devportal::domain::error::DomainError;
use devportal::infra::storage::repos::{
    BindingsRepo, DevicesRepo, IdentityUsersRepo, SharesRepo, TenantsRepo,
};
use devportal_sdk::{PortalAction, PortalActivityFilter};
use support::{admin_actor, seed_user, test_portal};
use uuid::Uuid;

#[tokio::test]
async fn deleting_a_binding_takes_its_shares_along() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();
    let share = SharesRepo::create(&db, binding.id, recipient, "test")
        .await
        .unwrap();

    portal
        .bindings
        .delete(&admin_actor(&db).await, binding.id)
        .await
        .unwrap();

    assert!(BindingsRepo::by_id(&db, binding.id).await.unwrap().is_none());
    assert!(SharesRepo::by_id(&db, share.id).await.unwrap().is_none());
    // Parents are untouched.
    assert!(DevicesRepo::by_id(&db, device.id).await.unwrap().is_some());
    assert!(IdentityUsersRepo::by_id(&db, owner).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_missing_binding_is_not_found() {
    let (portal, db) = test_portal().await;
    let err = portal
        .bindings
        .delete(&admin_actor(&db).await, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_a_device_removes_every_binding_and_share() {
    let (portal, db) = test_portal().await;
    let owner_a = seed_user(&db, "a@corp.test", None).await;
    let owner_b = seed_user(&db, "b@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner_a))
        .await
        .unwrap();
    let binding_a = BindingsRepo::create(&db, device.id, owner_a, "a".into(), "test")
        .await
        .unwrap();
    let binding_b = BindingsRepo::create(&db, device.id, owner_b, "b".into(), "test")
        .await
        .unwrap();
    let share = SharesRepo::create(&db, binding_a.id, recipient, "test")
        .await
        .unwrap();

    portal
        .devices
        .delete(&admin_actor(&db).await, device.id)
        .await
        .unwrap();

    assert!(DevicesRepo::by_id(&db, device.id).await.unwrap().is_none());
    assert!(BindingsRepo::by_id(&db, binding_a.id).await.unwrap().is_none());
    assert!(BindingsRepo::by_id(&db, binding_b.id).await.unwrap().is_none());
    assert!(SharesRepo::by_id(&db, share.id).await.unwrap().is_none());
    // Owners survive their bindings.
    assert!(IdentityUsersRepo::by_id(&db, owner_a).await.unwrap().is_some());
    assert!(IdentityUsersRepo::by_id(&db, owner_b).await.unwrap().is_some());
}

#[tokio::test]
async fn device_deletion_log_survives_with_the_reference_cleared() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "a@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let actor = admin_actor(&db).await;

    portal.devices.delete(&actor, device.id).await.unwrap();

    let log = portal
        .activity
        .list_portal(&actor, PortalActivityFilter::default())
        .await
        .unwrap();
    let entry = log
        .items
        .iter()
        .find(|e| e.action == PortalAction::Delete && e.endpoint == "/devices")
        .expect("delete entry recorded");
    // The row points at a deleted device: reference cleared, not cascaded.
    assert_eq!(entry.device_id, None);
    // And at the portal user who performed the deletion.
    assert_eq!(entry.portal_user_id, Some(actor.portal_user_id));
}

#[tokio::test]
async fn deleting_a_user_keeps_their_registered_devices() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "a@corp.test", None).await;
    let other_owner = seed_user(&db, "b@corp.test", None).await;
    let recipient_share_owner = seed_user(&db, "c@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(user))
        .await
        .unwrap();
    let owned = BindingsRepo::create(&db, device.id, user, "a".into(), "test")
        .await
        .unwrap();
    let owned_share = SharesRepo::create(&db, owned.id, other_owner, "test")
        .await
        .unwrap();
    // A share the user merely receives.
    let foreign = BindingsRepo::create(&db, device.id, recipient_share_owner, "c".into(), "test")
        .await
        .unwrap();
    let received = SharesRepo::create(&db, foreign.id, user, "test")
        .await
        .unwrap();

    portal.users.delete(&admin_actor(&db).await, user).await.unwrap();

    assert!(IdentityUsersRepo::by_id(&db, user).await.unwrap().is_none());
    assert!(BindingsRepo::by_id(&db, owned.id).await.unwrap().is_none());
    assert!(SharesRepo::by_id(&db, owned_share.id).await.unwrap().is_none());
    assert!(SharesRepo::by_id(&db, received.id).await.unwrap().is_none());
    // The foreign binding and the device stay; registered_by is cleared.
    assert!(BindingsRepo::by_id(&db, foreign.id).await.unwrap().is_some());
    let device = DevicesRepo::by_id(&db, device.id).await.unwrap().unwrap();
    assert_eq!(device.registered_by, None);
}

#[tokio::test]
async fn deleting_a_tenant_takes_users_and_their_devices_whole() {
    let (portal, db) = test_portal().await;
    let tenant = TenantsRepo::create(&db, "org-1".into(), Some("Org".into()), "test")
        .await
        .unwrap();
    let member = seed_user(&db, "member@org.test", Some(tenant.id)).await;
    let outsider = seed_user(&db, "outsider@other.test", None).await;

    // The member registered a device that an outsider also uses.
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(member))
        .await
        .unwrap();
    let member_binding = BindingsRepo::create(&db, device.id, member, "m".into(), "test")
        .await
        .unwrap();
    let outsider_binding = BindingsRepo::create(&db, device.id, outsider, "o".into(), "test")
        .await
        .unwrap();
    let share = SharesRepo::create(&db, outsider_binding.id, member, "test")
        .await
        .unwrap();

    portal
        .tenants
        .delete(&admin_actor(&db).await, tenant.id)
        .await
        .unwrap();

    assert!(TenantsRepo::by_id(&db, tenant.id).await.unwrap().is_none());
    assert!(IdentityUsersRepo::by_id(&db, member).await.unwrap().is_none());
    // The device goes down whole, outsider binding included.
    assert!(DevicesRepo::by_id(&db, device.id).await.unwrap().is_none());
    assert!(
        BindingsRepo::by_id(&db, member_binding.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        BindingsRepo::by_id(&db, outsider_binding.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(SharesRepo::by_id(&db, share.id).await.unwrap().is_none());
    // The outsider themselves survive.
    assert!(IdentityUsersRepo::by_id(&db, outsider).await.unwrap().is_some());
}

#[tokio::test]
async fn missing_targets_leave_everything_unchanged() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "a@corp.test", None).await;
    let actor = admin_actor(&db).await;

    assert!(matches!(
        portal.devices.delete(&actor, Uuid::now_v7()).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        portal.users.delete(&actor, Uuid::now_v7()).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        portal.tenants.delete(&actor, Uuid::now_v7()).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(IdentityUsersRepo::by_id(&db, user).await.unwrap().is_some());
}
