//! Behavior of the shared-email resolver.

#![allow(clippy::unwrap_used)]

mod support;

use devportal::infra::storage::repos::{BindingsRepo, DevicesRepo, SharesRepo};
use support::{seed_user, test_portal};

#[tokio::test]
async fn unknown_device_resolves_to_empty() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "alice@corp.test", None).await;

    let emails = portal
        .auth
        .resolve_shared_emails(user, "alice@corp.test", "never-seen", "alice")
        .await
        .unwrap();

    assert!(emails.is_empty());
}

#[tokio::test]
async fn owner_sees_their_own_email_first() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "alice@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(user))
        .await
        .unwrap();
    BindingsRepo::create(&db, device.id, user, "alice".into(), "test")
        .await
        .unwrap();

    let emails = portal
        .auth
        .resolve_shared_emails(user, "alice@corp.test", "dev-1", "alice")
        .await
        .unwrap();

    assert_eq!(emails, vec!["alice@corp.test".to_string()]);
}

#[tokio::test]
async fn shared_binding_surfaces_the_owners_email() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();
    SharesRepo::create(&db, binding.id, recipient, "test")
        .await
        .unwrap();

    let emails = portal
        .auth
        .resolve_shared_emails(recipient, "guest@corp.test", "dev-1", "owner")
        .await
        .unwrap();

    assert_eq!(emails, vec!["owner@corp.test".to_string()]);
}

#[tokio::test]
async fn without_a_share_the_owner_stays_hidden() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let stranger = seed_user(&db, "stranger@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(owner))
        .await
        .unwrap();
    BindingsRepo::create(&db, device.id, owner, "owner".into(), "test")
        .await
        .unwrap();

    let emails = portal
        .auth
        .resolve_shared_emails(stranger, "stranger@corp.test", "dev-1", "owner")
        .await
        .unwrap();

    assert!(emails.is_empty());
}

#[tokio::test]
async fn owning_the_only_matching_binding_yields_just_self() {
    let (portal, db) = test_portal().await;
    let user = seed_user(&db, "alice@corp.test", None).await;
    let other = seed_user(&db, "other@corp.test", None).await;
    let device = DevicesRepo::create(&db, "dev-1".into(), None, Some(user))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, device.id, user, "alice".into(), "test")
        .await
        .unwrap();
    // A share on the user's own binding must not echo their email twice.
    SharesRepo::create(&db, binding.id, other, "test").await.unwrap();

    let emails = portal
        .auth
        .resolve_shared_emails(user, "alice@corp.test", "dev-1", "alice")
        .await
        .unwrap();

    assert_eq!(emails, vec!["alice@corp.test".to_string()]);
}

// The candidate binding is looked up by username alone, not scoped to
// the requested device. A share against a binding on a different device
// therefore still resolves, as long as the requested device exists.
#[tokio::test]
async fn username_lookup_crosses_devices() {
    let (portal, db) = test_portal().await;
    let owner = seed_user(&db, "owner@corp.test", None).await;
    let recipient = seed_user(&db, "guest@corp.test", None).await;
    let queried = DevicesRepo::create(&db, "dev-a".into(), None, None)
        .await
        .unwrap();
    let other_device = DevicesRepo::create(&db, "dev-b".into(), None, Some(owner))
        .await
        .unwrap();
    let binding = BindingsRepo::create(&db, other_device.id, owner, "bob".into(), "test")
        .await
        .unwrap();
    SharesRepo::create(&db, binding.id, recipient, "test")
        .await
        .unwrap();

    let emails = portal
        .auth
        .resolve_shared_emails(recipient, "guest@corp.test", &queried.external_id, "bob")
        .await
        .unwrap();

    assert_eq!(emails, vec!["owner@corp.test".to_string()]);
}
