#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use devportal::config::PortalConfig;
use devportal::domain::ports::{
    IdentityProvider, ProviderError, RemoteOrg, RemoteUser, VerifiedIdentity,
};
use devportal::domain::service::Actor;
use devportal::infra::storage::db;
use devportal::infra::storage::repos::{
    IdentityUsersRepo, NewIdentityUser, NewPortalUser, PortalUsersRepo,
};
use devportal::Portal;
use devportal_sdk::Role;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub async fn test_db() -> DatabaseConnection {
    db::connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database with migrations")
}

pub async fn test_portal() -> (Portal, DatabaseConnection) {
    test_portal_with(FakeProvider::default()).await
}

pub async fn test_portal_with(provider: FakeProvider) -> (Portal, DatabaseConnection) {
    let db = test_db().await;
    let portal = Portal::new(db.clone(), &PortalConfig::default(), Arc::new(provider));
    (portal, db)
}

pub async fn admin_actor(db: &DatabaseConnection) -> Actor {
    seed_actor(db, Role::Admin, None).await
}

pub async fn manager_actor(db: &DatabaseConnection, tenant_id: Uuid) -> Actor {
    seed_actor(db, Role::TenantManager, Some(tenant_id)).await
}

/// Actors must exist as portal users: activity rows written by service
/// mutations reference `portal_user_id` with a real foreign key.
async fn seed_actor(db: &DatabaseConnection, role: Role, tenant_id: Option<Uuid>) -> Actor {
    let email = format!("{role}-{}@portal.test", Uuid::now_v7());
    let user = PortalUsersRepo::create(
        db,
        NewPortalUser {
            email: email.clone(),
            name: None,
            password_hash: "unused".to_owned(),
            role,
            tenant_id,
            created_by: "test".to_owned(),
        },
    )
    .await
    .expect("seed portal user");
    Actor {
        portal_user_id: user.id,
        email,
        role,
        tenant_id,
    }
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, tenant_id: Option<Uuid>) -> Uuid {
    let user = IdentityUsersRepo::create(
        db,
        NewIdentityUser {
            email: email.to_owned(),
            provider_user_id: Some(format!("prov-{email}")),
            tenant_id,
            name: None,
            created_by: "test".to_owned(),
        },
    )
    .await
    .expect("seed identity user");
    user.id
}

/// In-memory identity provider with paginated directory listings and a
/// switch to simulate an upstream outage.
#[derive(Default)]
pub struct FakeProvider {
    /// email -> (password, identity returned on success)
    pub credentials: HashMap<String, (String, VerifiedIdentity)>,
    pub orgs: Vec<RemoteOrg>,
    /// provider_org_id -> users
    pub users_by_org: HashMap<String, Vec<RemoteUser>>,
    pub fail_users: bool,
}

impl FakeProvider {
    pub fn with_credentials(email: &str, password: &str, org_id: Option<&str>) -> Self {
        let mut provider = Self::default();
        provider.credentials.insert(
            email.to_owned(),
            (
                password.to_owned(),
                VerifiedIdentity {
                    provider_user_id: format!("prov-{email}"),
                    provider_org_id: org_id.map(str::to_owned),
                    display_name: Some("Test User".to_owned()),
                    email: email.to_owned(),
                },
            ),
        );
        provider
    }
}

fn page<T: Clone>(items: &[T], offset: u64, limit: u64) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<VerifiedIdentity>, ProviderError> {
        Ok(self
            .credentials
            .get(email)
            .filter(|(expected, _)| expected == password)
            .map(|(_, identity)| identity.clone()))
    }

    async fn organizations(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RemoteOrg>, ProviderError> {
        Ok(page(&self.orgs, offset, limit))
    }

    async fn users(
        &self,
        provider_org_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RemoteUser>, ProviderError> {
        if self.fail_users {
            return Err(ProviderError("directory unavailable".to_owned()));
        }
        let users = self
            .users_by_org
            .get(provider_org_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(page(users, offset, limit))
    }
}
