//! End-user authentication and the shared-email resolver.

use std::sync::Arc;

use devportal_sdk::{DeviceActivityKind, Session};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::IdentityProvider;
use crate::domain::service::bindings::ensure_binding;
use crate::domain::SELF_ACTOR;
use crate::infra::auth::password;
use crate::infra::auth::tokens::TokenIssuer;
use crate::infra::storage::entity::identity_user;
use crate::infra::storage::repos::{
    ActivityRepo, BindingsRepo, DevicesRepo, IdentityUsersRepo, NewIdentityUser, SharesRepo,
    TenantsRepo,
};

pub struct AuthService {
    db: DatabaseConnection,
    provider: Arc<dyn IdentityProvider>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(
        db: DatabaseConnection,
        provider: Arc<dyn IdentityProvider>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            db,
            provider,
            tokens,
        }
    }

    /// Emails the requester is entitled to see for a device login:
    /// their own first when they own the (device, username) binding,
    /// then the owner's when that owner shared the login with them.
    ///
    /// An unknown device resolves to an empty list, never an error.
    /// The candidate binding is looked up by username alone, not scoped
    /// to the device; with the same device-local username on two
    /// devices this picks an arbitrary one.
    #[instrument(skip(self))]
    pub async fn resolve_shared_emails(
        &self,
        user_id: Uuid,
        user_email: &str,
        device_external_id: &str,
        device_username: &str,
    ) -> Result<Vec<String>, DomainError> {
        let mut emails = Vec::new();

        let Some(device) = DevicesRepo::by_external_id(&self.db, device_external_id).await? else {
            return Ok(emails);
        };

        let own =
            BindingsRepo::find_exact(&self.db, device.id, user_id, device_username).await?;
        if own.is_some() {
            emails.push(user_email.to_owned());
        }

        let candidate = BindingsRepo::by_username_global(&self.db, device_username).await?;
        if let Some(binding) = candidate {
            if binding.identity_user_id != user_id
                && SharesRepo::find_pair(&self.db, binding.id, user_id)
                    .await?
                    .is_some()
            {
                if let Some(owner) =
                    IdentityUsersRepo::by_id(&self.db, binding.identity_user_id).await?
                {
                    if !emails.contains(&owner.email) {
                        emails.push(owner.email);
                    }
                }
            }
        }

        debug!(count = emails.len(), "resolved shared emails");
        Ok(emails)
    }

    /// Verify credentials against the identity provider and mirror the
    /// user locally on first success, attaching the tenant when the
    /// provider's organization is known here.
    #[instrument(skip(self, password))]
    pub async fn password_login(
        &self,
        email: &str,
        password: &str,
        device_external_id: &str,
        device_username: &str,
    ) -> Result<Session, DomainError> {
        let verified = self
            .provider
            .verify_credentials(email, password)
            .await
            .map_err(|e| DomainError::upstream(e.to_string()))?
            .ok_or_else(|| DomainError::unauthorized("invalid credentials"))?;

        let user = match IdentityUsersRepo::by_email(&self.db, email).await? {
            Some(user) => user,
            None => {
                let tenant_id = match &verified.provider_org_id {
                    Some(org_id) => TenantsRepo::by_provider_org_id(&self.db, org_id)
                        .await?
                        .map(|t| t.id),
                    None => None,
                };
                let user = IdentityUsersRepo::create(
                    &self.db,
                    NewIdentityUser {
                        email: email.to_owned(),
                        provider_user_id: Some(verified.provider_user_id),
                        tenant_id,
                        name: verified.display_name,
                        created_by: SELF_ACTOR.to_owned(),
                    },
                )
                .await?;
                info!(user_id = %user.id, "mirrored identity user on first login");
                user
            }
        };

        self.session(&user, device_external_id, device_username)
            .await
    }

    /// Log in with the locally stored PIN. Unauthorized when no PIN is
    /// set or it does not match; which of the two is never disclosed
    /// beyond the message.
    #[instrument(skip(self, pin))]
    pub async fn pin_login(
        &self,
        email: &str,
        pin: &str,
        device_external_id: &str,
        device_username: &str,
    ) -> Result<Session, DomainError> {
        let user = IdentityUsersRepo::by_email(&self.db, email).await?;
        let Some(user) = user else {
            return Err(DomainError::unauthorized("PIN not set"));
        };
        let Some(pin_hash) = user.pin_hash.as_deref() else {
            return Err(DomainError::unauthorized("PIN not set"));
        };
        if !password::verify_secret(pin, pin_hash) {
            return Err(DomainError::unauthorized("invalid PIN"));
        }

        self.session(&user, device_external_id, device_username)
            .await
    }

    #[instrument(skip(self, new_pin))]
    pub async fn set_pin(
        &self,
        user_id: Uuid,
        new_pin: &str,
        device_external_id: &str,
        device_username: &str,
    ) -> Result<Session, DomainError> {
        let user = IdentityUsersRepo::by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity user", user_id))?;

        let hash = password::hash_secret(new_pin)?;
        let user =
            IdentityUsersRepo::set_pin_hash(&self.db, user, hash, &user_id.to_string()).await?;

        self.session(&user, device_external_id, device_username)
            .await
    }

    /// Register a device connection: the device is created on first
    /// sight, the (device, user, username) binding when absent. A fresh
    /// binding logs `device_created`, a repeat logs `device_added`.
    #[instrument(skip(self))]
    pub async fn connect_device(
        &self,
        user_id: Uuid,
        device_external_id: &str,
        device_name: Option<String>,
        device_username: &str,
    ) -> Result<Session, DomainError> {
        let user = IdentityUsersRepo::by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity user", user_id))?;

        let txn = self.db.begin().await?;

        let device = match DevicesRepo::by_external_id(&txn, device_external_id).await? {
            Some(device) => device,
            None => {
                DevicesRepo::create(
                    &txn,
                    device_external_id.to_owned(),
                    device_name,
                    Some(user.id),
                )
                .await?
            }
        };

        let (binding, created) =
            ensure_binding(&txn, device.id, user.id, device_username, &user.id.to_string())
                .await?;
        let kind = if created {
            DeviceActivityKind::DeviceCreated
        } else {
            DeviceActivityKind::DeviceAdded
        };

        ActivityRepo::insert_device(
            &txn,
            Some(user.id),
            Some(device.id),
            Some(binding.id),
            None,
            kind,
            &user.id.to_string(),
        )
        .await?;

        txn.commit().await?;
        info!(device_id = %device.id, binding_id = %binding.id, created, "device connected");

        self.session(&user, device_external_id, device_username)
            .await
    }

    async fn session(
        &self,
        user: &identity_user::Model,
        device_external_id: &str,
        device_username: &str,
    ) -> Result<Session, DomainError> {
        let token = self.tokens.issue_user(user.id, &user.email)?;
        let emails = self
            .resolve_shared_emails(user.id, &user.email, device_external_id, device_username)
            .await?;
        Ok(Session {
            token,
            pin_set: user.pin_hash.is_some(),
            emails,
        })
    }
}
