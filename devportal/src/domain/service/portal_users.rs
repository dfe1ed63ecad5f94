//! Portal principals: login, lifecycle and listing.

use std::sync::Arc;

use devportal_sdk::{
    ActivityRefs, Page, PortalAction, PortalSession, PortalUser, PortalUserFilter, Role,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::Actor;
use crate::infra::auth::password;
use crate::infra::auth::tokens::TokenIssuer;
use crate::infra::storage::repos::{
    ActivityRepo, NewPortalUser, PortalUserChanges, PortalUsersRepo,
};

/// Attributes for a new portal principal. The role falls back to the
/// configured default when unset.
#[derive(Debug, Clone)]
pub struct CreatePortalUser {
    pub email: String,
    pub name: Option<String>,
    pub password: SecretString,
    pub role: Option<Role>,
    pub tenant_id: Option<Uuid>,
}

/// Partial update; unset fields keep their value. `active` can only
/// reactivate here, deactivation goes through its own operation.
#[derive(Debug, Clone, Default)]
pub struct UpdatePortalUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<SecretString>,
    pub tenant_id: Option<Uuid>,
    pub reactivate: bool,
}

pub struct PortalUsersService {
    db: DatabaseConnection,
    tokens: Arc<TokenIssuer>,
    default_role: Role,
}

impl PortalUsersService {
    pub fn new(db: DatabaseConnection, tokens: Arc<TokenIssuer>, default_role: Role) -> Self {
        Self {
            db,
            tokens,
            default_role,
        }
    }

    /// Validate portal credentials against the active principals only;
    /// a deactivated row is indistinguishable from a missing one.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<PortalSession, DomainError> {
        let user = PortalUsersRepo::active_by_email(&self.db, email).await?;
        let Some(user) = user else {
            warn!("portal login rejected");
            return Err(DomainError::unauthorized("invalid credentials"));
        };
        if !password::verify_secret(password, &user.password_hash) {
            warn!("portal login rejected");
            return Err(DomainError::unauthorized("invalid credentials"));
        }

        let user = PortalUser::try_from(user)?;
        let token = self
            .tokens
            .issue_portal(user.id, &user.email, user.role, user.tenant_id)?;
        Ok(PortalSession {
            token,
            role: user.role,
            tenant_id: user.tenant_id,
            user,
        })
    }

    #[instrument(skip(self, actor, req), fields(email = %req.email))]
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreatePortalUser,
    ) -> Result<PortalUser, DomainError> {
        if PortalUsersRepo::by_email(&self.db, &req.email).await?.is_some() {
            return Err(DomainError::conflict("portal user already exists"));
        }

        let password_hash = password::hash_secret(req.password.expose_secret())?;
        let txn = self.db.begin().await?;
        let created = PortalUsersRepo::create(
            &txn,
            NewPortalUser {
                email: req.email,
                name: req.name,
                password_hash,
                role: req.role.unwrap_or(self.default_role),
                tenant_id: req.tenant_id,
                created_by: actor.audit_id(),
            },
        )
        .await?;
        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/portal-users",
            PortalAction::Create,
            ActivityRefs::default(),
            &actor.audit_id(),
        )
        .await?;
        txn.commit().await?;

        info!(portal_user_id = %created.id, "portal user created");
        PortalUser::try_from(created)
    }

    #[instrument(skip(self, actor, req))]
    pub async fn update(
        &self,
        actor: &Actor,
        portal_user_id: Uuid,
        req: UpdatePortalUser,
    ) -> Result<PortalUser, DomainError> {
        let user = PortalUsersRepo::by_id(&self.db, portal_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("portal user", portal_user_id))?;

        if let Some(email) = &req.email {
            let holder = PortalUsersRepo::by_email(&self.db, email).await?;
            if holder.is_some_and(|other| other.id != user.id) {
                return Err(DomainError::conflict("email already in use"));
            }
        }

        let password_hash = match &req.password {
            Some(secret) => Some(password::hash_secret(secret.expose_secret())?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let updated = PortalUsersRepo::apply(
            &txn,
            user,
            PortalUserChanges {
                email: req.email,
                name: req.name,
                password_hash,
                tenant_id: req.tenant_id,
                active: req.reactivate.then_some(true),
            },
            &actor.audit_id(),
        )
        .await?;
        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/portal-users",
            PortalAction::Update,
            ActivityRefs::default(),
            &actor.audit_id(),
        )
        .await?;
        txn.commit().await?;

        PortalUser::try_from(updated)
    }

    /// Soft delete: the row stays for audit history but can no longer
    /// log in.
    #[instrument(skip(self, actor))]
    pub async fn deactivate(
        &self,
        actor: &Actor,
        portal_user_id: Uuid,
    ) -> Result<(), DomainError> {
        let user = PortalUsersRepo::by_id(&self.db, portal_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("portal user", portal_user_id))?;

        let txn = self.db.begin().await?;
        PortalUsersRepo::apply(
            &txn,
            user,
            PortalUserChanges {
                active: Some(false),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;
        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/portal-users",
            PortalAction::Delete,
            ActivityRefs::default(),
            &actor.audit_id(),
        )
        .await?;
        txn.commit().await?;

        info!(%portal_user_id, "portal user deactivated");
        Ok(())
    }

    pub async fn get(&self, portal_user_id: Uuid) -> Result<PortalUser, DomainError> {
        let user = PortalUsersRepo::by_id(&self.db, portal_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("portal user", portal_user_id))?;
        PortalUser::try_from(user)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: PortalUserFilter) -> Result<Page<PortalUser>, DomainError> {
        let (models, total) = PortalUsersRepo::list(&self.db, &filter).await?;
        let items = models
            .into_iter()
            .map(PortalUser::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }
}
