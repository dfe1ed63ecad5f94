//! Identity users mirrored from the external provider.

use devportal_sdk::{ActivityRefs, IdentityUser, IdentityUserFilter, Page, PortalAction};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{cascade, clamp_tenant, Actor};
use crate::domain::SYSTEM_ACTOR;
use crate::infra::storage::repos::{ActivityRepo, IdentityUsersRepo, NewIdentityUser};

pub struct IdentityUsersService {
    db: DatabaseConnection,
}

impl IdentityUsersService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mirror a provider user locally, keyed by its provider user id.
    /// An already-mirrored user is returned unchanged.
    #[instrument(skip(self))]
    pub async fn create_if_absent(
        &self,
        provider_user_id: &str,
        email: &str,
        name: Option<String>,
        tenant_id: Option<Uuid>,
    ) -> Result<IdentityUser, DomainError> {
        if let Some(existing) =
            IdentityUsersRepo::by_provider_user_id(&self.db, provider_user_id).await?
        {
            return Ok(IdentityUser::from(existing));
        }
        let created = IdentityUsersRepo::create(
            &self.db,
            NewIdentityUser {
                email: email.to_owned(),
                provider_user_id: Some(provider_user_id.to_owned()),
                tenant_id,
                name,
                created_by: SYSTEM_ACTOR.to_owned(),
            },
        )
        .await?;
        Ok(IdentityUser::from(created))
    }

    pub async fn get(&self, user_id: Uuid) -> Result<IdentityUser, DomainError> {
        IdentityUsersRepo::by_id(&self.db, user_id)
            .await?
            .map(IdentityUser::from)
            .ok_or_else(|| DomainError::not_found("identity user", user_id))
    }

    #[instrument(skip(self, actor))]
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: IdentityUserFilter,
    ) -> Result<Page<IdentityUser>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (items, total) = IdentityUsersRepo::list(&self.db, &filter).await?;
        Ok(Page {
            items: items.into_iter().map(IdentityUser::from).collect(),
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }

    /// Delete a user, their received shares and their owned bindings
    /// (with the shares on those), in one transaction with the log
    /// entry. Devices they registered survive.
    #[instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, user_id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let user = IdentityUsersRepo::by_id(&txn, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity user", user_id))?;

        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/identity-users",
            PortalAction::Delete,
            ActivityRefs {
                identity_user_id: Some(user.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        cascade::delete_user_tree(&txn, user.id).await?;
        txn.commit().await?;
        info!(%user_id, "identity user deleted");
        Ok(())
    }
}
