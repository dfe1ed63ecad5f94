//! Sharing a device login with another identity user.

use devportal_sdk::{ActivityRefs, Page, PortalAction, Share, ShareFilter};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{clamp_tenant, Actor};
use crate::infra::storage::repos::{
    ActivityRepo, BindingsRepo, DevicesRepo, IdentityUsersRepo, SharesRepo,
};

pub struct SharesService {
    db: DatabaseConnection,
}

impl SharesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Grant a recipient visibility of a binding owner's email. At most
    /// one share per (binding, recipient); a repeat is a conflict.
    #[instrument(skip(self, actor))]
    pub async fn create(
        &self,
        actor: &Actor,
        device_id: Uuid,
        binding_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Share, DomainError> {
        if SharesRepo::find_pair(&self.db, binding_id, recipient_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("share already exists"));
        }

        DevicesRepo::by_id(&self.db, device_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device", device_id))?;
        let binding = BindingsRepo::by_id(&self.db, binding_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device binding", binding_id))?;
        let recipient = IdentityUsersRepo::by_id(&self.db, recipient_id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity user", recipient_id))?;

        let txn = self.db.begin().await?;
        let share =
            SharesRepo::create(&txn, binding.id, recipient.id, &actor.audit_id()).await?;
        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/shares",
            PortalAction::Create,
            ActivityRefs {
                identity_user_id: Some(recipient.id),
                binding_id: Some(binding.id),
                share_id: Some(share.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;
        txn.commit().await?;

        info!(share_id = %share.id, "share created");
        Ok(Share::from(share))
    }

    #[instrument(skip(self, actor))]
    pub async fn remove(&self, actor: &Actor, share_id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let share = SharesRepo::by_id(&txn, share_id)
            .await?
            .ok_or_else(|| DomainError::not_found("share", share_id))?;

        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/shares",
            PortalAction::Delete,
            ActivityRefs {
                identity_user_id: Some(share.recipient_id),
                binding_id: Some(share.binding_id),
                share_id: Some(share.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        SharesRepo::delete_by_id(&txn, share.id).await?;
        txn.commit().await?;
        info!(%share_id, "share removed");
        Ok(())
    }

    #[instrument(skip(self, actor))]
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: ShareFilter,
    ) -> Result<Page<Share>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (items, total) = SharesRepo::list(&self.db, &filter).await?;
        Ok(Page {
            items: items.into_iter().map(Share::from).collect(),
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }
}
