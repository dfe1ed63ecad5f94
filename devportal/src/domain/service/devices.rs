//! Device listing, renaming and cascade deletion.

use devportal_sdk::{ActivityRefs, Device, DeviceFilter, Page, PortalAction};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{cascade, clamp_tenant, Actor};
use crate::infra::storage::mapper::device_with_count;
use crate::infra::storage::repos::{ActivityRepo, BindingsRepo, DevicesRepo};

pub struct DevicesService {
    db: DatabaseConnection,
}

impl DevicesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, device_id: Uuid) -> Result<Device, DomainError> {
        let device = DevicesRepo::by_id(&self.db, device_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device", device_id))?;
        let count = BindingsRepo::count_for_device(&self.db, device.id).await?;
        Ok(device_with_count(device, count))
    }

    #[instrument(skip(self, actor))]
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: DeviceFilter,
    ) -> Result<Page<Device>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (models, total) = DevicesRepo::list(&self.db, &filter).await?;
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            let count = BindingsRepo::count_for_device(&self.db, model.id).await?;
            items.push(device_with_count(model, count));
        }
        Ok(Page {
            items,
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }

    #[instrument(skip(self, actor))]
    pub async fn rename(
        &self,
        actor: &Actor,
        device_id: Uuid,
        name: String,
    ) -> Result<Device, DomainError> {
        let device = DevicesRepo::by_id(&self.db, device_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device", device_id))?;

        let device =
            DevicesRepo::rename(&self.db, device, name, actor.portal_user_id).await?;

        ActivityRepo::insert_portal(
            &self.db,
            Some(actor.portal_user_id),
            "/devices",
            PortalAction::Update,
            ActivityRefs {
                device_id: Some(device.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        let count = BindingsRepo::count_for_device(&self.db, device.id).await?;
        Ok(device_with_count(device, count))
    }

    /// Delete a device with every binding and share hanging off it,
    /// logging the removal in the same transaction.
    #[instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, device_id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let device = DevicesRepo::by_id(&txn, device_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device", device_id))?;

        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/devices",
            PortalAction::Delete,
            ActivityRefs {
                device_id: Some(device.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        cascade::delete_device_tree(&txn, device.id).await?;
        txn.commit().await?;
        info!(%device_id, "device deleted");
        Ok(())
    }
}
