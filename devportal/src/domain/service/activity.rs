//! Activity log reads and the device-side log write.

use devportal_sdk::{
    DeviceActivity, DeviceActivityFilter, DeviceActivityKind, Page, PortalActivity,
    PortalActivityFilter,
};
use sea_orm::DatabaseConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{clamp_tenant, Actor};
use crate::infra::storage::repos::{
    ActivityRepo, BindingsRepo, DevicesRepo, IdentityUsersRepo,
};

pub struct ActivityService {
    db: DatabaseConnection,
}

impl ActivityService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a device-side action reported by a logged-in user. The
    /// binding is resolved by username alone, matching the resolver's
    /// lookup, and may be absent.
    #[instrument(skip(self))]
    pub async fn record_device(
        &self,
        user_id: Uuid,
        device_external_id: &str,
        device_username: &str,
        login_as: Option<String>,
        kind: DeviceActivityKind,
    ) -> Result<DeviceActivity, DomainError> {
        let user = IdentityUsersRepo::by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity user", user_id))?;
        let device = DevicesRepo::by_external_id(&self.db, device_external_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device", device_external_id))?;
        let binding = BindingsRepo::by_username_global(&self.db, device_username).await?;

        let row = ActivityRepo::insert_device(
            &self.db,
            Some(user.id),
            Some(device.id),
            binding.map(|b| b.id),
            login_as,
            kind,
            &user.id.to_string(),
        )
        .await?;
        DeviceActivity::try_from(row)
    }

    #[instrument(skip(self, actor))]
    pub async fn list_device(
        &self,
        actor: &Actor,
        mut filter: DeviceActivityFilter,
    ) -> Result<Page<DeviceActivity>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (models, total) = ActivityRepo::list_device(&self.db, &filter).await?;
        let items = models
            .into_iter()
            .map(DeviceActivity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }

    #[instrument(skip(self, actor))]
    pub async fn list_portal(
        &self,
        actor: &Actor,
        mut filter: PortalActivityFilter,
    ) -> Result<Page<PortalActivity>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (models, total) = ActivityRepo::list_portal(&self.db, &filter).await?;
        let items = models
            .into_iter()
            .map(PortalActivity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }
}
