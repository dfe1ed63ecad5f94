//! Tenants mirrored from the external provider's organizations.

use devportal_sdk::{ActivityRefs, Page, PageRequest, PortalAction, Tenant};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{cascade, Actor};
use crate::domain::SYSTEM_ACTOR;
use crate::infra::storage::repos::{ActivityRepo, TenantsRepo};

pub struct TenantsService {
    db: DatabaseConnection,
}

impl TenantsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mirror a provider organization locally, keyed by its provider
    /// org id. An already-mirrored tenant is returned unchanged.
    #[instrument(skip(self))]
    pub async fn create_if_absent(
        &self,
        provider_org_id: &str,
        name: Option<String>,
    ) -> Result<Tenant, DomainError> {
        if let Some(existing) = TenantsRepo::by_provider_org_id(&self.db, provider_org_id).await? {
            return Ok(Tenant::from(existing));
        }
        let created = TenantsRepo::create(
            &self.db,
            provider_org_id.to_owned(),
            name,
            SYSTEM_ACTOR,
        )
        .await?;
        Ok(Tenant::from(created))
    }

    pub async fn get(&self, tenant_id: Uuid) -> Result<Tenant, DomainError> {
        TenantsRepo::by_id(&self.db, tenant_id)
            .await?
            .map(Tenant::from)
            .ok_or_else(|| DomainError::not_found("tenant", tenant_id))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Tenant>, DomainError> {
        let (items, total) = TenantsRepo::list(&self.db, page).await?;
        Ok(Page {
            items: items.into_iter().map(Tenant::from).collect(),
            total,
            page: page.page,
            size: page.size,
        })
    }

    /// Delete a tenant and everything reachable from its users: their
    /// shares and bindings, and every device they registered (with that
    /// device's bindings from any owner). One transaction with the log.
    #[instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, tenant_id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let tenant = TenantsRepo::by_id(&txn, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("tenant", tenant_id))?;

        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/tenants",
            PortalAction::Delete,
            ActivityRefs {
                tenant_id: Some(tenant.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        cascade::delete_tenant_tree(&txn, tenant.id).await?;
        txn.commit().await?;
        info!(%tenant_id, "tenant deleted");
        Ok(())
    }
}
