//! Device-login bindings.

use devportal_sdk::{ActivityRefs, BindingFilter, DeviceBinding, Page, PortalAction};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::{cascade, clamp_tenant, Actor};
use crate::infra::storage::entity::device_binding;
use crate::infra::storage::repos::{ActivityRepo, BindingsRepo};

/// The binding for (device, owner, username), created when absent.
/// There is no storage-level uniqueness on the triple; this
/// lookup-before-insert is the only duplicate guard.
pub(crate) async fn ensure_binding<C: ConnectionTrait>(
    conn: &C,
    device_id: Uuid,
    identity_user_id: Uuid,
    device_username: &str,
    actor: &str,
) -> Result<(device_binding::Model, bool), DbErr> {
    if let Some(existing) =
        BindingsRepo::find_exact(conn, device_id, identity_user_id, device_username).await?
    {
        return Ok((existing, false));
    }
    let created = BindingsRepo::create(
        conn,
        device_id,
        identity_user_id,
        device_username.to_owned(),
        actor,
    )
    .await?;
    Ok((created, true))
}

pub struct BindingsService {
    db: DatabaseConnection,
}

impl BindingsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, actor))]
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: BindingFilter,
    ) -> Result<Page<DeviceBinding>, DomainError> {
        clamp_tenant(&mut filter.tenant_id, actor);
        let (items, total) = BindingsRepo::list(&self.db, &filter).await?;
        Ok(Page {
            items: items.into_iter().map(DeviceBinding::from).collect(),
            total,
            page: filter.page.page,
            size: filter.page.size,
        })
    }

    /// Delete a binding together with its shares, logging the removal
    /// in the same transaction.
    #[instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, binding_id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let binding = BindingsRepo::by_id(&txn, binding_id)
            .await?
            .ok_or_else(|| DomainError::not_found("device binding", binding_id))?;

        ActivityRepo::insert_portal(
            &txn,
            Some(actor.portal_user_id),
            "/bindings",
            PortalAction::Delete,
            ActivityRefs {
                identity_user_id: Some(binding.identity_user_id),
                device_id: Some(binding.device_id),
                binding_id: Some(binding.id),
                ..Default::default()
            },
            &actor.audit_id(),
        )
        .await?;

        cascade::delete_binding_tree(&txn, binding.id).await?;
        txn.commit().await?;
        info!(%binding_id, "binding deleted");
        Ok(())
    }
}
