//! Ordered deletion routines, children before parents.
//!
//! Foreign keys on hard references are RESTRICT, so the order here is
//! load-bearing. Callers run these inside a transaction together with
//! the activity-log insert; any failure rolls the whole unit back.

use sea_orm::{ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::infra::storage::repos::{
    BindingsRepo, DevicesRepo, IdentityUsersRepo, SharesRepo, TenantsRepo,
};

/// Shares of the binding, then the binding itself.
pub(crate) async fn delete_binding_tree<C: ConnectionTrait>(
    conn: &C,
    binding_id: Uuid,
) -> Result<(), DbErr> {
    SharesRepo::delete_for_binding(conn, binding_id).await?;
    BindingsRepo::delete_by_id(conn, binding_id).await
}

/// Every binding of the device (with its shares), then the device.
pub(crate) async fn delete_device_tree<C: ConnectionTrait>(
    conn: &C,
    device_id: Uuid,
) -> Result<(), DbErr> {
    for binding in BindingsRepo::all_for_device(conn, device_id).await? {
        delete_binding_tree(conn, binding.id).await?;
    }
    DevicesRepo::delete_by_id(conn, device_id).await
}

/// Shares received by the user, the user's own bindings (with their
/// shares), then the user. Devices the user registered survive with
/// `registered_by` cleared.
pub(crate) async fn delete_user_tree<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<(), DbErr> {
    SharesRepo::delete_for_recipient(conn, user_id).await?;
    for binding in BindingsRepo::all_for_owner(conn, user_id).await? {
        delete_binding_tree(conn, binding.id).await?;
    }
    IdentityUsersRepo::delete_by_id(conn, user_id).await
}

/// Per tenant user: received shares, owned bindings, then every device
/// the user registered goes down whole (its bindings from any owner
/// included), then the user. The tenant row goes last.
pub(crate) async fn delete_tenant_tree<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
) -> Result<(), DbErr> {
    for user in IdentityUsersRepo::all_in_tenant(conn, tenant_id).await? {
        SharesRepo::delete_for_recipient(conn, user.id).await?;
        for binding in BindingsRepo::all_for_owner(conn, user.id).await? {
            delete_binding_tree(conn, binding.id).await?;
        }
        // Devices must go before the user: deleting the user first would
        // clear registered_by and orphan them instead.
        for device in DevicesRepo::all_registered_by(conn, user.id).await? {
            delete_device_tree(conn, device.id).await?;
        }
        IdentityUsersRepo::delete_by_id(conn, user.id).await?;
    }
    TenantsRepo::delete_by_id(conn, tenant_id).await
}
