//! Service surface: one service per aggregate, all stateless over a
//! shared connection. Portal mutations take an [`Actor`] for audit and
//! tenant scoping; role enforcement happens at token verification.

use devportal_sdk::Role;
use uuid::Uuid;

pub mod activity;
pub mod auth;
pub mod bindings;
mod cascade;
pub mod devices;
pub mod import;
pub mod portal_users;
pub mod shares;
pub mod tasks;
pub mod tenants;
pub mod users;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use bindings::BindingsService;
pub use devices::DevicesService;
pub use import::ImportService;
pub use portal_users::{CreatePortalUser, PortalUsersService, UpdatePortalUser};
pub use shares::SharesService;
pub use tasks::TasksService;
pub use tenants::TenantsService;
pub use users::IdentityUsersService;

/// The portal principal performing an operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub portal_user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
}

impl Actor {
    /// Tenant this actor may see, `None` meaning all tenants.
    #[must_use]
    pub fn tenant_scope(&self) -> Option<Uuid> {
        match self.role {
            Role::TenantManager => self.tenant_id,
            Role::Admin => None,
        }
    }

    /// Value written into audit columns.
    #[must_use]
    pub fn audit_id(&self) -> String {
        self.portal_user_id.to_string()
    }
}

/// Tenant managers only ever see their own tenant, whatever the filter
/// asked for.
fn clamp_tenant(filter_tenant: &mut Option<Uuid>, actor: &Actor) {
    if let Some(tenant_id) = actor.tenant_scope() {
        *filter_tenant = Some(tenant_id);
    }
}
