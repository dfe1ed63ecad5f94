//! DevPortal backend core.
//!
//! Multi-tenant device/user management: identity users mirrored from an
//! external provider, devices bound to users by a device-local username,
//! shares that surface a binding owner's email to a recipient, append-only
//! activity logs, portal (admin) principals and a bulk import job.
//!
//! The public contract lives in `devportal-sdk` and is re-exported here.
//! The HTTP layer is intentionally out of scope; the service structs in
//! [`domain::service`] are the operation surface.

pub use devportal_sdk::{Page, PortalError};

pub mod config;
pub mod domain;
pub mod infra;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::PortalConfig;
use crate::domain::ports::IdentityProvider;
use crate::domain::service::{
    ActivityService, AuthService, BindingsService, DevicesService, IdentityUsersService,
    ImportService, PortalUsersService, SharesService, TasksService, TenantsService,
};
use crate::infra::auth::tokens::TokenIssuer;

/// All services wired over one connection, one token issuer and one
/// identity-provider client.
pub struct Portal {
    pub tokens: Arc<TokenIssuer>,
    pub auth: AuthService,
    pub devices: DevicesService,
    pub bindings: BindingsService,
    pub shares: SharesService,
    pub users: IdentityUsersService,
    pub tenants: TenantsService,
    pub portal_users: PortalUsersService,
    pub activity: ActivityService,
    pub tasks: TasksService,
    pub import: ImportService,
}

impl Portal {
    pub fn new(
        db: DatabaseConnection,
        config: &PortalConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.token));
        Self {
            auth: AuthService::new(db.clone(), provider.clone(), tokens.clone()),
            devices: DevicesService::new(db.clone()),
            bindings: BindingsService::new(db.clone()),
            shares: SharesService::new(db.clone()),
            users: IdentityUsersService::new(db.clone()),
            tenants: TenantsService::new(db.clone()),
            portal_users: PortalUsersService::new(db.clone(), tokens.clone(), config.default_role),
            activity: ActivityService::new(db.clone()),
            tasks: TasksService::new(db.clone()),
            import: ImportService::new(db, provider, config.import.page_size),
            tokens,
        }
    }
}
