//! Public contract for the DevPortal backend core.
//!
//! This crate holds the data models, filter types, pagination envelope and
//! error type shared between the service layer and its callers. It carries
//! no persistence or transport concerns.

mod error;
mod filters;
mod models;
mod page;

pub use error::PortalError;
pub use filters::{
    BindingFilter, DeviceActivityFilter, DeviceFilter, IdentityUserFilter, PageRequest,
    PortalActivityFilter, PortalUserFilter, ShareFilter,
};
pub use models::{
    ActivityRefs, Device, DeviceActivity, DeviceActivityKind, DeviceBinding, IdentityUser,
    PortalAction, PortalActivity, PortalSession, PortalUser, Role, Session, Share, TaskKind,
    TaskState, TaskStatus, Tenant,
};
pub use page::Page;
