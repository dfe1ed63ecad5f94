//! Conversions between entity models and SDK contract types.
//!
//! Rows holding closed enums as strings convert fallibly: an
//! unrecognized stored value is a database-integrity error, not a panic.

use devportal_sdk::{
    Device, DeviceActivity, DeviceBinding, IdentityUser, PortalActivity, PortalUser, Share,
    TaskStatus, Tenant,
};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{
    device, device_activity, device_binding, identity_user, portal_activity, portal_user, share,
    task_status, tenant,
};

impl From<tenant::Model> for Tenant {
    fn from(m: tenant::Model) -> Self {
        Self {
            id: m.id,
            provider_org_id: m.provider_org_id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

impl From<identity_user::Model> for IdentityUser {
    fn from(m: identity_user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            provider_user_id: m.provider_user_id,
            tenant_id: m.tenant_id,
            name: m.name,
            pin_set: m.pin_hash.is_some(),
            created_at: m.created_at,
        }
    }
}

/// Device rows surface the number of bindings they carry; the count is
/// computed by the caller.
pub fn device_with_count(m: device::Model, binding_count: u64) -> Device {
    Device {
        id: m.id,
        external_id: m.external_id,
        name: m.name,
        registered_by: m.registered_by,
        binding_count,
        created_at: m.created_at,
    }
}

impl From<device_binding::Model> for DeviceBinding {
    fn from(m: device_binding::Model) -> Self {
        Self {
            id: m.id,
            device_id: m.device_id,
            identity_user_id: m.identity_user_id,
            device_username: m.device_username,
            created_at: m.created_at,
        }
    }
}

impl From<share::Model> for Share {
    fn from(m: share::Model) -> Self {
        Self {
            id: m.id,
            binding_id: m.binding_id,
            recipient_id: m.recipient_id,
            created_at: m.created_at,
        }
    }
}

fn bad_enum(column: &str, value: &str) -> DomainError {
    DomainError::database(format!("unrecognized {column} value in storage: {value}"))
}

impl TryFrom<device_activity::Model> for DeviceActivity {
    type Error = DomainError;

    fn try_from(m: device_activity::Model) -> Result<Self, Self::Error> {
        let kind = m.kind.parse().map_err(|_| bad_enum("kind", &m.kind))?;
        Ok(Self {
            id: m.id,
            identity_user_id: m.identity_user_id,
            device_id: m.device_id,
            binding_id: m.binding_id,
            login_as: m.login_as,
            kind,
            at: m.created_at,
        })
    }
}

impl TryFrom<portal_activity::Model> for PortalActivity {
    type Error = DomainError;

    fn try_from(m: portal_activity::Model) -> Result<Self, Self::Error> {
        let action = m.action.parse().map_err(|_| bad_enum("action", &m.action))?;
        Ok(Self {
            id: m.id,
            portal_user_id: m.portal_user_id,
            endpoint: m.endpoint,
            action,
            identity_user_id: m.identity_user_id,
            tenant_id: m.tenant_id,
            device_id: m.device_id,
            binding_id: m.binding_id,
            share_id: m.share_id,
            at: m.created_at,
        })
    }
}

impl TryFrom<portal_user::Model> for PortalUser {
    type Error = DomainError;

    fn try_from(m: portal_user::Model) -> Result<Self, Self::Error> {
        let role = m.role.parse().map_err(|_| bad_enum("role", &m.role))?;
        Ok(Self {
            id: m.id,
            email: m.email,
            name: m.name,
            role,
            tenant_id: m.tenant_id,
            active: m.active,
            created_at: m.created_at,
        })
    }
}

impl TryFrom<task_status::Model> for TaskStatus {
    type Error = DomainError;

    fn try_from(m: task_status::Model) -> Result<Self, Self::Error> {
        let kind = m.kind.parse().map_err(|_| bad_enum("kind", &m.kind))?;
        let state = m.state.parse().map_err(|_| bad_enum("state", &m.state))?;
        Ok(Self {
            id: m.id,
            kind,
            state,
            message: m.message,
            created_at: m.created_at,
        })
    }
}
