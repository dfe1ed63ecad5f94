use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Portal principal role.
///
/// `Admin` sees every tenant; `TenantManager` is scoped to the tenant
/// carried in their token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    TenantManager,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::TenantManager => "tenant_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "tenant_manager" => Ok(Self::TenantManager),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Lifecycle of a background task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown task state: {other}")),
        }
    }
}

/// Kind of background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    UserImport,
}

impl TaskKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserImport => "user_import",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_import" => Ok(Self::UserImport),
            other => Err(format!("unknown task kind: {other}")),
        }
    }
}

/// Action recorded by a device-side activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceActivityKind {
    DeviceLogin,
    UserLinked,
    DeviceCreated,
    DeviceAdded,
}

impl DeviceActivityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeviceLogin => "device_login",
            Self::UserLinked => "user_linked",
            Self::DeviceCreated => "device_created",
            Self::DeviceAdded => "device_added",
        }
    }
}

impl fmt::Display for DeviceActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device_login" => Ok(Self::DeviceLogin),
            "user_linked" => Ok(Self::UserLinked),
            "device_created" => Ok(Self::DeviceCreated),
            "device_added" => Ok(Self::DeviceAdded),
            other => Err(format!("unknown device activity kind: {other}")),
        }
    }
}

/// Action recorded by a portal-side activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalAction {
    Create,
    Update,
    Delete,
}

impl PortalAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for PortalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown portal action: {other}")),
        }
    }
}

/// An external-provider organization mirrored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Organization id at the identity provider (unique).
    pub provider_org_id: String,
    pub name: Option<String>,
    pub created_at: OffsetDateTime,
}

/// A user record mirrored from the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
    /// User id at the identity provider; absent for rows created before
    /// the provider reported one.
    pub provider_user_id: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub name: Option<String>,
    /// Whether a PIN credential has been set. The hash itself never
    /// leaves the storage layer.
    pub pin_set: bool,
    pub created_at: OffsetDateTime,
}

/// A physical or logical client device, identified by an external string id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub external_id: String,
    pub name: Option<String>,
    /// The identity user that first connected this device, if known.
    pub registered_by: Option<Uuid>,
    /// Number of logins bound to this device.
    pub binding_count: u64,
    pub created_at: OffsetDateTime,
}

/// A (device, identity user, device-local username) ownership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBinding {
    pub id: Uuid,
    pub device_id: Uuid,
    pub identity_user_id: Uuid,
    pub device_username: String,
    pub created_at: OffsetDateTime,
}

/// A grant letting a second identity user see a binding owner's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub id: Uuid,
    pub binding_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Append-only record of a device-side action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceActivity {
    pub id: Uuid,
    pub identity_user_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    pub login_as: Option<String>,
    pub kind: DeviceActivityKind,
    pub at: OffsetDateTime,
}

/// Append-only record of a portal (admin) action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalActivity {
    pub id: Uuid,
    pub portal_user_id: Option<Uuid>,
    pub endpoint: String,
    pub action: PortalAction,
    pub identity_user_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    pub share_id: Option<Uuid>,
    pub at: OffsetDateTime,
}

/// Optional entity references attached to a portal activity record.
///
/// All references are nullable so the log survives deletion of the rows
/// it points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRefs {
    pub identity_user_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub device_id: Option<Uuid>,
    pub binding_id: Option<Uuid>,
    pub share_id: Option<Uuid>,
}

/// An administrative principal of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    /// Soft-delete flag; inactive users cannot log in.
    pub active: bool,
    pub created_at: OffsetDateTime,
}

/// Progress record for a background task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: Uuid,
    pub kind: TaskKind,
    pub state: TaskState,
    pub message: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Token envelope returned by end-user authentication flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Whether the user has a PIN credential set.
    pub pin_set: bool,
    /// Emails entitled to surface for the requested device login,
    /// self first when the requester owns the binding.
    pub emails: Vec<String>,
}

/// Token envelope returned by portal authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    pub token: String,
    pub user: PortalUser,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
}
