//! Domain layer: errors, collaborator ports and the service surface.

pub mod error;
pub mod ports;
pub mod service;

/// Audit-column actor recorded for rows created by the system itself,
/// e.g. during bulk import.
pub const SYSTEM_ACTOR: &str = "system";

/// Audit-column actor recorded for rows created by an end user's own
/// authentication flow.
pub const SELF_ACTOR: &str = "self";
