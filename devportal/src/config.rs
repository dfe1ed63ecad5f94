//! Runtime configuration.
//!
//! Loaded from an optional YAML file overlaid with `DEVPORTAL_*`
//! environment variables. Every field has a documented default so an
//! empty configuration is valid for local development.

use std::path::Path;

use devportal_sdk::Role;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the portal core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Datastore connection string.
    pub database_url: String,
    /// Role assigned to portal users created without an explicit role.
    pub default_role: Role,
    pub token: TokenConfig,
    pub import: ImportConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            default_role: Role::Admin,
            token: TokenConfig::default(),
            import: ImportConfig::default(),
        }
    }
}

/// Access-token issuance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// HMAC signing secret. Override in any real deployment.
    #[serde(serialize_with = "expose_for_overlay")]
    pub secret: SecretString,
    /// Token lifetime in minutes.
    pub ttl_minutes: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from("insecure-dev-secret"),
            ttl_minutes: 60,
        }
    }
}

/// Bulk-import job settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Page size used when walking the provider's paginated listings.
    pub page_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { page_size: 1000 }
    }
}

// Figment overlays work on serialized defaults, which requires the secret
// to round-trip through the provider chain.
fn expose_for_overlay<S: serde::Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use secrecy::ExposeSecret;
    serializer.serialize_str(secret.expose_secret())
}

impl PortalConfig {
    /// Load configuration from defaults, an optional YAML file and the
    /// `DEVPORTAL_*` environment (nested keys split on `__`).
    ///
    /// # Errors
    ///
    /// Returns the underlying figment error when the file or environment
    /// contains values that do not deserialize into the schema.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("DEVPORTAL_").split("__")).extract()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_usable() {
        let cfg = PortalConfig::default();
        assert_eq!(cfg.default_role, Role::Admin);
        assert_eq!(cfg.token.ttl_minutes, 60);
        assert_eq!(cfg.import.page_size, 1000);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "default_role: tenant_manager").unwrap();
        writeln!(file, "token:").unwrap();
        writeln!(file, "  ttl_minutes: 5").unwrap();
        let cfg = PortalConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.default_role, Role::TenantManager);
        assert_eq!(cfg.token.ttl_minutes, 5);
        assert_eq!(cfg.import.page_size, 1000);
    }
}
