//! Collaborator seams consumed by the domain services.

use std::fmt;

use async_trait::async_trait;

/// Identity attributes returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub provider_user_id: String,
    pub provider_org_id: Option<String>,
    pub display_name: Option<String>,
    pub email: String,
}

/// One organization page entry from the provider's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOrg {
    pub provider_org_id: String,
    pub name: Option<String>,
}

/// One user page entry from the provider's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUser {
    pub provider_user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Failure raised by the identity provider client.
///
/// A raised error is always an authentication/import failure, never an
/// implicit "no access".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError(pub String);

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ProviderError {}

/// External identity provider surface.
///
/// The concrete HTTP client lives outside this crate; tests install
/// in-memory fakes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check end-user credentials. `Ok(None)` is a definitive deny;
    /// `Err` is an upstream failure.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<VerifiedIdentity>, ProviderError>;

    /// Page through the provider's organizations. An empty page ends the
    /// walk.
    async fn organizations(&self, offset: u64, limit: u64)
        -> Result<Vec<RemoteOrg>, ProviderError>;

    /// Page through the users of one organization.
    async fn users(
        &self,
        provider_org_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RemoteUser>, ProviderError>;
}
