//! Stateless HMAC access tokens.
//!
//! One issuer signs both end-user and portal tokens; the claim set tells
//! them apart (portal tokens carry a role).

use devportal_sdk::Role;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::domain::error::DomainError;
use crate::domain::service::Actor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: identity user id or portal user id.
    pub sub: Uuid,
    pub email: String,
    /// Present only on portal tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Tenant scope for tenant-manager tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,
    pub exp: i64,
}

impl Claims {
    /// Portal tokens with the admin role only.
    pub fn require_admin(&self) -> Result<(), DomainError> {
        match self.role {
            Some(Role::Admin) => Ok(()),
            _ => Err(DomainError::forbidden("admin role required")),
        }
    }

    /// Any portal token; end-user tokens are rejected.
    pub fn require_portal(&self) -> Result<Role, DomainError> {
        self.role
            .ok_or_else(|| DomainError::forbidden("portal role required"))
    }

    /// Tenant visible to this principal, `None` meaning all tenants.
    pub fn tenant_scope(&self) -> Option<Uuid> {
        match self.role {
            Some(Role::TenantManager) => self.tenant_id,
            _ => None,
        }
    }

    /// The acting portal principal, for audit and scoping in the
    /// service layer. End-user tokens are rejected.
    pub fn portal_actor(&self) -> Result<Actor, DomainError> {
        let role = self.require_portal()?;
        Ok(Actor {
            portal_user_id: self.sub,
            email: self.email.clone(),
            role,
            tenant_id: self.tenant_id,
        })
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: u64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_minutes: config.ttl_minutes,
        }
    }

    fn expiry(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp() + (self.ttl_minutes as i64) * 60
    }

    /// Token for a device-facing identity user.
    pub fn issue_user(&self, user_id: Uuid, email: &str) -> Result<String, DomainError> {
        self.sign(Claims {
            sub: user_id,
            email: email.to_owned(),
            role: None,
            tenant_id: None,
            exp: self.expiry(),
        })
    }

    /// Token for a portal principal; tenant managers carry their tenant.
    pub fn issue_portal(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        tenant_id: Option<Uuid>,
    ) -> Result<String, DomainError> {
        self.sign(Claims {
            sub: user_id,
            email: email.to_owned(),
            role: Some(role),
            tenant_id,
            exp: self.expiry(),
        })
    }

    fn sign(&self, claims: Claims) -> Result<String, DomainError> {
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| DomainError::database(format!("token signing failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::unauthorized("token expired"),
                _ => DomainError::unauthorized("invalid token"),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer(ttl_minutes: u64) -> TokenIssuer {
        TokenIssuer::new(&TokenConfig {
            secret: "test-secret".into(),
            ttl_minutes,
        })
    }

    #[test]
    fn user_token_round_trips() {
        let issuer = issuer(10);
        let id = Uuid::now_v7();
        let token = issuer.issue_user(id, "a@example.com").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@example.com");
        assert!(claims.role.is_none());
    }

    #[test]
    fn portal_token_carries_role_and_tenant() {
        let issuer = issuer(10);
        let tenant = Uuid::now_v7();
        let token = issuer
            .issue_portal(Uuid::now_v7(), "m@example.com", Role::TenantManager, Some(tenant))
            .unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.role, Some(Role::TenantManager));
        assert_eq!(claims.tenant_scope(), Some(tenant));
        assert!(claims.require_admin().is_err());
    }

    #[test]
    fn admin_scope_is_unrestricted() {
        let issuer = issuer(10);
        let token = issuer
            .issue_portal(Uuid::now_v7(), "a@example.com", Role::Admin, None)
            .unwrap();
        let claims = issuer.verify(&token).unwrap();
        claims.require_admin().unwrap();
        assert_eq!(claims.tenant_scope(), None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer(10);
        let token = issuer.issue_user(Uuid::now_v7(), "a@example.com").unwrap();
        let other = TokenIssuer::new(&TokenConfig {
            secret: "different-secret".into(),
            ttl_minutes: 10,
        });
        assert!(matches!(
            other.verify(&token),
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[test]
    fn user_token_is_not_a_portal_token() {
        let issuer = issuer(10);
        let token = issuer.issue_user(Uuid::now_v7(), "a@example.com").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert!(claims.require_portal().is_err());
    }
}
