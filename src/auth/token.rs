//! Access token signing and verification.
//!
//! Thin wrapper over `jsonwebtoken`; the rest of the crate treats sign and
//! verify as black boxes and never inspects token internals. Expiry is fixed
//! at issuance from the configured lifetime.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::domain::Role;

/// Token signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Signing algorithm (HMAC family).
    pub algorithm: Algorithm,
    /// Token lifetime in minutes.
    pub ttl_minutes: i64,
    /// Issuer claim.
    pub issuer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::from_settings(&AuthSettings::default())
    }
}

impl TokenConfig {
    /// Build from the `[auth]` config section. An unknown algorithm name
    /// falls back to HS256 with a warning rather than refusing to start.
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let algorithm = settings.token_algorithm.parse().unwrap_or_else(|_| {
            tracing::warn!(
                algorithm = %settings.token_algorithm,
                "unknown token algorithm, falling back to HS256"
            );
            Algorithm::HS256
        });
        Self {
            secret: settings.token_secret.clone(),
            algorithm,
            ttl_minutes: settings.token_ttl_minutes,
            issuer: "careview".to_string(),
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    /// Account role at issuance. Roles are immutable, so this never drifts.
    pub role: Role,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    pub fn new(email: &str, role: Role, config: &TokenConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(config.ttl_minutes);

        Self {
            sub: email.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Sign a token for an account.
pub fn sign_token(
    email: &str,
    role: Role,
    config: &TokenConfig,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let claims = Claims::new(email, role, config);
    let token = encode(
        &Header::new(config.algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Verify a token's signature, expiry and issuer, returning its claims.
pub fn verify_token(
    token: &str,
    config: &TokenConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(config.algorithm);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let config = TokenConfig::default();
        let (token, _) = sign_token("carer@carehome.com", Role::Carer, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "carer@carehome.com");
        assert_eq!(claims.role, Role::Carer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = TokenConfig::default();
        assert!(verify_token("not-a-token", &config).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = TokenConfig::default();
        let (token, _) = sign_token("carer@carehome.com", Role::Carer, &config).unwrap();

        let other = TokenConfig {
            secret: "a-different-secret".to_string(),
            ..config
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = TokenConfig {
            ttl_minutes: -10,
            ..TokenConfig::default()
        };
        let (token, _) = sign_token("carer@carehome.com", Role::Carer, &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn expiry_follows_configured_lifetime() {
        let config = TokenConfig {
            ttl_minutes: 60,
            ..TokenConfig::default()
        };
        let (_, claims) = sign_token("m@carehome.com", Role::Manager, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
