//! Identity directory — authentication and token lifecycle.
//!
//! Resolves credentials and tokens into [`Identity`] values. Unknown emails
//! and wrong passwords are indistinguishable from the outside, and there is
//! no retry or lockout tracking.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::token::{sign_token, verify_token, TokenConfig};
use crate::auth::verify_password;
use crate::domain::{CareError, CareResult, Identity, RepositoryProvider};

/// A signed access token with its fixed expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login: the resolved identity plus its token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub token: IssuedToken,
}

/// Directory service: credentials in, identities out.
pub struct UserDirectory {
    repos: Arc<dyn RepositoryProvider>,
    tokens: TokenConfig,
}

impl UserDirectory {
    pub fn new(repos: Arc<dyn RepositoryProvider>, tokens: TokenConfig) -> Self {
        Self { repos, tokens }
    }

    /// Check credentials against the directory.
    pub async fn authenticate(&self, email: &str, password: &str) -> CareResult<Identity> {
        let Some(user) = self.repos.users().find_by_email(email).await? else {
            return Err(bad_credentials());
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(email, error = %e, "stored password hash failed verification");
            false
        });
        if !valid {
            return Err(bad_credentials());
        }

        info!(email, role = %user.role, "authenticated");
        Ok(user.into())
    }

    /// Sign a token for an already-authenticated identity. Expiry is fixed
    /// at issuance; nothing extends it later.
    pub fn issue_token(&self, identity: &Identity) -> CareResult<IssuedToken> {
        let (token, claims) =
            sign_token(identity.email(), identity.role(), &self.tokens).map_err(|e| {
                tracing::error!(error = %e, "token signing failed");
                CareError::Store(e.to_string())
            })?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| CareError::Store("token expiry out of range".to_string()))?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer",
            expires_at,
        })
    }

    /// Resolve a presented token back into an identity. Expired, malformed
    /// and forged tokens, and tokens for since-deleted accounts, all fail
    /// the same way.
    pub async fn resolve_token(&self, token: &str) -> CareResult<Identity> {
        let claims = verify_token(token, &self.tokens).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    CareError::Authentication("token expired".to_string())
                }
                _ => CareError::Authentication("invalid token".to_string()),
            }
        })?;

        let Some(user) = self.repos.users().find_by_email(&claims.sub).await? else {
            return Err(CareError::Authentication("invalid token".to_string()));
        };

        Ok(user.into())
    }

    /// Authenticate and issue in one call.
    pub async fn login(&self, email: &str, password: &str) -> CareResult<AuthSession> {
        let identity = self.authenticate(email, password).await?;
        let token = self.issue_token(&identity)?;
        Ok(AuthSession { identity, token })
    }
}

fn bad_credentials() -> CareError {
    CareError::Authentication("invalid email or password".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::domain::user::User;
    use crate::domain::Role;
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    fn directory_with_carer() -> UserDirectory {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        repos.seed_user(User {
            email: "carer@carehome.com".to_string(),
            password_hash: hash_password("letmein123").unwrap(),
            role: Role::Carer,
            name: Some("Jo Daniels".to_string()),
            phone: Some("07700 900123".to_string()),
            department: None,
            family_id: None,
        });
        UserDirectory::new(repos, TokenConfig::default())
    }

    #[tokio::test]
    async fn login_round_trips_identity_through_token() {
        let directory = directory_with_carer();

        let session = directory.login("carer@carehome.com", "letmein123").await.unwrap();
        assert_eq!(session.token.token_type, "Bearer");
        assert!(session.token.expires_at > Utc::now());

        let resolved = directory.resolve_token(&session.token.token).await.unwrap();
        assert_eq!(resolved.email(), "carer@carehome.com");
        assert_eq!(resolved.role(), Role::Carer);
        assert_eq!(resolved.display_name(), "Jo Daniels");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let directory = directory_with_carer();

        let wrong_pw = directory
            .authenticate("carer@carehome.com", "wrong")
            .await
            .unwrap_err();
        let unknown = directory
            .authenticate("nobody@carehome.com", "letmein123")
            .await
            .unwrap_err();

        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert!(matches!(wrong_pw, CareError::Authentication(_)));
    }

    #[tokio::test]
    async fn garbage_token_resolves_to_authentication_error() {
        let directory = directory_with_carer();
        let err = directory.resolve_token("garbage.token.here").await.unwrap_err();
        assert!(matches!(err, CareError::Authentication(_)));
    }

    #[tokio::test]
    async fn token_for_deleted_account_is_rejected() {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        repos.seed_user(User {
            email: "temp@carehome.com".to_string(),
            password_hash: hash_password("pw123456").unwrap(),
            role: Role::Carer,
            name: None,
            phone: None,
            department: None,
            family_id: None,
        });
        let directory = UserDirectory::new(repos.clone(), TokenConfig::default());

        let session = directory.login("temp@carehome.com", "pw123456").await.unwrap();
        repos.remove_user("temp@carehome.com");

        let err = directory.resolve_token(&session.token.token).await.unwrap_err();
        assert!(matches!(err, CareError::Authentication(_)));
    }
}
