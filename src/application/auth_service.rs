//! Demo login and registration, plus HS256 token issue/verification.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::error::{AppError, AppResult};
use crate::domain::identity::CredentialProvider;

/// Tokens are valid for 24 hours from issue.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Registration {
    pub message: String,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialProvider>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(secret: &[u8], credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<String> {
        if !self.credentials.verify(username, password) {
            tracing::warn!(username, "rejected login");
            return Err(AppError::Authentication);
        }
        tracing::info!(username, "login");
        self.generate_token(username)
    }

    /// Checks the submitted fields only; no account is stored.
    pub fn register(&self, username: Option<&str>, email: Option<&str>) -> AppResult<Registration> {
        let username = username.filter(|u| !u.trim().is_empty()).ok_or_else(|| AppError::Validation("Username is required".into()))?;
        email.filter(|e| !e.trim().is_empty()).ok_or_else(|| AppError::Validation("Email is required".into()))?;
        Ok(Registration {
            message: "Registration successful! Please login with your credentials.".into(),
            username: username.to_string(),
        })
    }

    pub fn generate_token(&self, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key).context("signing token")?;
        Ok(token)
    }

    pub fn extract_claims(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    pub fn username_from_token(&self, token: &str) -> AppResult<String> {
        self.extract_claims(token).map(|c| c.sub)
    }

    pub fn validate_token(&self, token: &str) -> bool {
        self.extract_claims(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::DemoCredentials;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn service() -> AuthService {
        AuthService::new(SECRET, Arc::new(DemoCredentials::default()))
    }

    #[test]
    fn login_issues_token_for_subject() {
        let auth = service();
        let token = auth.login("admin", "pass").unwrap();
        assert!(auth.validate_token(&token));
        assert_eq!(auth.username_from_token(&token).unwrap(), "admin");
        let claims = auth.extract_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn wrong_credentials_fail() {
        let auth = service();
        assert!(matches!(auth.login("admin", "nope"), Err(AppError::Authentication)));
        assert!(matches!(auth.login("", ""), Err(AppError::Authentication)));
    }

    #[test]
    fn garbage_and_foreign_tokens_are_invalid() {
        let auth = service();
        assert!(!auth.validate_token("not.a.token"));
        let other = AuthService::new(b"another-secret-another-secret-1234", Arc::new(DemoCredentials::default()));
        let token = other.generate_token("admin").unwrap();
        assert!(!auth.validate_token(&token));
        assert!(matches!(auth.username_from_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_invalid() {
        let auth = service();
        let past = Utc::now() - Duration::hours(48);
        let claims = Claims { sub: "admin".into(), iat: past.timestamp(), exp: (past + Duration::hours(1)).timestamp() };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert!(!auth.validate_token(&token));
    }

    #[test]
    fn register_requires_username_and_email() {
        let auth = service();
        let ok = auth.register(Some("bob"), Some("bob@example.com")).unwrap();
        assert_eq!(ok.username, "bob");
        assert!(matches!(auth.register(Some("  "), Some("a@b")), Err(AppError::Validation(m)) if m == "Username is required"));
        assert!(matches!(auth.register(Some("bob"), None), Err(AppError::Validation(m)) if m == "Email is required"));
    }
}
