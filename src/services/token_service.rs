// src/services/token_service.rs
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, instrument};

use crate::config::AuthConfig;
use crate::error::TokenError;
use crate::models::jwt::{Claims, TokenKind};
use crate::models::user::User;
use crate::services::cookie_service::CookieService;

/// Mints and checks access/refresh tokens from an explicit [`AuthConfig`].
#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.refresh_token_cookie_name
    }

    /* ---------- PUBLIC API ---------- */

    /// Sign a token of `kind` whose only application claim is the user id.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn create_token(&self, kind: TokenKind, user: &User) -> Result<String, TokenError> {
        let policy = kind.policy(&self.config);
        if policy.secret.is_empty() {
            return Err(TokenError::MissingSecret(kind));
        }

        let claims = Claims::new(user.id, Utc::now(), policy.ttl);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(policy.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        debug!(%kind, exp = claims.exp, "issued token");
        Ok(token)
    }

    /// Check signature and expiry against the secret of `kind`.
    #[instrument(skip(self, token))]
    pub fn verify_token(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let policy = kind.policy(&self.config);
        if policy.secret.is_empty() {
            return Err(TokenError::MissingSecret(kind));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(policy.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(TokenError::Invalid)
    }

    /// Mint a refresh token and attach it to `headers` as the refresh cookie.
    #[instrument(skip(self, headers, user), fields(user_id = user.id))]
    pub fn send_refresh_token(&self, headers: &mut HeaderMap, user: &User) -> Result<(), TokenError> {
        let token = self.create_token(TokenKind::Refresh, user)?;
        let cookie = CookieService::refresh_token_cookie(self.cookie_name(), &token);

        headers.append(SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?);
        Ok(())
    }

    /// Attach an expired refresh cookie to `headers`.
    pub fn clear_refresh_token(&self, headers: &mut HeaderMap) -> Result<(), TokenError> {
        let cookie = CookieService::removal_cookie(self.cookie_name());

        headers.append(SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?);
        Ok(())
    }
}
