// src/models/jwt.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AuthConfig;

/// The two credentials the server mints. Each kind owns its signing
/// secret and lifetime; they are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Secret and lifetime selected for one token kind.
#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy<'a> {
    pub secret: &'a str,
    pub ttl: Duration,
}

impl TokenKind {
    pub fn policy(self, config: &AuthConfig) -> TokenPolicy<'_> {
        match self {
            TokenKind::Access => TokenPolicy {
                secret: &config.access_token_secret,
                ttl: config.access_token_ttl,
            },
            TokenKind::Refresh => TokenPolicy {
                secret: &config.refresh_token_secret,
                ttl: config.refresh_token_ttl,
            },
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access token"),
            TokenKind::Refresh => f.write_str("refresh token"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub iat: i64, // issued at
    pub exp: i64, // expiration time
}

impl Claims {
    pub fn new(user_id: i64, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub ok: bool,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

impl RefreshResponse {
    pub fn rejected() -> Self {
        Self {
            ok: false,
            access_token: String::new(),
        }
    }
}
