use chrono::Duration;
use dotenv::dotenv;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

pub const REFRESH_TOKEN_PATH: &str = "/refresh_token";

const DEFAULT_DATABASE_URL: &str = "sqlite:users.db?mode=rwc";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,
}

/// Signing secrets, lifetimes and cookie name used for token issuance.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub refresh_token_cookie_name: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(
        access_token_secret: impl Into<String>,
        refresh_token_secret: impl Into<String>,
        refresh_token_cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            access_token_secret: access_token_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            refresh_token_cookie_name: refresh_token_cookie_name.into(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(30),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::SharedSecret);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub cors_origin: String,
    pub bcrypt_cost: u32,
    pub auth: AuthConfig,
}

impl Config {
    /// Read the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or(ConfigError::Invalid { name: "BCRYPT_COST", value })?,
            None => bcrypt::DEFAULT_COST,
        };

        let auth = AuthConfig::new(
            required("ACCESS_TOKEN_SECRET")?,
            required("REFRESH_TOKEN_SECRET")?,
            required("REFRESH_TOKEN_COOKIE_NAME")?,
        )
        .validate()?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            bcrypt_cost,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "r"),
            ("REFRESH_TOKEN_COOKIE_NAME", "jid"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 4000);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.auth.access_token_ttl, Duration::minutes(15));
        assert_eq!(config.auth.refresh_token_ttl, Duration::days(30));
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "a"),
            ("REFRESH_TOKEN_COOKIE_NAME", "jid"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::Missing("REFRESH_TOKEN_SECRET"));
    }

    #[test]
    fn empty_secret_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", ""),
            ("REFRESH_TOKEN_SECRET", "r"),
            ("REFRESH_TOKEN_COOKIE_NAME", "jid"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::Missing("ACCESS_TOKEN_SECRET"));
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "same"),
            ("REFRESH_TOKEN_SECRET", "same"),
            ("REFRESH_TOKEN_COOKIE_NAME", "jid"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::SharedSecret);
    }

    #[test]
    fn bad_port_is_reported() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("ACCESS_TOKEN_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "r"),
            ("REFRESH_TOKEN_COOKIE_NAME", "jid"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid { name: "PORT", value: "http".to_string() }
        );
    }
}
