//! Typed HTTP client for the API.
//!
//! Every request goes through [`ApiClient::request`], which injects the
//! `Authorization` header from the [`TokenStore`]. When no access token is
//! held the header is sent with an empty value, and a 401 is returned to the
//! caller as-is; there is no automatic refresh-and-retry.

mod token_store;

pub use token_store::TokenStore;

use http::header::InvalidHeaderValue;
use reqwest::{
    Method, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::REFRESH_TOKEN_PATH;
use crate::models::jwt::{LoginResponse, RefreshResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("access token is not a valid header value")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize)]
struct Greeting {
    message: String,
}

#[derive(Deserialize)]
struct Registered {
    id: i64,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `Bearer <token>` when a token is held, otherwise an empty value.
pub fn authorization_value(token: Option<&str>) -> Result<HeaderValue, InvalidHeaderValue> {
    match token {
        Some(token) => HeaderValue::from_str(&format!("Bearer {token}")),
        None => Ok(HeaderValue::from_static("")),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_token_store(base_url, TokenStore::new())
    }

    pub fn with_token_store(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ClientError> {
        // Keep cookies so the refresh cookie travels back to the server
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Start a request with the authorization header already attached.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.tokens.get();
        let authorization = authorization_value(token.as_deref())?;

        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, authorization))
    }

    pub async fn greeting(&self) -> Result<String, ClientError> {
        let greeting: Greeting = Self::json(self.request(Method::GET, "/")?.send().await?).await?;
        Ok(greeting.message)
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<i64, ClientError> {
        let body = Registration {
            username,
            email,
            password,
        };
        let registered: Registered =
            Self::json(self.request(Method::POST, "/register")?.json(&body).send().await?).await?;
        Ok(registered.id)
    }

    /// Log in and keep the returned access token for later requests.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let body = Credentials { email, password };
        let login: LoginResponse =
            Self::json(self.request(Method::POST, "/login")?.json(&body).send().await?).await?;

        self.tokens.set(login.access_token);
        debug!("stored access token");
        Ok(())
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        Self::json(self.request(Method::GET, "/me")?.send().await?).await
    }

    /// Trade the refresh cookie for a new access token.
    /// Returns `false` and forgets the current token when the server refuses.
    pub async fn refresh(&self) -> Result<bool, ClientError> {
        let response = self.request(Method::POST, REFRESH_TOKEN_PATH)?.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.tokens.clear();
            return Ok(false);
        }

        let refreshed: RefreshResponse = Self::json(response).await?;
        if refreshed.ok {
            self.tokens.set(refreshed.access_token);
        } else {
            self.tokens.clear();
        }
        Ok(refreshed.ok)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.request(Method::POST, "/logout")?.send().await?;
        self.tokens.clear();

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(())
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}
