use axum::{
    Json, Router,
    http::{HeaderValue, Method, header::{AUTHORIZATION, CONTENT_TYPE}},
    routing::{get, post},
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
#[cfg(test)]
mod tests;

use config::{AuthConfig, REFRESH_TOKEN_PATH};
use services::{auth_service::AuthService, token_service::TokenService};

/// Shared per-request context handed to every handler through `State`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth_config: AuthConfig, bcrypt_cost: u32) -> Self {
        let tokens = TokenService::new(auth_config);
        let auth = AuthService::new(pool, tokens.clone(), bcrypt_cost);
        Self { auth, tokens }
    }
}

#[derive(Serialize)]
struct Message {
    message: String,
}

async fn hello_world() -> Json<Message> {
    Json(Message {
        message: "hello world".to_string(),
    })
}

pub fn create_router(state: AppState, cors_origin: HeaderValue) -> Router {
    // Credentialed CORS needs an explicit origin
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    let protected = Router::new()
        .route("/me", get(api::user::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/", get(hello_world))
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/logout", post(api::auth::logout))
        .route(REFRESH_TOKEN_PATH, post(api::refresh::refresh_token))
        .merge(protected)
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}
