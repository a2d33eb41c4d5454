use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::AuthError, models::jwt::LoginResponse};

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    id: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    ok: bool,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    let user = state
        .auth
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(RegisterResponse { id: user.id }))
}

/// Returns the access token in the body and the refresh token as a cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), AuthError> {
    let (user, access_token) = state.auth.login(&payload.email, &payload.password).await?;

    let mut headers = HeaderMap::new();
    state.tokens.send_refresh_token(&mut headers, &user)?;

    Ok((headers, Json(LoginResponse { access_token })))
}

pub async fn logout(State(state): State<AppState>) -> Result<(HeaderMap, Json<LogoutResponse>), AuthError> {
    let mut headers = HeaderMap::new();
    state.tokens.clear_refresh_token(&mut headers)?;

    Ok((headers, Json(LogoutResponse { ok: true })))
}
