use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;
use tracing::{info, warn};

use crate::{
    AppState,
    error::AuthError,
    models::jwt::{RefreshResponse, TokenKind},
    services::cookie_service::CookieService,
};

/// Exchange the refresh cookie for a new access token and a new refresh cookie.
pub async fn refresh_token(State(state): State<AppState>, cookies: Cookies) -> Result<Response, AuthError> {
    let Some(token) = CookieService::extract_refresh_token(&cookies, state.tokens.cookie_name()) else {
        return Ok(rejected());
    };

    let user = match state.auth.verify_token(TokenKind::Refresh, &token).await {
        Ok(user) => user,
        Err(AuthError::Database(err)) => return Err(AuthError::Database(err)),
        Err(err) => {
            warn!(error = %err, "refresh token rejected");
            return Ok(rejected());
        }
    };

    let access_token = state.tokens.create_token(TokenKind::Access, &user)?;
    let mut headers = HeaderMap::new();
    state.tokens.send_refresh_token(&mut headers, &user)?;

    info!(user_id = user.id, "tokens refreshed");
    Ok((
        headers,
        Json(RefreshResponse {
            ok: true,
            access_token,
        }),
    )
        .into_response())
}

fn rejected() -> Response {
    (StatusCode::UNAUTHORIZED, Json(RefreshResponse::rejected())).into_response()
}
