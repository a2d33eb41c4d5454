use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AuthError, models::jwt::TokenKind, models::user::User};

#[derive(Clone)]
pub struct CurrentUser(pub User);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Get the authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthorized)?;

    // Bad or expired tokens and unknown users are a plain 401
    let user = state
        .auth
        .verify_token(TokenKind::Access, token)
        .await
        .map_err(|err| match err {
            AuthError::Database(_) => err,
            _ => AuthError::Unauthorized,
        })?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
