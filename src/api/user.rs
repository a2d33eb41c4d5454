use axum::{Json, extract::Extension};
use serde::Serialize;

use crate::{middleware::auth::CurrentUser, models::user::User};

#[derive(Serialize)]
pub struct ProfileResponse {
    id: i64,
    username: String,
    email: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Profile of the user named by the bearer token.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(user.into())
}
