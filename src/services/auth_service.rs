use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::AuthError;
use crate::models::jwt::TokenKind;
use crate::models::user::User;
use crate::services::token_service::TokenService;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(pool: SqlitePool, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            tokens,
            bcrypt_cost,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if User::find_by_email(&self.pool, email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash(password, self.bcrypt_cost)?;
        // A concurrent registration can still win the insert
        let user = User::create(&self.pool, username, email, &password_hash)
            .await
            .map_err(|err| {
                if err.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    AuthError::EmailTaken
                } else {
                    AuthError::Database(err)
                }
            })?;

        info!(user_id = user.id, "registered user");
        Ok(user)
    }

    /// Check credentials and return the user with a fresh access token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = User::find_by_email(&self.pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.create_token(TokenKind::Access, &user)?;
        Ok((user, access_token))
    }

    /// Resolve the user a token of `kind` was issued for.
    #[instrument(skip(self, token))]
    pub async fn verify_token(&self, kind: TokenKind, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify_token(kind, token)?;

        User::find_by_id(&self.pool, claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
