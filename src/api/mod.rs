pub mod auth;
pub mod refresh;
pub mod user;
