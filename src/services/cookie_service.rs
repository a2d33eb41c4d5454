use cookie::{Cookie, CookieBuilder, SameSite};
use time::Duration;
use tower_cookies::Cookies;

use crate::config::REFRESH_TOKEN_PATH;

const SECURE: bool = true;
const HTTP_ONLY: bool = true;
const SAME_SITE: SameSite = SameSite::Lax;

pub struct CookieService;

impl CookieService {
    /// Refresh cookie carrying `token`, readable only by the refresh route.
    pub fn refresh_token_cookie(name: &str, token: &str) -> Cookie<'static> {
        Self::create_cookie(name, token).build()
    }

    /// Expired refresh cookie that makes the browser drop the stored one.
    pub fn removal_cookie(name: &str) -> Cookie<'static> {
        Self::create_cookie(name, "").max_age(Duration::ZERO).build()
    }

    pub fn extract_refresh_token(cookies: &Cookies, name: &str) -> Option<String> {
        cookies
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn create_cookie(name: &str, value: &str) -> CookieBuilder<'static> {
        Cookie::build((name.to_string(), value.to_string()))
            .secure(SECURE)
            .http_only(HTTP_ONLY)
            .same_site(SAME_SITE)
            .path(REFRESH_TOKEN_PATH)
    }
}
