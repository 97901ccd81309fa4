//! Session cookie attributes.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::jwt::SESSION_TTL;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth-token";

/// Attributes applied when setting or clearing the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    secure: bool,
}

impl CookiePolicy {
    /// `secure` should be true only for production deployments served over HTTPS.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Common attributes: httpOnly, lax same-site, root path, `Secure` iff production.
    pub fn session_cookie_attributes(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .build()
    }

    /// Cookie set on login, living as long as the token it carries.
    pub fn with_expiry(&self, token: &str) -> Cookie<'static> {
        let mut cookie = self.session_cookie_attributes(token.to_string());
        cookie.set_max_age(SESSION_TTL);
        cookie
    }

    /// Empty cookie with max-age 0, telling the browser to drop the session.
    pub fn with_immediate_expiry(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie_attributes(String::new());
        cookie.set_max_age(Duration::ZERO);
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_cookie_lives_seven_days() {
        let cookie = CookiePolicy::new(false).with_expiry("tok");
        assert_eq!(cookie.name(), "auth-token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604_800)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = CookiePolicy::new(false).with_immediate_expiry();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn secure_flag_follows_policy() {
        assert_eq!(CookiePolicy::new(true).with_expiry("t").secure(), Some(true));
        assert_eq!(CookiePolicy::new(true).with_immediate_expiry().secure(), Some(true));
    }

    #[test]
    fn header_rendering() {
        let rendered = CookiePolicy::new(true).with_expiry("abc").to_string();
        assert!(rendered.starts_with("auth-token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
    }
}
