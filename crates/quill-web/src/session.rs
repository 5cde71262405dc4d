//! Signed-cookie sessions, flash notices, and the request-scoped
//! current-user extractors.
//!
//! The session cookie carries only the user id; the row is loaded per
//! request, so a stale cookie for a vanished user simply reads as
//! anonymous. `AuthUser` gates protected routes and bounces anonymous
//! requests to the login form with a return target; `MaybeUser` is for
//! pages that render either way.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use quill_db::models::UserRow;
use tracing::warn;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "quill_session";
pub const FLASH_COOKIE: &str = "quill_flash";

/// Session duration when "remember me" is checked; otherwise the cookie
/// lives until the browser closes.
const REMEMBER_DAYS: i64 = 30;

// -- Session cookie ------------------------------------------------------

pub fn log_in(jar: SignedCookieJar, user_id: &str, remember: bool) -> SignedCookieJar {
    let mut cookie = Cookie::new(SESSION_COOKIE, user_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    if remember {
        cookie.set_max_age(time::Duration::days(REMEMBER_DAYS));
    }
    jar.add(cookie)
}

pub fn log_out(jar: SignedCookieJar) -> SignedCookieJar {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    jar.remove(cookie)
}

// -- Flash notices -------------------------------------------------------

/// A one-time notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: "danger".to_string(),
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        format!("{}:{}", self.category, self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (category, message) = raw.split_once(':')?;
        Some(Self {
            category: category.to_string(),
            message: message.to_string(),
        })
    }
}

/// Queue a notice for the page rendered after the next redirect.
pub fn flash(jar: SignedCookieJar, notice: Flash) -> SignedCookieJar {
    let mut cookie = Cookie::new(FLASH_COOKIE, notice.encode());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Read and consume the pending notice, if any.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let notice = Flash::decode(cookie.value());
            let mut removal = Cookie::new(FLASH_COOKIE, "");
            removal.set_path("/");
            (jar.remove(removal), notice)
        }
        None => (jar, None),
    }
}

// -- Current-user extractors ---------------------------------------------

/// The authenticated user; rejects anonymous requests.
pub struct AuthUser(pub UserRow);

/// The authenticated user if there is one.
pub struct MaybeUser(pub Option<UserRow>);

/// Rejection for [`AuthUser`]: bounce to the login form, remembering
/// where the visitor was headed.
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/login?next={}", self.next)).into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_user(parts, state).await {
            Some(user) => Ok(Self(user)),
            None => Err(LoginRedirect {
                next: parts.uri.path().to_string(),
            }),
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts, state).await))
    }
}

async fn session_user(parts: &mut Parts, state: &AppState) -> Option<UserRow> {
    let jar = match SignedCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };

    let user_id = jar.get(SESSION_COOKIE)?.value().to_string();
    match state.db.get_user_by_id(&user_id) {
        Ok(user) => user,
        Err(err) => {
            warn!(error = %err, "session user lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_roundtrip() {
        let original = Flash::success("Your account has been updated");
        let decoded = Flash::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn flash_message_may_contain_separator() {
        let original = Flash::danger("Login unsuccessful: check email and password");
        let decoded = Flash::decode(&original.encode()).unwrap();
        assert_eq!(decoded.category, "danger");
        assert_eq!(decoded.message, "Login unsuccessful: check email and password");
    }

    #[test]
    fn malformed_flash_is_dropped() {
        assert!(Flash::decode("no-separator-here").is_none());
    }

    #[test]
    fn login_redirect_preserves_target() {
        let response = LoginRedirect {
            next: "/account".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/login?next=/account"
        );
    }
}
