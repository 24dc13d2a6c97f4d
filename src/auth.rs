use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::session;

/// The redirect target for every rejected admin request. Authorization
/// failures are never explained, only redirected: the admin surface reveals
/// *where* to go, not *why* access was denied.
pub const LOGIN_PATH: &str = "/admin/login";

/// AdminSession Extractor
///
/// The resolved proof that a request carries a valid admin session. This is the
/// **single authorization-decision routine** in the system: the blanket gate
/// middleware over the admin router and every individual admin handler both
/// obtain their decision by extracting this type, so the two layers can never
/// disagree about a given cookie.
///
/// The struct is deliberately empty. There is no user identity to resolve;
/// possession of the value is the authorization.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

/// AdminSession Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AdminSession usable as a
/// function argument in any admin handler (and in the gate middleware).
///
/// The process:
/// 1. Decode the private cookie jar using the server key from the app state.
/// 2. Load the session, failing open to the empty session on any malformed,
///    forged, or absent cookie.
/// 3. Accept only `is_admin == true`.
///
/// Rejection: a 303 redirect to the login path. Never an error status, never a
/// reason.
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    // Allows the extractor to pull the cookie encryption key from the app state.
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // PrivateCookieJar extraction is infallible; an invalid Cookie header
        // simply produces an empty jar.
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        if session::load(&jar).is_admin {
            Ok(AdminSession)
        } else {
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
