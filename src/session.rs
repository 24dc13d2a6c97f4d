use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "blogr_admin_session";

/// Cookie lifetime. There is no server-side expiry tracking beyond this. The
/// max-age is set once at login and never refreshed by the gate, so a session
/// ends 24 hours after login regardless of activity.
const SESSION_MAX_AGE: time::Duration = time::Duration::hours(24);

/// SessionData
///
/// The entire session record: one boolean. No user identity, no roles. The
/// value lives client-side inside an encrypted, authenticated cookie; the
/// server stores nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub is_admin: bool,
}

/// load
///
/// Decodes the session from the private jar. This **fails open to the empty
/// session**: a missing cookie, a cookie that fails decryption/authentication,
/// or an undeserializable payload all yield `SessionData::default()`. A forged
/// cookie must be indistinguishable from no cookie at all, and decoding must
/// never surface an error to the caller.
pub fn load(jar: &PrivateCookieJar) -> SessionData {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// save
///
/// Serializes the session into the jar, replacing any previous value. The jar
/// encrypts and signs the payload; the attributes below are the security
/// contract for the cookie itself (`secure` is driven by the environment so
/// local plain-HTTP development still works).
pub fn save(jar: PrivateCookieJar, session: &SessionData, secure: bool) -> PrivateCookieJar {
    let value =
        serde_json::to_string(session).expect("session serialization is infallible");

    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(SESSION_MAX_AGE)
        .build();

    jar.add(cookie)
}

/// destroy
///
/// Removes the session cookie, effectively logging out. The removal cookie
/// must carry the same path as the one set by [`save`] or browsers will keep
/// the original.
pub fn destroy(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}
