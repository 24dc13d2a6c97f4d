use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Split in two on purpose:
///
/// - [`auth_routes`] is mounted *outside* the gate so the login path always
///   passes through — otherwise nobody could ever log in.
/// - [`admin_routes`] holds everything gated. The caller (lib.rs) wraps this
///   router in the `admin_gate` middleware; every handler inside additionally
///   extracts `AdminSession` itself. Both layers share one verification
///   routine, so they cannot disagree.

/// Ungated login surface under /admin.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/login
        // The landing target for every rejected admin request. The JSON API has
        // no form to render; a 200 here just gives the redirect somewhere to go.
        //
        // POST /admin/login
        // Password check against the configured secret. Success sets the
        // session cookie and redirects to the admin home; failure is one
        // generic message, always the same.
        .route(
            "/login",
            get(|| async { "login required" }).post(handlers::login),
        )
}

/// Gated admin surface under /admin.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /admin/logout
        // Destroys the session cookie and redirects back to login.
        .route("/logout", post(handlers::logout))
        // GET /admin/posts
        // Lists ALL posts regardless of status, drafts included.
        // POST /admin/posts
        // Creates a post; slug derivation and collision handling live in the
        // handler.
        .route(
            "/posts",
            get(handlers::admin_list_posts).post(handlers::create_post),
        )
        // GET /admin/posts/{id}
        // Any post by id (edit-form data source).
        // PUT /admin/posts/{id}
        // In-place edit of title/content/status; the slug never changes.
        // DELETE /admin/posts/{id}
        // Removes the post and, via schema cascade, its comments.
        .route(
            "/posts/{id}",
            get(handlers::admin_get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        // PUT /admin/posts/{id}/status
        // Flips published<->draft atomically.
        .route("/posts/{id}/status", put(handlers::toggle_post_status))
}
