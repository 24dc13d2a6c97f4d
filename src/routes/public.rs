use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// Read handlers only ever surface published posts; the repository enforces the
/// visibility filter so a draft slug is indistinguishable from a missing one.
///
/// Two mutations live here by design: likes and comments are open to anonymous
/// callers and are never admin-gated.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /posts
        // Lists published posts, newest first.
        .route("/posts", get(handlers::list_posts))
        // GET /blog/{slug}
        // A single published post by slug with its comment thread, oldest first.
        // Draft posts answer 404 here exactly like unknown slugs. Posts are
        // addressed by slug on the reading surface and by id everywhere else.
        .route("/blog/{slug}", get(handlers::get_post))
        // POST /posts/{id}/like
        // Atomically bumps the like counter. No dedup: repeat likes count.
        .route("/posts/{id}/like", post(handlers::like_post))
        // POST /posts/{id}/comments
        // Appends a comment. Server-side trim + length caps apply regardless of
        // client-side validation.
        .route("/posts/{id}/comments", post(handlers::add_comment))
}
