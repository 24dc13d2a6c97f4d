use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;
pub mod slug;

// Module for routing segregation (Public, Admin).
pub mod routes;
use auth::AdminSession;
use routes::{admin, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point.
pub use config::{AppConfig, Env};
pub use error::AppError;
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe, immutable
/// container holding all essential application services. Shared across every
/// incoming request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access behind the trait object.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Session cookie encryption key, derived once at startup from the secret.
    pub key: Key,
}

impl AppState {
    /// Assembles the state from an already-constructed repository and config.
    /// The cookie key is derived here so the rest of the app never touches the
    /// raw secret.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let key = config.session_key();
        Self { repo, config, key }
    }
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors selectively pull components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// Required by PrivateCookieJar (and therefore by AdminSession).
impl FromRef<AppState> for Key {
    fn from_ref(app_state: &AppState) -> Key {
        app_state.key.clone()
    }
}

/// admin_gate
///
/// The blanket request-level gate over the admin router.
///
/// *Mechanism*: it extracts `AdminSession` from the request. If the session
/// cookie is missing, forged, or lacks the admin flag, the extractor rejects
/// with a redirect to the login path before any handler runs. The same
/// extractor appears again as a parameter of each admin handler — deliberate
/// defense in depth with a single shared verification routine, so the two
/// layers always reach the same decision for a given cookie.
async fn admin_gate(_session: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Admin surface: the login routes merge in *before* the gate layer is
        // applied, so /admin/login always passes through. Everything in
        // admin_routes sits behind the blanket gate.
        .nest(
            "/admin",
            admin::auth_routes().merge(
                admin::admin_routes()
                    .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate)),
            ),
        )
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID for every request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in a
                // span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the span created by `TraceLayer`: extracts the `x-request-id`
/// header (if present) and includes it alongside the HTTP method and URI, so
/// every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
