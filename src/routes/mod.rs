/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules so
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.

/// Routes accessible to all callers (anonymous, read plus the two public
/// mutations: likes and comments). Visibility checks (`status = 'published'`)
/// are enforced at the Repository level.
pub mod public;

/// The admin surface: login/logout plus the gated mutation routes, all nested
/// under `/admin`.
pub mod admin;
