use crate::{
    AppState,
    auth::{AdminSession, LOGIN_PATH},
    error::{AppError, is_foreign_key_violation},
    models::{
        Comment, CreateCommentRequest, CreatePostRequest, LikeResponse, LoginRequest, Post,
        PostDetail, UpdatePostRequest, validate_comment_input, validate_post_input,
    },
    session::{self, SessionData},
    slug::{disambiguate_slug, generate_slug},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use uuid::Uuid;

use crate::config::Env;

/// Where a successful login lands.
const ADMIN_HOME: &str = "/admin/posts";

// --- Public Handlers ---

/// list_posts
///
/// [Public Route] Lists published posts, newest first.
///
/// *Security*: the repository applies the `status = 'published'` filter
/// unconditionally; drafts never leak through this path.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.repo.list_published().await?))
}

/// get_post
///
/// [Public Route] Retrieves a single published post by slug, together with its
/// comment thread (oldest first).
///
/// A draft post's slug answers exactly like an unknown slug: generic 404.
/// Distinguishing the two would leak the existence of unpublished content.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    let post = state
        .repo
        .find_published_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let comments = state.repo.comments_for_post(post.id).await?;
    Ok(Json(PostDetail { post, comments }))
}

/// like_post
///
/// [Public Route] Increments a post's like counter by one.
///
/// No dedup and no upper bound: the same caller may like repeatedly. The
/// increment is a single atomic UPDATE at the store layer, so concurrent likes
/// cannot lose updates. Returns the new count so optimistic clients can
/// reconcile their tentative state against the authoritative value.
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>, AppError> {
    match state.repo.increment_likes(id).await? {
        Some(likes) => Ok(Json(LikeResponse { likes })),
        None => Err(AppError::NotFound),
    }
}

/// add_comment
///
/// [Public Route] Posts a new comment. Comments require no session; anyone may
/// write one under any name.
///
/// Input is trimmed and length-capped server-side even if the client already
/// validated; blank fields are rejected before anything reaches storage. The
/// timestamp is assigned by the store.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let input = validate_comment_input(&payload.user_name, &payload.content)?;

    // The foreign key is the existence check. Commenting on a post that does
    // not exist is a generic 404, even if the post vanishes mid-request.
    let comment = match state
        .repo
        .insert_comment(post_id, input.user_name, input.content)
        .await
    {
        Ok(comment) => comment,
        Err(err) if is_foreign_key_violation(&err) => return Err(AppError::NotFound),
        Err(err) => return Err(err.into()),
    };
    Ok((StatusCode::CREATED, Json(comment)))
}

// --- Admin Handlers ---
//
// Every handler below takes `AdminSession` even though the admin router is
// already wrapped in the gate middleware. Both layers delegate to the same
// extractor, so they always reach the same decision for a given cookie; the
// second check costs one cookie decode and guards against a route ever being
// mounted outside the gated router.

/// admin_list_posts
///
/// [Admin Route] Lists ALL posts regardless of status, newest first.
pub async fn admin_list_posts(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.repo.list_all().await?))
}

/// admin_get_post
///
/// [Admin Route] Retrieves any post by id, drafts included. Backs the edit form.
pub async fn admin_get_post(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    match state.repo.find_post(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound),
    }
}

/// create_post
///
/// [Admin Route] Creates a new post. The slug is derived from the title here,
/// once, and never recomputed afterwards.
///
/// Slug collisions are resolved, not rejected: an existing slug gets a
/// millisecond-timestamp suffix so two posts may share a title. A title that
/// normalizes to nothing (all punctuation) falls back to a generic base before
/// disambiguation.
pub async fn create_post(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let input = validate_post_input(&payload.title, &payload.content, payload.status)?;

    let mut slug = generate_slug(&input.title);
    if slug.is_empty() {
        slug = "post".to_string();
    }
    if state.repo.slug_exists(&slug).await? {
        slug = disambiguate_slug(&slug);
    }

    let post = state.repo.insert_post(input, slug).await?;
    tracing::info!(post_id = %post.id, slug = %post.slug, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_post
///
/// [Admin Route] Replaces a post's title, content, and status in place. The
/// slug is untouched by design — it is part of the public URL surface and must
/// survive edits.
pub async fn update_post(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let input = validate_post_input(&payload.title, &payload.content, payload.status)?;

    match state.repo.update_post(id, input).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound),
    }
}

/// delete_post
///
/// [Admin Route] Deletes a post. Its comments go with it (cascade at the
/// schema level), so no orphaned comments remain queryable.
pub async fn delete_post(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_post(id).await? {
        tracing::info!(post_id = %id, "post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// toggle_post_status
///
/// [Admin Route] Flips a post between published and draft. The flip is a
/// single atomic statement at the store layer; no read-then-write.
pub async fn toggle_post_status(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    match state.repo.toggle_status(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound),
    }
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] Compares the submitted password against the single
/// configured admin password. On match, writes `is_admin = true` into the
/// encrypted session cookie and redirects to the admin home.
///
/// On failure the response is always the same generic message — wrong
/// password, empty password, and malformed input are indistinguishable (the
/// Json extractor's rejection is folded into the same denial), and there is
/// no lockout or rate limiting.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(PrivateCookieJar, Redirect), AppError> {
    let password = match payload {
        Ok(Json(LoginRequest { password })) => password,
        Err(_) => return Err(AppError::AccessDenied),
    };

    if password.is_empty() || password != state.config.admin_password {
        return Err(AppError::AccessDenied);
    }

    let secure = state.config.env == Env::Production;
    let jar = session::save(jar, &SessionData { is_admin: true }, secure);
    tracing::info!("admin session opened");
    Ok((jar, Redirect::to(ADMIN_HOME)))
}

/// logout
///
/// [Admin Route] Destroys the session cookie and redirects to the login path.
pub async fn logout(
    _session: AdminSession,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let jar = session::destroy(jar);
    tracing::info!("admin session closed");
    (jar, Redirect::to(LOGIN_PATH))
}
