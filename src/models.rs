use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// PostStatus
///
/// Publication state of a post. Only `Published` rows are reachable through the
/// public read path; `Draft` rows exist solely behind the admin surface.
/// Maps to the Postgres enum type `post_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Post
///
/// A blog post record from the `posts` table. The slug is derived from the title
/// once at creation and never regenerated; it is part of the public URL surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    // Raw markup, persisted verbatim after trimming. Rendering is a client concern.
    pub content: String,
    pub status: PostStatus,
    // Non-negative counter; only ever moves up via the atomic increment.
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

/// Comment
///
/// A reader comment from the `comments` table. Comments carry no verified
/// identity; `user_name` is free text supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Comment {
    // BigInt (i64) for comment IDs due to the high volume potential.
    pub id: i64,
    pub post_id: Uuid,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// Field caps enforced server-side regardless of any client validation.
pub const TITLE_MAX_LEN: usize = 200;
pub const COMMENT_USER_NAME_MAX_LEN: usize = 50;
pub const COMMENT_CONTENT_MAX_LEN: usize = 1000;

/// CreatePostRequest
///
/// Input payload for submitting a new post (POST /admin/posts).
/// `status` defaults to draft when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
}

/// UpdatePostRequest
///
/// Full-replacement payload for editing a post (PUT /admin/posts/{id}).
/// The slug is deliberately not part of this payload: it is immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
}

/// CreateCommentRequest
///
/// Input payload for posting a new comment (POST /posts/{id}/comments).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateCommentRequest {
    pub user_name: String,
    pub content: String,
}

/// LoginRequest
///
/// Input payload for the admin login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginRequest {
    pub password: String,
}

// --- Validated Inputs ---

/// PostInput
///
/// Title and content after server-side validation: both trimmed, both non-empty,
/// title within its cap. Constructed only through [`validate_post_input`], so a
/// value of this type is safe to hand to the repository.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
}

/// validate_post_input
///
/// Shared validation for create and update: trims both fields, rejects empties,
/// and bounds the title length. Content length is unbounded by design (it holds
/// the full article body).
pub fn validate_post_input(
    title: &str,
    content: &str,
    status: PostStatus,
) -> Result<PostInput, AppError> {
    let title = title.trim();
    let content = content.trim();

    if title.is_empty() || content.is_empty() {
        return Err(AppError::Validation(
            "Title and content are required.".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters."
        )));
    }

    Ok(PostInput {
        title: title.to_string(),
        content: content.to_string(),
        status,
    })
}

/// CommentInput
///
/// A comment after server-side trimming and length-capping. Capping (rather than
/// rejecting) oversized fields mirrors how the public form behaves: readers never
/// see a length error, their input is simply cut at the limit.
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub user_name: String,
    pub content: String,
}

/// validate_comment_input
///
/// Rejects blank fields before anything reaches storage, then applies the caps.
pub fn validate_comment_input(user_name: &str, content: &str) -> Result<CommentInput, AppError> {
    let user_name = user_name.trim();
    let content = content.trim();

    if user_name.is_empty() || content.is_empty() {
        return Err(AppError::Validation(
            "Name and content are required.".to_string(),
        ));
    }

    Ok(CommentInput {
        user_name: truncate_chars(user_name, COMMENT_USER_NAME_MAX_LEN),
        content: truncate_chars(content, COMMENT_CONTENT_MAX_LEN),
    })
}

/// Character-boundary-safe truncation (String::truncate panics mid-codepoint).
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// --- Response Schemas ---

/// PostDetail
///
/// Output schema for the public post detail view: the post plus its comment
/// thread, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// LikeResponse
///
/// Output of the like endpoint: the counter value after the increment, letting
/// optimistic clients reconcile against the authoritative count.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LikeResponse {
    pub likes: i32,
}
