use crate::models::{Comment, Post, PostInput};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. Handlers
/// interact with the data layer through this trait without knowing the
/// concrete implementation (Postgres in production, an in-memory store in
/// tests).
///
/// Every method returns `Result` so a store failure propagates as a fatal
/// error for that single request; nothing here retries. Visibility rules are
/// enforced at this layer: the `*_published` methods apply the
/// `status = 'published'` filter unconditionally, so a draft post is
/// indistinguishable from a missing one on the public path.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's async task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Public Reads ---
    /// Published posts, newest first.
    async fn list_published(&self) -> Result<Vec<Post>, sqlx::Error>;
    /// A post by slug, only if published. Draft or unknown: `None` either way.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, sqlx::Error>;
    /// Comment thread for a post, oldest first.
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error>;

    // --- Admin Reads ---
    /// All posts regardless of status, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, sqlx::Error>;
    /// A post by id with no visibility filter.
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    /// Whether a slug is already taken. Used for collision disambiguation.
    async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error>;

    // --- Mutations ---
    /// Inserts a new post with a caller-provided (already unique) slug.
    async fn insert_post(&self, input: PostInput, slug: String) -> Result<Post, sqlx::Error>;
    /// Replaces title/content/status in place. The slug is never touched.
    async fn update_post(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, sqlx::Error>;
    /// Deletes a post; the schema cascades to its comments. False if absent.
    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// Atomically flips published<->draft in a single statement.
    async fn toggle_status(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    /// Atomic `likes = likes + 1` at the store layer; never read-then-write.
    /// Returns the new count, or `None` if the post does not exist.
    async fn increment_likes(&self, id: Uuid) -> Result<Option<i32>, sqlx::Error>;
    /// Inserts a comment with a server-assigned timestamp.
    async fn insert_comment(
        &self,
        post_id: Uuid,
        user_name: String,
        content: String,
    ) -> Result<Comment, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, title, slug, content, status, likes, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    /// list_published
    ///
    /// **Security**: strictly enforces `WHERE status = 'published'` in the base
    /// query; anonymous callers never see drafts.
    async fn list_published(&self) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status = 'published' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1 AND status = 'published'"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, user_name, content, created_at \
             FROM comments WHERE post_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    /// list_all
    ///
    /// Administrative listing. **Note**: does *not* include the status filter.
    async fn list_all(&self) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    async fn insert_post(&self, input: PostInput, slug: String) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (id, title, slug, content, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {POST_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.title)
        .bind(slug)
        .bind(input.content)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_post(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts SET title = $2, content = $3, status = $4 \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(input.title)
        .bind(input.content)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        // Comments go with the post via ON DELETE CASCADE; one statement, no
        // application-level transaction needed.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// toggle_status
    ///
    /// The flip happens inside the UPDATE itself, so two concurrent toggles
    /// serialize at the row and each one flips exactly once.
    async fn toggle_status(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts SET status = CASE WHEN status = 'published' \
             THEN 'draft'::post_status ELSE 'published'::post_status END \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// increment_likes
    ///
    /// A single atomic UPDATE. Reading the counter and writing it back from the
    /// application would lose updates under concurrent likes; this form cannot.
    async fn increment_likes(&self, id: Uuid) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE posts SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        user_name: String,
        content: String,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, user_name, content) VALUES ($1, $2, $3) \
             RETURNING id, post_id, user_name, content, created_at",
        )
        .bind(post_id)
        .bind(user_name)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }
}
