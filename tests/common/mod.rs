#![allow(dead_code)]

use async_trait::async_trait;
use blogr::{
    AppConfig, AppState, create_router,
    models::{Comment, Post, PostInput, PostStatus},
    repository::{Repository, RepositoryState},
};
use chrono::Utc;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};
use tokio::net::TcpListener;
use uuid::Uuid;

// --- In-Memory Repository ---

/// MemoryRepository
///
/// A full in-memory implementation of the Repository trait so the HTTP surface
/// can be exercised without a database. Tests hold an Arc to it and may inspect
/// the raw store directly after driving the API.
#[derive(Default)]
pub struct MemoryRepository {
    pub posts: Mutex<Vec<Post>>,
    pub comments: Mutex<Vec<Comment>>,
    next_comment_id: AtomicI64,
}

impl MemoryRepository {
    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }

    pub fn likes_of(&self, id: Uuid) -> Option<i32> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.likes)
    }

    /// Seeds a post directly into the store, bypassing the HTTP surface.
    pub fn seed_post(&self, title: &str, slug: &str, status: PostStatus) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            content: "seeded content".to_string(),
            status,
            likes: 0,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_published(&self) -> Result<Vec<Post>, sqlx::Error> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, sqlx::Error> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug && p.status == PostStatus::Published)
            .cloned())
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(comments)
    }

    async fn list_all(&self) -> Result<Vec<Post>, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        Ok(self.posts.lock().unwrap().iter().any(|p| p.slug == slug))
    }

    async fn insert_post(&self, input: PostInput, slug: String) -> Result<Post, sqlx::Error> {
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            slug,
            content: input.content,
            status: input.status,
            likes: 0,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.title = input.title;
                post.content = input.content;
                post.status = input.status;
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        let removed = posts.len() < before;
        if removed {
            // Mirror the schema's ON DELETE CASCADE.
            self.comments.lock().unwrap().retain(|c| c.post_id != id);
        }
        Ok(removed)
    }

    async fn toggle_status(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.status = match post.status {
                    PostStatus::Published => PostStatus::Draft,
                    PostStatus::Draft => PostStatus::Published,
                };
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<i32>, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.likes += 1;
                Ok(Some(post.likes))
            }
            None => Ok(None),
        }
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        user_name: String,
        content: String,
    ) -> Result<Comment, sqlx::Error> {
        // Mirror the schema's foreign key: inserting against a missing post
        // fails with a foreign-key violation, not a silent orphan.
        if !self.posts.lock().unwrap().iter().any(|p| p.id == post_id) {
            return Err(sqlx::Error::Database(Box::new(ForeignKeyViolation)));
        }
        let comment = Comment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst) + 1,
            post_id,
            user_name,
            content,
            created_at: Utc::now(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }
}

/// Stand-in for Postgres's FK violation so the in-memory store reports a
/// missing comment target the same way the real database does.
#[derive(Debug)]
struct ForeignKeyViolation;

impl std::fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("insert on \"comments\" violates foreign key constraint")
    }
}

impl std::error::Error for ForeignKeyViolation {}

impl sqlx::error::DatabaseError for ForeignKeyViolation {
    fn message(&self) -> &str {
        "insert on \"comments\" violates foreign key constraint"
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::ForeignKeyViolation
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }
}

// --- Test Application ---

pub struct TestApp {
    pub address: String,
    pub repo: Arc<MemoryRepository>,
    pub admin_password: String,
}

/// spawn_app
///
/// Boots the full router (gate middleware, cookie key, all routes) against an
/// in-memory repository on an ephemeral port and returns a handle for driving
/// it over real HTTP.
pub async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::default());
    let config = AppConfig::default();
    let admin_password = config.admin_password.clone();

    let repo_state: RepositoryState = repo.clone();
    let state = AppState::new(repo_state, config);
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        repo,
        admin_password,
    }
}

/// A client that keeps cookies but never follows redirects, so tests can
/// assert on the 303s themselves.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

impl TestApp {
    /// Logs the client in with the configured admin password and asserts the
    /// redirect that signals success.
    pub async fn login(&self, client: &reqwest::Client) {
        let response = client
            .post(format!("{}/admin/login", self.address))
            .json(&serde_json::json!({ "password": self.admin_password }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), 303, "login should redirect on success");
    }
}
