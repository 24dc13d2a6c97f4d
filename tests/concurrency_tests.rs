mod common;

use blogr::models::PostStatus;
use common::{client, spawn_app};

/// N concurrent likes must land as exactly +N: the increment happens at the
/// store layer, so no interleaving can lose an update.
#[tokio::test]
async fn concurrent_likes_lose_nothing() {
    let app = spawn_app().await;
    let post = app
        .repo
        .seed_post("Contended", "contended", PostStatus::Published);

    const N: usize = 50;
    let mut handles = Vec::with_capacity(N);
    for _ in 0..N {
        let url = format!("{}/posts/{}/like", app.address, post.id);
        let client = client();
        handles.push(tokio::spawn(async move {
            let response = client.post(url).send().await.unwrap();
            assert_eq!(response.status(), 200);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(app.repo.likes_of(post.id), Some(N as i32));
}

/// Concurrent comment submissions all land; ordering between them is
/// unspecified beyond the ascending-timestamp display sort.
#[tokio::test]
async fn concurrent_comments_all_land() {
    let app = spawn_app().await;
    let post = app
        .repo
        .seed_post("Busy Thread", "busy-thread", PostStatus::Published);

    const N: usize = 20;
    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let url = format!("{}/posts/{}/comments", app.address, post.id);
        let client = client();
        handles.push(tokio::spawn(async move {
            let response = client
                .post(url)
                .json(&serde_json::json!({ "user_name": format!("u{i}"), "content": "hi" }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 201);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(app.repo.comment_count(), N);
}
