//! End-to-end flows against a provisioned Postgres.
//!
//! These need the reunion database with the read/write roles from the
//! default configuration (override via PGHOST/PGPORT/POSTGRES_*). Run
//! with `cargo test -- --ignored`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reunion_server::config::{AppState, ServerConfig};
use reunion_server::store::Store;

async fn live_state() -> AppState {
    let config = ServerConfig::default();
    let store = Store::connect(&config.store)
        .await
        .expect("postgres must be reachable");
    store.init_schema().await.expect("schema init");
    AppState::new(&config, store)
}

async fn seed_user(state: &AppState, user_name: &str, email: &str, password: &str) -> i64 {
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).unwrap();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (user_name, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
        RETURNING id
        "#,
    )
    .bind(user_name)
    .bind(email)
    .bind(&hash)
    .fetch_one(state.store.write())
    .await
    .unwrap();
    id
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/api/authenticate",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    body["jwtToken"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires a provisioned postgres (see StoreConfig defaults)"]
async fn full_post_flow() {
    let state = live_state().await;
    let app = reunion_server::app(state.clone());

    seed_user(&state, "flow_author", "flow_author@example.com", "hunter2").await;
    seed_user(&state, "flow_other", "flow_other@example.com", "hunter2").await;

    // Wrong password is rejected before any token exists.
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/authenticate",
        None,
        Some(json!({ "email": "flow_author@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "USER_UNAUTHORISED");

    let token = login(&app, "flow_author@example.com", "hunter2").await;

    // Create a post, then read it back through the public lookup.
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/posts/",
        Some(&token),
        Some(json!({ "title": "T", "content": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    let post_id = body["newPost"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/posts/{post_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "T");
    assert_eq!(body["post"]["content"], "C");
    assert_eq!(body["post"]["comments"], json!([]));
    assert_eq!(body["post"]["likes"], 0);

    // Liking twice leaves exactly one like.
    for _ in 0..2 {
        let (status, body) = request(
            &app,
            Method::POST,
            &format!("/api/like/{post_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "SUCCESS");
    }
    let (_, body) = request(
        &app,
        Method::GET,
        &format!("/api/posts/{post_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["post"]["likes"], 1);

    // Unlike, then unlike again: the second one has nothing to remove.
    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/unlike/{post_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/unlike/{post_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "BAD_REQUEST");

    // Comment and read it back in creation order.
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/comment/{post_id}"),
        Some(&token),
        Some(json!({ "comment": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["comment"]["id"].is_i64());

    let (_, body) = request(
        &app,
        Method::GET,
        &format!("/api/posts/{post_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["post"]["comments"][0]["comment"], "hi");

    // The listing is scoped to the caller's own posts.
    let (status, body) = request(&app, Method::GET, "/api/all_posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["allPosts"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"].as_i64() == Some(post_id)));

    // Ownership: a different authenticated user cannot delete the post.
    let other_token = login(&app, "flow_other@example.com", "hunter2").await;
    let (status, body) = request(
        &app,
        Method::DELETE,
        &format!("/api/posts/{post_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "FORBIDDEN");

    // The author can, and the comment rows go with it.
    let (status, body) = request(
        &app,
        Method::DELETE,
        &format!("/api/posts/{post_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedPost"]["id"].as_i64(), Some(post_id));

    let (status, _) = request(
        &app,
        Method::GET,
        &format!("/api/posts/{post_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a provisioned postgres (see StoreConfig defaults)"]
async fn follow_edges_are_idempotent() {
    let state = live_state().await;
    let app = reunion_server::app(state.clone());

    let a = seed_user(&state, "edge_a", "edge_a@example.com", "pw").await;
    let b = seed_user(&state, "edge_b", "edge_b@example.com", "pw").await;

    let token = login(&app, "edge_a@example.com", "pw").await;

    for _ in 0..2 {
        let (status, body) = request(
            &app,
            Method::POST,
            &format!("/api/follow/{b}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "SUCCESS");
    }

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM follows WHERE user_id = $1 AND follow_user_id = $2",
    )
    .bind(a)
    .bind(b)
    .fetch_one(state.store.read())
    .await
    .unwrap();
    assert_eq!(count, 1);

    // Self-follow never reaches the store.
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/follow/{a}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "UNPROCESSABLE_ENTITY");
    assert_eq!(body["errorMessage"], "Cannot follow yourself.");

    // Following a user that does not exist is a domain rejection.
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/follow/900719925474099",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorMessage"], "User trying to follow does not exists.");

    // Unfollow removes the edge; a second unfollow has nothing left.
    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/unfollow/{b}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/unfollow/{b}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errorMessage"],
        "The user does not exists or is already unfollowed."
    );

    // Profile counts reflect the current edge set.
    let (status, body) = request(&app, Method::GET, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["id"].as_i64(), Some(a));
    assert_eq!(body["profile"]["following"], 0);
}

#[tokio::test]
#[ignore = "requires a provisioned postgres (see StoreConfig defaults)"]
async fn token_identity_survives_the_round_trip() {
    let state = live_state().await;
    let app = reunion_server::app(state.clone());

    let id = seed_user(&state, "round_trip", "round_trip@example.com", "pw").await;
    let token = login(&app, "round_trip@example.com", "pw").await;

    let claims = state.tokens.validate(&token).unwrap();
    assert_eq!(claims.id, id);
    assert_eq!(claims.email, "round_trip@example.com");
}
