//! User Listing API Integration Tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use soundwave::domain::user::{CreateUser, User, UserRole};
use soundwave::infrastructure::persistence::{
    MemoryAlbumRepository, MemoryFollowRepository, MemoryPlaylistRepository,
    MemorySongRepository, MemoryStore, MemoryUserRepository,
};
use soundwave::interface::api::{build_router, AppState};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot`
use uuid::Uuid;

fn setup_app() -> (Router, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        Arc::new(MemoryUserRepository::new(store.clone())),
        Arc::new(MemoryFollowRepository::new(store.clone())),
        Arc::new(MemorySongRepository::new(store.clone())),
        Arc::new(MemoryAlbumRepository::new(store.clone())),
        Arc::new(MemoryPlaylistRepository::new(store)),
    );
    let prometheus_handle = PrometheusBuilder::new().build_recorder().handle();
    let app = build_router(state.clone(), prometheus_handle);
    (app, state)
}

async fn seed_user(state: &AppState, username: &str, role: UserRole) -> User {
    state
        .users
        .create(CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
            bio: None,
            avatar_url: None,
        })
        .await
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_as(uri: &str, caller: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("x-user-id", caller.to_string())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_list_users_empty_envelope() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(
        json["data"]["pagination"],
        json!({ "page": 1, "limit": 10, "total": 0, "pages": 0 })
    );
}

#[tokio::test]
async fn test_api_list_users_pagination_shape() {
    let (app, state) = setup_app();
    for i in 0..25 {
        seed_user(&state, &format!("user{:02}", i), UserRole::Listener).await;
    }

    let json = read_json(app.clone().oneshot(get("/api/users")).await.unwrap()).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"]["pagination"]["total"], 25);
    assert_eq!(json["data"]["pagination"]["pages"], 3);

    // The last page holds the remainder
    let json = read_json(
        app.clone()
            .oneshot(get("/api/users?page=3&limit=10"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"]["pagination"]["page"], 3);

    // Pages beyond the data are empty but well-formed
    let json = read_json(app.oneshot(get("/api/users?page=9")).await.unwrap()).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["pagination"]["total"], 25);
}

#[tokio::test]
async fn test_api_list_users_limit_is_clamped() {
    let (app, state) = setup_app();
    seed_user(&state, "alice", UserRole::Listener).await;

    let json = read_json(
        app.oneshot(get("/api/users?limit=5000")).await.unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_api_list_users_junk_params_fall_back() {
    let (app, state) = setup_app();
    seed_user(&state, "alice", UserRole::Listener).await;

    let json = read_json(
        app.clone()
            .oneshot(get("/api/users?page=abc&limit=-5"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["page"], 1);
    assert_eq!(json["data"]["pagination"]["limit"], 10);

    let json = read_json(
        app.oneshot(get("/api/users?page=0&limit=0")).await.unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["page"], 1);
    assert_eq!(json["data"]["pagination"]["limit"], 10);
}

#[tokio::test]
async fn test_api_list_users_role_filter() {
    let (app, state) = setup_app();
    for i in 0..9 {
        seed_user(&state, &format!("listener{}", i), UserRole::Listener).await;
    }
    for i in 0..3 {
        seed_user(&state, &format!("artist{}", i), UserRole::Artist).await;
    }

    let json = read_json(
        app.clone()
            .oneshot(get("/api/users?role=artist"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 3);
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        assert_eq!(item["role"], "artist");
    }

    // An unknown role is a hard error, not a silent fallback
    let response = app.oneshot(get("/api/users?role=wizard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_list_users_unknown_sort_field_falls_back() {
    let (app, state) = setup_app();
    for name in ["carol", "alice", "bob"] {
        seed_user(&state, name, UserRole::Listener).await;
    }

    let default_order = read_json(app.clone().oneshot(get("/api/users")).await.unwrap()).await;
    let fallback_order = read_json(
        app.oneshot(get("/api/users?sortBy=password")).await.unwrap(),
    )
    .await;

    // The allow-list rejects the field and the default ordering applies
    assert_eq!(fallback_order["data"]["items"], default_order["data"]["items"]);
}

#[tokio::test]
async fn test_api_list_users_sort_by_username() {
    let (app, state) = setup_app();
    for name in ["carol", "alice", "bob"] {
        seed_user(&state, name, UserRole::Listener).await;
    }

    let json = read_json(
        app.clone()
            .oneshot(get("/api/users?sortBy=username&sortOrder=asc"))
            .await
            .unwrap(),
    )
    .await;
    let names: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    // Absent sortOrder means descending
    let json = read_json(
        app.oneshot(get("/api/users?sortBy=username")).await.unwrap(),
    )
    .await;
    let names: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["carol", "bob", "alice"]);
}

#[tokio::test]
async fn test_api_list_users_search_matches_username_and_email() {
    let (app, state) = setup_app();
    seed_user(&state, "dj_karla", UserRole::Artist).await;
    seed_user(&state, "synthfan", UserRole::Listener).await;
    seed_user(&state, "quietone", UserRole::Listener).await;

    // Search is case-insensitive and matches usernames
    let json = read_json(
        app.clone()
            .oneshot(get("/api/users?search=KARLA"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["username"], "dj_karla");

    let json = read_json(
        app.oneshot(get("/api/users?search=example.com")).await.unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 3);
}

#[tokio::test]
async fn test_api_get_user_by_username_hides_email() {
    let (app, state) = setup_app();
    seed_user(&state, "alice", UserRole::Listener).await;

    let response = app
        .clone()
        .oneshot(get("/api/users/username/alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["username"], "alice");
    assert!(json["data"]["email"].is_null());

    let response = app
        .oneshot(get("/api/users/username/nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_own_profile_round_trip() {
    let (app, state) = setup_app();
    let alice = seed_user(&state, "alice", UserRole::Listener).await;
    seed_user(&state, "bob", UserRole::Listener).await;

    // /me includes the email
    let json = read_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .header("x-user-id", alice.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["email"], "alice@example.com");

    // Update bio and username
    let response = app
        .clone()
        .oneshot(put_as(
            "/api/users/me",
            alice.id,
            json!({ "username": "alice_v2", "bio": "night owl" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["username"], "alice_v2");
    assert_eq!(json["data"]["bio"], "night owl");

    // Taking someone else's username is a conflict
    let response = app
        .oneshot(put_as(
            "/api/users/me",
            alice.id,
            json!({ "username": "bob" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
