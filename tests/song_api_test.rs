//! Song API Integration Tests

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

fn post_as(uri: &str, caller: Uuid) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-user-id", caller.to_string())
        .body(Body::empty())
        .unwrap()
}

fn json_as(method: &str, uri: &str, caller: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
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

fn song_payload(title: &str) -> Value {
    json!({
        "title": title,
        "genre": "synthwave",
        "duration_secs": 215,
        "audio_url": format!("https://cdn.example.com/audio/{}.mp3", title),
    })
}

/// Create a song through the API and return its id
async fn publish_song(app: &Router, artist: &User, title: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_as("POST", "/api/songs", artist.id, song_payload(title)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_api_publish_song_requires_artist_role() {
    let (app, state) = setup_app();
    let listener = seed_user(&state, "listener", UserRole::Listener).await;
    let artist = seed_user(&state, "artist", UserRole::Artist).await;

    let response = app
        .clone()
        .oneshot(json_as(
            "POST",
            "/api/songs",
            listener.id,
            song_payload("Nope"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(json_as(
            "POST",
            "/api/songs",
            artist.id,
            song_payload("Neon Nights"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["data"]["title"], "Neon Nights");
    assert_eq!(json["data"]["play_count"], 0);
    assert_eq!(json["data"]["likes_count"], 0);
    assert_eq!(json["data"]["artist_id"], artist.id.to_string());
}

#[tokio::test]
async fn test_api_publish_song_validation() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;

    let response = app
        .clone()
        .oneshot(json_as(
            "POST",
            "/api/songs",
            artist.id,
            json!({ "title": "   ", "duration_secs": 10, "audio_url": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_as(
            "POST",
            "/api/songs",
            artist.id,
            json!({ "title": "Short", "duration_secs": 0, "audio_url": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_like_toggle_moves_counter() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let fan = seed_user(&state, "fan", UserRole::Listener).await;
    let song_id = publish_song(&app, &artist, "Gliding").await;

    let json = read_json(
        app.clone()
            .oneshot(post_as(&format!("/api/songs/{}/like", song_id), fan.id))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["liked"], true);

    let json = read_json(
        app.clone()
            .oneshot(get(&format!("/api/songs/{}", song_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["likes_count"], 1);

    // Second toggle takes the like back
    let json = read_json(
        app.clone()
            .oneshot(post_as(&format!("/api/songs/{}/like", song_id), fan.id))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["liked"], false);

    let json = read_json(
        app.oneshot(get(&format!("/api/songs/{}", song_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["likes_count"], 0);
}

#[tokio::test]
async fn test_api_play_endpoint_counts_anonymous_plays() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let song_id = publish_song(&app, &artist, "Runner").await;

    for expected in 1..=3 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/songs/{}/play", song_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["data"]["play_count"], expected);
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/songs/{}/play", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_trending_ranks_by_play_count() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let quiet = publish_song(&app, &artist, "Quiet").await;
    let mid = publish_song(&app, &artist, "Mid").await;
    let hit = publish_song(&app, &artist, "Hit").await;

    for (song_id, plays) in [(mid, 2), (hit, 5)] {
        for _ in 0..plays {
            app.clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/songs/{}/play", song_id))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
        }
    }

    let json = read_json(app.oneshot(get("/api/songs/trending")).await.unwrap()).await;
    let ids: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids[0], hit.to_string());
    assert_eq!(ids[1], mid.to_string());
    assert_eq!(ids[2], quiet.to_string());
}

#[tokio::test]
async fn test_api_liked_songs_listing() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let fan = seed_user(&state, "fan", UserRole::Listener).await;
    let first = publish_song(&app, &artist, "First").await;
    let second = publish_song(&app, &artist, "Second").await;
    publish_song(&app, &artist, "Unliked").await;

    for song_id in [first, second] {
        app.clone()
            .oneshot(post_as(&format!("/api/songs/{}/like", song_id), fan.id))
            .await
            .unwrap();
    }

    let json = read_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/users/me/songs/liked")
                    .header("x-user-id", fan.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 2);
    // Most recently liked first
    assert_eq!(json["data"]["items"][0]["id"], second.to_string());
    assert_eq!(json["data"]["items"][1]["id"], first.to_string());

    // The listing is caller-scoped
    let response = app
        .oneshot(get("/api/users/me/songs/liked"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_update_song_enforces_ownership() {
    let (app, state) = setup_app();
    let owner = seed_user(&state, "owner", UserRole::Artist).await;
    let rival = seed_user(&state, "rival", UserRole::Artist).await;
    let admin = seed_user(&state, "admin", UserRole::Admin).await;
    let song_id = publish_song(&app, &owner, "Mine").await;

    let response = app
        .clone()
        .oneshot(json_as(
            "PUT",
            &format!("/api/songs/{}", song_id),
            rival.id,
            json!({ "title": "Stolen" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_as(
            "PUT",
            &format!("/api/songs/{}", song_id),
            owner.id,
            json!({ "title": "Mine v2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["title"], "Mine v2");

    // Admins may moderate any song
    let response = app
        .clone()
        .oneshot(json_as(
            "PUT",
            &format!("/api/songs/{}", song_id),
            admin.id,
            json!({ "genre": "ambient" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Deletion follows the same rule
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/songs/{}", song_id))
                .header("x-user-id", rival.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/songs/{}", song_id))
                .header("x-user-id", owner.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/songs/{}", song_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_song_listing_filters() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let other = seed_user(&state, "other", UserRole::Artist).await;
    publish_song(&app, &artist, "Alpha").await;
    publish_song(&app, &other, "Beta").await;

    let json = read_json(
        app.clone()
            .oneshot(get(&format!("/api/songs?artist={}", artist.id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "Alpha");

    let json = read_json(
        app.clone()
            .oneshot(get("/api/songs?search=bet"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "Beta");

    // A malformed artist filter is rejected rather than ignored
    let response = app
        .oneshot(get("/api/songs?artist=not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_publish_song_rejects_foreign_album() {
    let (app, state) = setup_app();
    let owner = seed_user(&state, "owner", UserRole::Artist).await;
    let rival = seed_user(&state, "rival", UserRole::Artist).await;

    let response = app
        .clone()
        .oneshot(json_as(
            "POST",
            "/api/albums",
            owner.id,
            json!({ "title": "Owner LP" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let album = read_json(response).await;
    let album_id = album["data"]["id"].as_str().unwrap();

    let mut payload = song_payload("Intruder");
    payload["album_id"] = json!(album_id);
    let response = app
        .oneshot(json_as("POST", "/api/songs", rival.id, payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_artist_catalog_listing() {
    let (app, state) = setup_app();
    let artist = seed_user(&state, "artist", UserRole::Artist).await;
    let other = seed_user(&state, "other", UserRole::Artist).await;
    publish_song(&app, &artist, "Solo").await;
    publish_song(&app, &other, "Elsewhere").await;

    let json = read_json(
        app.clone()
            .oneshot(get(&format!("/api/artists/{}/songs", artist.id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "Solo");

    // Unknown artists simply have an empty catalog
    let json = read_json(
        app.oneshot(get(&format!("/api/artists/{}/songs", Uuid::new_v4())))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["data"]["pagination"]["total"], 0);
}
