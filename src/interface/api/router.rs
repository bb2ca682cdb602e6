//! API Router configuration

use super::album_handler::{
    album_songs, create_album, delete_album, get_album, list_albums, update_album,
};
use super::artist_handler::{artist_albums, artist_songs};
use super::metrics_handler::metrics_handler;
use super::playlist_handler::{
    add_playlist_song, create_playlist, delete_playlist, get_playlist, list_playlists,
    remove_playlist_song, update_playlist,
};
use super::song_handler::{
    create_song, delete_song, get_song, liked_songs, list_songs, record_play, toggle_like,
    trending_songs, update_song,
};
use super::user_handler::{
    get_me, get_user, get_user_by_username, health_check, list_followers, list_following,
    list_users, toggle_follow, update_me, AppState,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router
pub fn build_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Health check route (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    // User and follow routes
    let user_routes = Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/me", put(update_me))
        .route("/users/me/songs/liked", get(liked_songs))
        .route("/users/username/:username", get(get_user_by_username))
        .route("/users/:id", get(get_user))
        .route("/users/:id/follow", post(toggle_follow))
        .route("/users/:id/followers", get(list_followers))
        .route("/users/:id/following", get(list_following));

    // Artist catalog routes
    let artist_routes = Router::new()
        .route("/artists/:id/songs", get(artist_songs))
        .route("/artists/:id/albums", get(artist_albums));

    // Song routes
    let song_routes = Router::new()
        .route("/songs", get(list_songs))
        .route("/songs", post(create_song))
        .route("/songs/trending", get(trending_songs))
        .route("/songs/:id", get(get_song))
        .route("/songs/:id", put(update_song))
        .route("/songs/:id", delete(delete_song))
        .route("/songs/:id/like", post(toggle_like))
        .route("/songs/:id/play", post(record_play));

    // Album routes
    let album_routes = Router::new()
        .route("/albums", get(list_albums))
        .route("/albums", post(create_album))
        .route("/albums/:id", get(get_album))
        .route("/albums/:id", put(update_album))
        .route("/albums/:id", delete(delete_album))
        .route("/albums/:id/songs", get(album_songs));

    // Playlist routes
    let playlist_routes = Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlists", post(create_playlist))
        .route("/playlists/:id", get(get_playlist))
        .route("/playlists/:id", put(update_playlist))
        .route("/playlists/:id", delete(delete_playlist))
        .route("/playlists/:id/songs/:song_id", post(add_playlist_song))
        .route("/playlists/:id/songs/:song_id", delete(remove_playlist_song));

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Combine routes with state
    let api_routes = Router::new()
        .merge(user_routes)
        .merge(artist_routes)
        .merge(song_routes)
        .merge(album_routes)
        .merge(playlist_routes);

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
