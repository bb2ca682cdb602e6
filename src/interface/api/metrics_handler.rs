//! Prometheus metrics handler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new().install_recorder().unwrap();

    // Describe metrics
    describe_counter!(
        "follow_toggles_total",
        "Total number of follow/unfollow toggles"
    );
    describe_counter!("song_plays_total", "Total number of song playback events");
    describe_counter!(
        "song_likes_total",
        "Total number of song like/unlike toggles"
    );
    describe_counter!(
        "listing_requests_total",
        "Total number of listing requests by resource"
    );

    handle
}

/// HTTP metrics handler
pub async fn metrics_handler(
    axum::extract::State(prometheus_handle): axum::extract::State<PrometheusHandle>,
) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}

/// Record a follow toggle with its resulting direction
pub fn record_follow_toggle(following: bool) {
    let action = if following { "follow" } else { "unfollow" };
    counter!("follow_toggles_total", "action" => action).increment(1);
}

/// Record a song playback event
pub fn record_song_play() {
    counter!("song_plays_total").increment(1);
}

/// Record a like toggle with its resulting direction
pub fn record_song_like(liked: bool) {
    let action = if liked { "like" } else { "unlike" };
    counter!("song_likes_total", "action" => action).increment(1);
}

/// Record a listing request against a resource collection
pub fn record_listing(resource: &'static str) {
    counter!("listing_requests_total", "resource" => resource).increment(1);
}
