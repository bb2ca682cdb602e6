//! API interface implementations

pub mod album_dto;
pub mod album_handler;
pub mod artist_handler;
pub mod auth;
pub mod metrics_handler;
pub mod playlist_dto;
pub mod playlist_handler;
pub mod response;
pub mod router;
pub mod song_dto;
pub mod song_handler;
pub mod user_dto;
pub mod user_handler;

pub use auth::{CallerIdentity, MaybeCaller, CALLER_HEADER};
pub use metrics_handler::init_metrics;
pub use response::{ApiError, ApiResponse};
pub use router::build_router;
pub use user_handler::AppState;
