//! In-memory persistence
//!
//! Backs builds without the `postgres` feature and the integration
//! tests. All repositories share one `MemoryStore` so cross-entity
//! operations see a single consistent state.

mod album_repository;
mod follow_repository;
mod playlist_repository;
mod song_repository;
mod store;
mod user_repository;

pub use album_repository::MemoryAlbumRepository;
pub use follow_repository::MemoryFollowRepository;
pub use playlist_repository::MemoryPlaylistRepository;
pub use song_repository::MemorySongRepository;
pub use store::MemoryStore;
pub use user_repository::MemoryUserRepository;
