//! Persistence implementations

pub mod memory;
#[cfg(feature = "postgres")]
pub mod database;
#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use database::{create_pool, run_migrations, DatabaseConfig};
pub use memory::{
    MemoryAlbumRepository, MemoryFollowRepository, MemoryPlaylistRepository,
    MemorySongRepository, MemoryStore, MemoryUserRepository,
};
#[cfg(feature = "postgres")]
pub use postgres::{
    PgAlbumRepository, PgFollowRepository, PgPlaylistRepository, PgSongRepository,
    PgUserRepository,
};
