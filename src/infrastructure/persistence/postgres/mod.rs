//! Postgres repository implementations

mod album_repository;
mod follow_repository;
mod playlist_repository;
mod song_repository;
mod user_repository;

pub use album_repository::PgAlbumRepository;
pub use follow_repository::PgFollowRepository;
pub use playlist_repository::PgPlaylistRepository;
pub use song_repository::PgSongRepository;
pub use user_repository::PgUserRepository;
