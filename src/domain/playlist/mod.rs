//! Playlist domain

pub mod entity;
pub mod repository;

pub use entity::{CreatePlaylist, Playlist, UpdatePlaylist};
pub use repository::{PlaylistFilters, PlaylistRepository, PlaylistSortField};
