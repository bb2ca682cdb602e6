//! Album domain

pub mod entity;
pub mod repository;

pub use entity::{Album, CreateAlbum, UpdateAlbum};
pub use repository::{AlbumFilters, AlbumRepository, AlbumSortField};
