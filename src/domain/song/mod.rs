//! Song domain

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{CreateSong, LikeStatus, Song, UpdateSong};
pub use repository::{SongFilters, SongRepository, SongSortField};
pub use service::SongService;
