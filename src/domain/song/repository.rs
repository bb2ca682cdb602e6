//! Song repository interface

use super::entity::Song;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filters applied to song listings
#[derive(Debug, Clone, Default)]
pub struct SongFilters {
    /// Case-insensitive substring match against the title
    pub search: Option<String>,
    /// Exact genre filter
    pub genre: Option<String>,
    /// Only songs by this artist
    pub artist_id: Option<Uuid>,
    /// Only songs on this album
    pub album_id: Option<Uuid>,
}

/// Sortable fields for song listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SongSortField {
    #[default]
    CreatedAt,
    Title,
    PlayCount,
    LikesCount,
}

impl SongSortField {
    /// Parse a caller-supplied field name; unknown names fall back to
    /// the default sort.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("title") => SongSortField::Title,
            Some("playCount") | Some("play_count") => SongSortField::PlayCount,
            Some("likesCount") | Some("likes_count") => SongSortField::LikesCount,
            _ => SongSortField::CreatedAt,
        }
    }
}

/// Song repository trait
///
/// `set_liked` carries the same atomicity contract as the follow edges:
/// the like row and `likes_count` move together or not at all, and
/// applying a state that already holds is a no-op.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Persist a new song
    async fn create(&self, song: &Song) -> Result<()>;

    /// Find song by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>>;

    /// List songs matching `filters`, sorted and paginated
    async fn list(
        &self,
        filters: SongFilters,
        sort: SongSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Song>, u64)>;

    /// Write updated metadata fields. Counters are never written here.
    async fn update_metadata(&self, song: &Song) -> Result<()>;

    /// Delete a song and its like edges
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Atomically increment the play counter, returning the new value
    async fn record_play(&self, id: Uuid) -> Result<i64>;

    /// Whether `user_id` currently likes `song_id`
    async fn is_liked(&self, song_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Set the like state, adjusting `likes_count` only when the state
    /// actually changes
    async fn set_liked(&self, song_id: Uuid, user_id: Uuid, liked: bool) -> Result<()>;

    /// List the songs `user_id` likes, most recent like first
    async fn list_liked(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<Song>, u64)>;
}
