//! Album repository interface

use super::entity::Album;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filters applied to album listings
#[derive(Debug, Clone, Default)]
pub struct AlbumFilters {
    /// Case-insensitive substring match against the title
    pub search: Option<String>,
    /// Exact genre filter
    pub genre: Option<String>,
    /// Only albums by this artist
    pub artist_id: Option<Uuid>,
}

/// Sortable fields for album listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSortField {
    #[default]
    CreatedAt,
    Title,
    ReleaseYear,
}

impl AlbumSortField {
    /// Parse a caller-supplied field name; unknown names fall back to
    /// the default sort.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("title") => AlbumSortField::Title,
            Some("releaseYear") | Some("release_year") => AlbumSortField::ReleaseYear,
            _ => AlbumSortField::CreatedAt,
        }
    }
}

/// Album repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Persist a new album
    async fn create(&self, album: &Album) -> Result<()>;

    /// Find album by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Album>>;

    /// List albums matching `filters`, sorted and paginated
    async fn list(
        &self,
        filters: AlbumFilters,
        sort: AlbumSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Album>, u64)>;

    /// Write updated album fields
    async fn update(&self, album: &Album) -> Result<()>;

    /// Delete an album. Songs keep existing but lose their `album_id`.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
