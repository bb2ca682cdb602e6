//! Playlist repository interface

use super::entity::Playlist;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filters applied to playlist listings
#[derive(Debug, Clone, Default)]
pub struct PlaylistFilters {
    /// Case-insensitive substring match against the name
    pub search: Option<String>,
}

/// Sortable fields for playlist listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistSortField {
    #[default]
    CreatedAt,
    Name,
}

impl PlaylistSortField {
    /// Parse a caller-supplied field name; unknown names fall back to
    /// the default sort.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("name") => PlaylistSortField::Name,
            _ => PlaylistSortField::CreatedAt,
        }
    }
}

/// Playlist repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Persist a new playlist
    async fn create(&self, playlist: &Playlist) -> Result<()>;

    /// Find playlist by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>>;

    /// List playlists visible to `viewer`: public ones plus the
    /// viewer's own. An anonymous viewer sees only public playlists.
    async fn list(
        &self,
        viewer: Option<Uuid>,
        filters: PlaylistFilters,
        sort: PlaylistSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Playlist>, u64)>;

    /// Write the playlist back, including its song membership
    async fn save(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist and its song membership
    async fn delete(&self, id: Uuid) -> Result<()>;
}
