//! In-memory playlist repository

use super::store::{paginate, MemoryStore};
use crate::domain::playlist::{
    Playlist, PlaylistFilters, PlaylistRepository, PlaylistSortField,
};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemoryPlaylistRepository {
    store: Arc<MemoryStore>,
}

impl MemoryPlaylistRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn matches(playlist: &Playlist, viewer: Option<Uuid>, filters: &PlaylistFilters) -> bool {
    if !playlist.is_visible_to(viewer) {
        return false;
    }
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !playlist.name.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    true
}

fn order(a: &Playlist, b: &Playlist, sort: PlaylistSortField, direction: SortDirection) -> Ordering {
    let ord = match sort {
        PlaylistSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        PlaylistSortField::Name => a.name.cmp(&b.name),
    }
    .then_with(|| a.id.cmp(&b.id));
    if direction.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

#[async_trait]
impl PlaylistRepository for MemoryPlaylistRepository {
    async fn create(&self, playlist: &Playlist) -> Result<()> {
        self.store.with(|inner| {
            inner.playlists.insert(playlist.id, playlist.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>> {
        self.store.with(|inner| Ok(inner.playlists.get(&id).cloned()))
    }

    async fn list(
        &self,
        viewer: Option<Uuid>,
        filters: PlaylistFilters,
        sort: PlaylistSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Playlist>, u64)> {
        self.store.with(|inner| {
            let mut found: Vec<Playlist> = inner
                .playlists
                .values()
                .filter(|p| matches(p, viewer, &filters))
                .cloned()
                .collect();
            found.sort_by(|a, b| order(a, b, sort, direction));

            let total = found.len() as u64;
            Ok((paginate(found, &page), total))
        })
    }

    async fn save(&self, playlist: &Playlist) -> Result<()> {
        self.store.with(|inner| {
            if !inner.playlists.contains_key(&playlist.id) {
                return Err(DomainError::NotFound(format!(
                    "Playlist {} not found",
                    playlist.id
                )));
            }
            inner.playlists.insert(playlist.id, playlist.clone());
            Ok(())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.with(|inner| {
            if inner.playlists.remove(&id).is_none() {
                return Err(DomainError::NotFound(format!("Playlist {} not found", id)));
            }
            Ok(())
        })
    }
}
