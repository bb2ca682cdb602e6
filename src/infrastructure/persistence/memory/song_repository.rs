//! In-memory song repository

use super::store::{paginate, MemoryStore};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use crate::domain::song::{Song, SongFilters, SongRepository, SongSortField};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemorySongRepository {
    store: Arc<MemoryStore>,
}

impl MemorySongRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn matches(song: &Song, filters: &SongFilters) -> bool {
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !song.title.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    if let Some(genre) = &filters.genre {
        if song.genre.as_deref() != Some(genre.as_str()) {
            return false;
        }
    }
    if let Some(artist_id) = filters.artist_id {
        if song.artist_id != artist_id {
            return false;
        }
    }
    if let Some(album_id) = filters.album_id {
        if song.album_id != Some(album_id) {
            return false;
        }
    }
    true
}

fn order(a: &Song, b: &Song, sort: SongSortField, direction: SortDirection) -> Ordering {
    let ord = match sort {
        SongSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SongSortField::Title => a.title.cmp(&b.title),
        SongSortField::PlayCount => a.play_count.cmp(&b.play_count),
        SongSortField::LikesCount => a.likes_count.cmp(&b.likes_count),
    }
    .then_with(|| a.id.cmp(&b.id));
    if direction.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

#[async_trait]
impl SongRepository for MemorySongRepository {
    async fn create(&self, song: &Song) -> Result<()> {
        self.store.with(|inner| {
            inner.songs.insert(song.id, song.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>> {
        self.store.with(|inner| Ok(inner.songs.get(&id).cloned()))
    }

    async fn list(
        &self,
        filters: SongFilters,
        sort: SongSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Song>, u64)> {
        self.store.with(|inner| {
            let mut found: Vec<Song> = inner
                .songs
                .values()
                .filter(|s| matches(s, &filters))
                .cloned()
                .collect();
            found.sort_by(|a, b| order(a, b, sort, direction));

            let total = found.len() as u64;
            Ok((paginate(found, &page), total))
        })
    }

    async fn update_metadata(&self, song: &Song) -> Result<()> {
        self.store.with(|inner| {
            let current = inner
                .songs
                .get_mut(&song.id)
                .ok_or_else(|| DomainError::NotFound(format!("Song {} not found", song.id)))?;
            current.title = song.title.clone();
            current.album_id = song.album_id;
            current.genre = song.genre.clone();
            current.duration_secs = song.duration_secs;
            current.audio_url = song.audio_url.clone();
            current.cover_url = song.cover_url.clone();
            current.updated_at = song.updated_at;
            Ok(())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.with(|inner| {
            if inner.songs.remove(&id).is_none() {
                return Err(DomainError::NotFound(format!("Song {} not found", id)));
            }
            inner.song_likes.retain(|(song_id, _), _| *song_id != id);
            for playlist in inner.playlists.values_mut() {
                playlist.song_ids.retain(|song_id| *song_id != id);
            }
            Ok(())
        })
    }

    async fn record_play(&self, id: Uuid) -> Result<i64> {
        self.store.with(|inner| {
            let song = inner
                .songs
                .get_mut(&id)
                .ok_or_else(|| DomainError::NotFound(format!("Song {} not found", id)))?;
            song.play_count += 1;
            Ok(song.play_count)
        })
    }

    async fn is_liked(&self, song_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.store
            .with(|inner| Ok(inner.song_likes.contains_key(&(song_id, user_id))))
    }

    async fn set_liked(&self, song_id: Uuid, user_id: Uuid, liked: bool) -> Result<()> {
        self.store.with(|inner| {
            if !inner.songs.contains_key(&song_id) {
                return Err(DomainError::NotFound(format!("Song {} not found", song_id)));
            }

            // The counter moves only when the edge actually changes, so
            // re-applying the current state is a no-op.
            if liked {
                if let Entry::Vacant(entry) = inner.song_likes.entry((song_id, user_id)) {
                    entry.insert(Utc::now());
                    if let Some(song) = inner.songs.get_mut(&song_id) {
                        song.likes_count += 1;
                    }
                }
            } else if inner.song_likes.remove(&(song_id, user_id)).is_some() {
                if let Some(song) = inner.songs.get_mut(&song_id) {
                    song.likes_count = (song.likes_count - 1).max(0);
                }
            }
            Ok(())
        })
    }

    async fn list_liked(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<Song>, u64)> {
        self.store.with(|inner| {
            let mut likes: Vec<(Uuid, chrono::DateTime<Utc>)> = inner
                .song_likes
                .iter()
                .filter(|((_, liker), _)| *liker == user_id)
                .map(|((song_id, _), liked_at)| (*song_id, *liked_at))
                .collect();
            likes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

            let total = likes.len() as u64;
            let items = likes
                .into_iter()
                .skip(page.skip() as usize)
                .take(page.limit() as usize)
                .filter_map(|(song_id, _)| inner.songs.get(&song_id).cloned())
                .collect();
            Ok((items, total))
        })
    }
}
