//! In-memory album repository

use super::store::{paginate, MemoryStore};
use crate::domain::album::{Album, AlbumFilters, AlbumRepository, AlbumSortField};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemoryAlbumRepository {
    store: Arc<MemoryStore>,
}

impl MemoryAlbumRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn matches(album: &Album, filters: &AlbumFilters) -> bool {
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !album.title.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    if let Some(genre) = &filters.genre {
        if album.genre.as_deref() != Some(genre.as_str()) {
            return false;
        }
    }
    if let Some(artist_id) = filters.artist_id {
        if album.artist_id != artist_id {
            return false;
        }
    }
    true
}

fn order(a: &Album, b: &Album, sort: AlbumSortField, direction: SortDirection) -> Ordering {
    let ord = match sort {
        AlbumSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        AlbumSortField::Title => a.title.cmp(&b.title),
        AlbumSortField::ReleaseYear => a.release_year.cmp(&b.release_year),
    }
    .then_with(|| a.id.cmp(&b.id));
    if direction.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

#[async_trait]
impl AlbumRepository for MemoryAlbumRepository {
    async fn create(&self, album: &Album) -> Result<()> {
        self.store.with(|inner| {
            inner.albums.insert(album.id, album.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Album>> {
        self.store.with(|inner| Ok(inner.albums.get(&id).cloned()))
    }

    async fn list(
        &self,
        filters: AlbumFilters,
        sort: AlbumSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Album>, u64)> {
        self.store.with(|inner| {
            let mut found: Vec<Album> = inner
                .albums
                .values()
                .filter(|a| matches(a, &filters))
                .cloned()
                .collect();
            found.sort_by(|a, b| order(a, b, sort, direction));

            let total = found.len() as u64;
            Ok((paginate(found, &page), total))
        })
    }

    async fn update(&self, album: &Album) -> Result<()> {
        self.store.with(|inner| {
            if !inner.albums.contains_key(&album.id) {
                return Err(DomainError::NotFound(format!("Album {} not found", album.id)));
            }
            inner.albums.insert(album.id, album.clone());
            Ok(())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.with(|inner| {
            if inner.albums.remove(&id).is_none() {
                return Err(DomainError::NotFound(format!("Album {} not found", id)));
            }
            // Songs survive their album; they just become singles.
            for song in inner.songs.values_mut() {
                if song.album_id == Some(id) {
                    song.album_id = None;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::song_repository::MemorySongRepository;
    use super::*;
    use crate::domain::album::CreateAlbum;
    use crate::domain::song::{CreateSong, Song, SongRepository};

    fn album(artist_id: Uuid, title: &str, year: i32) -> Album {
        Album::new(
            artist_id,
            CreateAlbum {
                title: title.to_string(),
                release_year: Some(year),
                genre: None,
                cover_url: None,
            },
        )
    }

    #[tokio::test]
    async fn test_release_year_sort() {
        let repo = MemoryAlbumRepository::new(Arc::new(MemoryStore::new()));
        let artist = Uuid::new_v4();
        repo.create(&album(artist, "Old", 1999)).await.unwrap();
        repo.create(&album(artist, "New", 2024)).await.unwrap();
        repo.create(&album(artist, "Mid", 2011)).await.unwrap();

        let (items, total) = repo
            .list(
                AlbumFilters::default(),
                AlbumSortField::ReleaseYear,
                SortDirection::Ascending,
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(total, 3);
        let titles: Vec<&str> = items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Old", "Mid", "New"]);
    }

    #[tokio::test]
    async fn test_deleting_album_detaches_songs() {
        let store = Arc::new(MemoryStore::new());
        let albums = MemoryAlbumRepository::new(store.clone());
        let songs = MemorySongRepository::new(store);

        let artist = Uuid::new_v4();
        let lp = album(artist, "Neon", 2023);
        albums.create(&lp).await.unwrap();

        let track = Song::new(
            artist,
            CreateSong {
                title: "Glow".to_string(),
                album_id: Some(lp.id),
                genre: None,
                duration_secs: 180,
                audio_url: "https://cdn.example.com/audio/glow.mp3".to_string(),
                cover_url: None,
            },
        );
        songs.create(&track).await.unwrap();

        albums.delete(lp.id).await.unwrap();

        let orphan = songs.find_by_id(track.id).await.unwrap().unwrap();
        assert_eq!(orphan.album_id, None);
        assert!(albums.find_by_id(lp.id).await.unwrap().is_none());
    }
}
