//! Album API DTOs

use crate::domain::album::{Album, CreateAlbum, UpdateAlbum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Album response DTO
#[derive(Debug, Clone, Serialize)]
pub struct AlbumResponse {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Album> for AlbumResponse {
    fn from(album: Album) -> Self {
        Self {
            id: album.id,
            title: album.title,
            artist_id: album.artist_id,
            release_year: album.release_year,
            genre: album.genre,
            cover_url: album.cover_url,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}

/// Album creation request
#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

impl From<CreateAlbumRequest> for CreateAlbum {
    fn from(req: CreateAlbumRequest) -> Self {
        CreateAlbum {
            title: req.title,
            release_year: req.release_year,
            genre: req.genre,
            cover_url: req.cover_url,
        }
    }
}

/// Album update request
#[derive(Debug, Deserialize)]
pub struct UpdateAlbumRequest {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

impl From<UpdateAlbumRequest> for UpdateAlbum {
    fn from(req: UpdateAlbumRequest) -> Self {
        UpdateAlbum {
            title: req.title,
            release_year: req.release_year,
            genre: req.genre,
            cover_url: req.cover_url,
        }
    }
}

/// Query parameters for listing albums
#[derive(Debug, Default, Deserialize)]
pub struct AlbumListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub genre: Option<String>,
    /// Artist id as a string; anything that is not a UUID is rejected
    pub artist: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}
