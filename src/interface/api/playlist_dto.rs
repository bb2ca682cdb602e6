//! Playlist API DTOs

use crate::domain::playlist::{CreatePlaylist, Playlist, UpdatePlaylist};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Playlist response DTO
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub is_public: bool,
    pub song_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            owner_id: playlist.owner_id,
            is_public: playlist.is_public,
            song_ids: playlist.song_ids,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

/// Playlist creation request; playlists are public unless asked not
/// to be
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl From<CreatePlaylistRequest> for CreatePlaylist {
    fn from(req: CreatePlaylistRequest) -> Self {
        CreatePlaylist {
            name: req.name,
            description: req.description,
            is_public: req.is_public,
        }
    }
}

/// Playlist update request
#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl From<UpdatePlaylistRequest> for UpdatePlaylist {
    fn from(req: UpdatePlaylistRequest) -> Self {
        UpdatePlaylist {
            name: req.name,
            description: req.description,
            is_public: req.is_public,
        }
    }
}

/// Query parameters for listing playlists
#[derive(Debug, Default, Deserialize)]
pub struct PlaylistListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}
