//! Song API DTOs

use crate::domain::song::{CreateSong, Song, UpdateSong};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Song response DTO
#[derive(Debug, Clone, Serialize)]
pub struct SongResponse {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    pub duration_secs: i32,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub play_count: i64,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist_id: song.artist_id,
            album_id: song.album_id,
            genre: song.genre,
            duration_secs: song.duration_secs,
            audio_url: song.audio_url,
            cover_url: song.cover_url,
            play_count: song.play_count,
            likes_count: song.likes_count,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

/// Song creation request; the audio object is uploaded elsewhere and
/// referenced here by URL
#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    pub title: String,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    pub duration_secs: i32,
    pub audio_url: String,
    pub cover_url: Option<String>,
}

impl From<CreateSongRequest> for CreateSong {
    fn from(req: CreateSongRequest) -> Self {
        CreateSong {
            title: req.title,
            album_id: req.album_id,
            genre: req.genre,
            duration_secs: req.duration_secs,
            audio_url: req.audio_url,
            cover_url: req.cover_url,
        }
    }
}

/// Song metadata update request
#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

impl From<UpdateSongRequest> for UpdateSong {
    fn from(req: UpdateSongRequest) -> Self {
        UpdateSong {
            title: req.title,
            album_id: req.album_id,
            genre: req.genre,
            cover_url: req.cover_url,
        }
    }
}

/// New play count after a playback event
#[derive(Debug, Serialize)]
pub struct PlayCountResponse {
    pub play_count: i64,
}

/// Query parameters for listing songs
#[derive(Debug, Default, Deserialize)]
pub struct SongListQuery {
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
