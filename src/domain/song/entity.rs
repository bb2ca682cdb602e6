//! Song entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Song entity
///
/// `play_count` and `likes_count` are denormalized counters. Plays are
/// bumped by an atomic single-row increment; likes are only ever mutated
/// together with the like edge, the same discipline the follow counters
/// use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    /// Track length in seconds, as reported by the upload pipeline
    pub duration_secs: i32,
    /// Location of the audio object; uploads live in an external service
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub play_count: i64,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Song creation data; the artist comes from the caller identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    pub duration_secs: i32,
    pub audio_url: String,
    pub cover_url: Option<String>,
}

/// Song metadata update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

/// Outcome of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    /// Whether the caller likes the song after the toggle
    pub liked: bool,
}

impl Song {
    /// Create a new song owned by `artist_id`
    pub fn new(artist_id: Uuid, data: CreateSong) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            artist_id,
            album_id: data.album_id,
            genre: data.genre,
            duration_secs: data.duration_secs,
            audio_url: data.audio_url,
            cover_url: data.cover_url,
            play_count: 0,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a metadata update, leaving counters untouched
    pub fn apply_update(&mut self, data: UpdateSong) {
        if let Some(title) = data.title {
            self.title = title;
        }
        if let Some(album_id) = data.album_id {
            self.album_id = Some(album_id);
        }
        if let Some(genre) = data.genre {
            self.genre = Some(genre);
        }
        if let Some(cover_url) = data.cover_url {
            self.cover_url = Some(cover_url);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_data() -> CreateSong {
        CreateSong {
            title: "Midnight Drive".to_string(),
            album_id: None,
            genre: Some("synthwave".to_string()),
            duration_secs: 214,
            audio_url: "https://cdn.example.com/audio/midnight-drive.mp3".to_string(),
            cover_url: None,
        }
    }

    #[test]
    fn test_new_song_starts_with_zero_counters() {
        let artist = Uuid::new_v4();
        let song = Song::new(artist, create_data());

        assert_eq!(song.artist_id, artist);
        assert_eq!(song.play_count, 0);
        assert_eq!(song.likes_count, 0);
        assert_eq!(song.created_at, song.updated_at);
    }

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut song = Song::new(Uuid::new_v4(), create_data());
        let before = song.clone();

        song.apply_update(UpdateSong {
            title: Some("Midnight Drive (Remaster)".to_string()),
            ..Default::default()
        });

        assert_eq!(song.title, "Midnight Drive (Remaster)");
        assert_eq!(song.genre, before.genre);
        assert_eq!(song.audio_url, before.audio_url);
        assert!(song.updated_at >= before.updated_at);
    }
}
