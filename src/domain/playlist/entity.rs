//! Playlist aggregate

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Playlist entity
///
/// `song_ids` is an ordered set: insertion order is playback order and
/// a song appears at most once. Membership changes go through
/// `add_song`/`remove_song` so the no-duplicates rule holds everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    /// Whether users other than the owner can see this playlist
    pub is_public: bool,
    pub song_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist creation data; the owner comes from the caller identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Playlist update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl Playlist {
    /// Create a new empty playlist owned by `owner_id`
    pub fn new(owner_id: Uuid, data: CreatePlaylist) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            owner_id,
            is_public: data.is_public,
            song_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `viewer` may read this playlist
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_public || viewer == Some(self.owner_id)
    }

    /// Append a song. Adding a song that is already present is
    /// `AlreadyExists`.
    pub fn add_song(&mut self, song_id: Uuid) -> Result<()> {
        if self.song_ids.contains(&song_id) {
            return Err(DomainError::AlreadyExists(
                "song is already in the playlist".to_string(),
            ));
        }
        self.song_ids.push(song_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a song. Removing a song that is not present is `NotFound`.
    pub fn remove_song(&mut self, song_id: Uuid) -> Result<()> {
        let before = self.song_ids.len();
        self.song_ids.retain(|id| *id != song_id);
        if self.song_ids.len() == before {
            return Err(DomainError::NotFound(
                "song is not in the playlist".to_string(),
            ));
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply an update to the mutable fields
    pub fn apply_update(&mut self, data: UpdatePlaylist) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(description) = data.description {
            self.description = Some(description);
        }
        if let Some(is_public) = data.is_public {
            self.is_public = is_public;
        }
        self.updated_at = Utc::now();
    }
}
