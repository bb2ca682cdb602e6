//! Album entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Album entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Album creation data; the artist comes from the caller identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

/// Album update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAlbum {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
}

impl Album {
    /// Create a new album owned by `artist_id`
    pub fn new(artist_id: Uuid, data: CreateAlbum) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            artist_id,
            release_year: data.release_year,
            genre: data.genre,
            cover_url: data.cover_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update to the mutable fields
    pub fn apply_update(&mut self, data: UpdateAlbum) {
        if let Some(title) = data.title {
            self.title = title;
        }
        if let Some(release_year) = data.release_year {
            self.release_year = Some(release_year);
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

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut album = Album::new(
            Uuid::new_v4(),
            CreateAlbum {
                title: "Neon Nights".to_string(),
                release_year: Some(2023),
                genre: Some("synthwave".to_string()),
                cover_url: None,
            },
        );

        album.apply_update(UpdateAlbum {
            cover_url: Some("https://cdn.example.com/covers/neon.jpg".to_string()),
            ..Default::default()
        });

        assert_eq!(album.title, "Neon Nights");
        assert_eq!(album.release_year, Some(2023));
        assert_eq!(
            album.cover_url.as_deref(),
            Some("https://cdn.example.com/covers/neon.jpg")
        );
    }
}
