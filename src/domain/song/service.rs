//! Song domain service
//!
//! Publishing and catalog mutation rules live here: role checks, album
//! ownership validation, and the like toggle. Handlers stay thin.

use super::entity::{CreateSong, LikeStatus, Song, UpdateSong};
use super::repository::SongRepository;
use crate::domain::album::AlbumRepository;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::user::User;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Song service
pub struct SongService {
    songs: Arc<dyn SongRepository>,
    albums: Arc<dyn AlbumRepository>,
}

impl SongService {
    pub fn new(songs: Arc<dyn SongRepository>, albums: Arc<dyn AlbumRepository>) -> Self {
        Self { songs, albums }
    }

    /// Publish a new song owned by `caller`.
    ///
    /// Requires the artist role (admins qualify). When `album_id` is
    /// set, the album must exist and belong to the same artist.
    pub async fn create(&self, caller: &User, data: CreateSong) -> Result<Song> {
        if !caller.is_artist() && !caller.is_admin() {
            return Err(DomainError::Forbidden(
                "only artists can publish songs".to_string(),
            ));
        }
        if data.title.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        if data.duration_secs < 1 {
            return Err(DomainError::ValidationError(
                "duration must be positive".to_string(),
            ));
        }
        if data.audio_url.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "audio_url must not be empty".to_string(),
            ));
        }
        if let Some(album_id) = data.album_id {
            self.check_album(album_id, caller.id, caller.is_admin()).await?;
        }

        let song = Song::new(caller.id, data);
        self.songs.create(&song).await?;
        info!("Artist {} published song {} ({})", caller.id, song.title, song.id);
        Ok(song)
    }

    /// Update song metadata. Only the owning artist or an admin may
    /// change a song.
    pub async fn update(&self, caller: &User, id: Uuid, data: UpdateSong) -> Result<Song> {
        let mut song = self.require(id).await?;
        self.check_owner(&song, caller)?;

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(DomainError::ValidationError(
                    "title must not be empty".to_string(),
                ));
            }
        }
        if let Some(album_id) = data.album_id {
            self.check_album(album_id, song.artist_id, caller.is_admin()).await?;
        }

        song.apply_update(data);
        self.songs.update_metadata(&song).await?;
        Ok(song)
    }

    /// Delete a song. Only the owning artist or an admin may delete.
    pub async fn delete(&self, caller: &User, id: Uuid) -> Result<()> {
        let song = self.require(id).await?;
        self.check_owner(&song, caller)?;
        self.songs.delete(id).await?;
        info!("Deleted song {} ({})", song.title, id);
        Ok(())
    }

    /// Toggle whether `user_id` likes `song_id`
    pub async fn toggle_like(&self, user_id: Uuid, song_id: Uuid) -> Result<LikeStatus> {
        self.require(song_id).await?;
        let liked = !self.songs.is_liked(song_id, user_id).await?;
        self.songs.set_liked(song_id, user_id, liked).await?;
        Ok(LikeStatus { liked })
    }

    /// Count one playback of `song_id`, returning the new play count
    pub async fn record_play(&self, song_id: Uuid) -> Result<i64> {
        self.songs.record_play(song_id).await
    }

    async fn require(&self, id: Uuid) -> Result<Song> {
        self.songs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Song {} not found", id)))
    }

    fn check_owner(&self, song: &Song, caller: &User) -> Result<()> {
        if song.artist_id != caller.id && !caller.is_admin() {
            return Err(DomainError::Forbidden(
                "you do not own this song".to_string(),
            ));
        }
        Ok(())
    }

    async fn check_album(&self, album_id: Uuid, artist_id: Uuid, admin: bool) -> Result<()> {
        let album = self
            .albums
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| {
                DomainError::ValidationError(format!("album {} does not exist", album_id))
            })?;
        if album.artist_id != artist_id && !admin {
            return Err(DomainError::ValidationError(format!(
                "album {} belongs to another artist",
                album_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::album::repository::MockAlbumRepository;
    use crate::domain::album::{Album, CreateAlbum};
    use crate::domain::song::repository::MockSongRepository;
    use crate::domain::user::UserRole;
    use chrono::Utc;
    use mockall::predicate::eq;
    use tokio_test::assert_ok;

    fn user_with_role(role: UserRole) -> User {
        let id = Uuid::new_v4();
        User {
            id,
            username: format!("user-{}", &id.to_string()[..8]),
            email: format!("{}@example.com", &id.to_string()[..8]),
            role,
            bio: None,
            avatar_url: None,
            followers_count: 0,
            following_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_data() -> CreateSong {
        CreateSong {
            title: "Night Loop".to_string(),
            album_id: None,
            genre: None,
            duration_secs: 180,
            audio_url: "https://cdn.example.com/audio/night-loop.mp3".to_string(),
            cover_url: None,
        }
    }

    fn service(songs: MockSongRepository, albums: MockAlbumRepository) -> SongService {
        SongService::new(Arc::new(songs), Arc::new(albums))
    }

    #[tokio::test]
    async fn test_listener_cannot_publish() {
        let svc = service(MockSongRepository::new(), MockAlbumRepository::new());
        let caller = user_with_role(UserRole::Listener);

        let err = svc.create(&caller, create_data()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let svc = service(MockSongRepository::new(), MockAlbumRepository::new());
        let caller = user_with_role(UserRole::Artist);

        let mut data = create_data();
        data.title = "   ".to_string();
        let err = svc.create(&caller, data).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_album_of_another_artist_is_rejected() {
        let caller = user_with_role(UserRole::Artist);
        let foreign_album = Album::new(
            Uuid::new_v4(),
            CreateAlbum {
                title: "Not Yours".to_string(),
                release_year: None,
                genre: None,
                cover_url: None,
            },
        );

        let mut albums = MockAlbumRepository::new();
        let found = foreign_album.clone();
        albums
            .expect_find_by_id()
            .with(eq(foreign_album.id))
            .returning(move |_| Ok(Some(found.clone())));

        let mut data = create_data();
        data.album_id = Some(foreign_album.id);
        let err = service(MockSongRepository::new(), albums)
            .create(&caller, data)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_artist_publishes_song() {
        let caller = user_with_role(UserRole::Artist);
        let caller_id = caller.id;

        let mut songs = MockSongRepository::new();
        songs
            .expect_create()
            .withf(move |song| song.artist_id == caller_id && song.play_count == 0)
            .times(1)
            .returning(|_| Ok(()));

        let song = tokio_test::assert_ok!(
            service(songs, MockAlbumRepository::new())
                .create(&caller, create_data())
                .await
        );
        assert_eq!(song.artist_id, caller_id);
        assert_eq!(song.likes_count, 0);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let owner = user_with_role(UserRole::Artist);
        let song = Song::new(owner.id, create_data());
        let song_id = song.id;

        let mut songs = MockSongRepository::new();
        songs
            .expect_find_by_id()
            .returning(move |_| Ok(Some(song.clone())));

        let intruder = user_with_role(UserRole::Artist);
        let err = service(songs, MockAlbumRepository::new())
            .update(&intruder, song_id, UpdateSong::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_may_update_any_song() {
        let owner = user_with_role(UserRole::Artist);
        let song = Song::new(owner.id, create_data());
        let song_id = song.id;

        let mut songs = MockSongRepository::new();
        songs
            .expect_find_by_id()
            .returning(move |_| Ok(Some(song.clone())));
        songs.expect_update_metadata().times(1).returning(|_| Ok(()));

        let admin = user_with_role(UserRole::Admin);
        let updated = service(songs, MockAlbumRepository::new())
            .update(
                &admin,
                song_id,
                UpdateSong {
                    genre: Some("ambient".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.genre.as_deref(), Some("ambient"));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let owner = user_with_role(UserRole::Artist);
        let song = Song::new(owner.id, create_data());
        let song_id = song.id;

        let mut songs = MockSongRepository::new();
        songs
            .expect_find_by_id()
            .returning(move |_| Ok(Some(song.clone())));

        let intruder = user_with_role(UserRole::Listener);
        let err = service(songs, MockAlbumRepository::new())
            .delete(&intruder, song_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_like_toggle_flips_state() {
        let owner = user_with_role(UserRole::Artist);
        let song = Song::new(owner.id, create_data());
        let song_id = song.id;
        let user_id = Uuid::new_v4();

        let mut songs = MockSongRepository::new();
        songs
            .expect_find_by_id()
            .returning(move |_| Ok(Some(song.clone())));
        songs.expect_is_liked().returning(|_, _| Ok(false));
        songs
            .expect_set_liked()
            .with(eq(song_id), eq(user_id), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let status = service(songs, MockAlbumRepository::new())
            .toggle_like(user_id, song_id)
            .await
            .unwrap();
        assert!(status.liked);
    }

    #[tokio::test]
    async fn test_like_of_unknown_song_is_not_found() {
        let mut songs = MockSongRepository::new();
        songs.expect_find_by_id().returning(|_| Ok(None));

        let err = service(songs, MockAlbumRepository::new())
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
