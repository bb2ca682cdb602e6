//! Postgres song repository

use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use crate::domain::song::{Song, SongFilters, SongRepository, SongSortField};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const SONG_COLUMNS: &str = "id, title, artist_id, album_id, genre, duration_secs, \
     audio_url, cover_url, play_count, likes_count, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
struct SongRow {
    id: Uuid,
    title: String,
    artist_id: Uuid,
    album_id: Option<Uuid>,
    genre: Option<String>,
    duration_secs: i32,
    audio_url: String,
    cover_url: Option<String>,
    play_count: i64,
    likes_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Song {
            id: row.id,
            title: row.title,
            artist_id: row.artist_id,
            album_id: row.album_id,
            genre: row.genre,
            duration_secs: row.duration_secs,
            audio_url: row.audio_url,
            cover_url: row.cover_url,
            play_count: row.play_count,
            likes_count: row.likes_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgSongRepository {
    pool: PgPool,
}

impl PgSongRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(sort: SongSortField) -> &'static str {
    match sort {
        SongSortField::CreatedAt => "created_at",
        SongSortField::Title => "title",
        SongSortField::PlayCount => "play_count",
        SongSortField::LikesCount => "likes_count",
    }
}

fn apply_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &SongFilters) {
    let mut clause = " WHERE ";
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(clause)
            .push("title ILIKE ")
            .push_bind(format!("%{}%", search));
        clause = " AND ";
    }
    if let Some(genre) = &filters.genre {
        qb.push(clause).push("genre = ").push_bind(genre.clone());
        clause = " AND ";
    }
    if let Some(artist_id) = filters.artist_id {
        qb.push(clause).push("artist_id = ").push_bind(artist_id);
        clause = " AND ";
    }
    if let Some(album_id) = filters.album_id {
        qb.push(clause).push("album_id = ").push_bind(album_id);
    }
}

fn persistence(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::PersistenceError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl SongRepository for PgSongRepository {
    async fn create(&self, song: &Song) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO songs (id, title, artist_id, album_id, genre, duration_secs,
                               audio_url, cover_url, play_count, likes_count,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(song.id)
        .bind(&song.title)
        .bind(song.artist_id)
        .bind(song.album_id)
        .bind(&song.genre)
        .bind(song.duration_secs)
        .bind(&song.audio_url)
        .bind(&song.cover_url)
        .bind(song.play_count)
        .bind(song.likes_count)
        .bind(song.created_at)
        .bind(song.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence("create song", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>> {
        let row = sqlx::query_as::<_, SongRow>(&format!(
            "SELECT {} FROM songs WHERE id = $1",
            SONG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence("get song", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filters: SongFilters,
        sort: SongSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Song>, u64)> {
        let mut count_qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM songs");
        apply_filters(&mut count_qb, &filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence("count songs", e))?;

        let mut qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM songs", SONG_COLUMNS));
        apply_filters(&mut qb, &filters);
        qb.push(format!(
            " ORDER BY {col} {dir}, id {dir}",
            col = sort_column(sort),
            dir = direction.as_sql()
        ));
        qb.push(" LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.skip() as i64);

        let rows: Vec<SongRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| persistence("list songs", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }

    async fn update_metadata(&self, song: &Song) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE songs SET
                title = $2,
                album_id = $3,
                genre = $4,
                duration_secs = $5,
                audio_url = $6,
                cover_url = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(song.id)
        .bind(&song.title)
        .bind(song.album_id)
        .bind(&song.genre)
        .bind(song.duration_secs)
        .bind(&song.audio_url)
        .bind(&song.cover_url)
        .bind(song.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence("update song", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Song {} not found", song.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Like edges and playlist memberships go with the song via
        // ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence("delete song", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Song {} not found", id)));
        }
        Ok(())
    }

    async fn record_play(&self, id: Uuid) -> Result<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE songs SET play_count = play_count + 1 WHERE id = $1 RETURNING play_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence("record play", e))?;

        count.ok_or_else(|| DomainError::NotFound(format!("Song {} not found", id)))
    }

    async fn is_liked(&self, song_id: Uuid, user_id: Uuid) -> Result<bool> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM song_likes WHERE song_id = $1 AND user_id = $2)",
        )
        .bind(song_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| persistence("check like", e))?;

        Ok(liked)
    }

    async fn set_liked(&self, song_id: Uuid, user_id: Uuid, liked: bool) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence("open transaction", e))?;

        // The conflict/affected-row guards make this idempotent: the
        // counter moves only when the edge actually changed.
        let changed = if liked {
            sqlx::query(
                r#"
                INSERT INTO song_likes (song_id, user_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (song_id, user_id) DO NOTHING
                "#,
            )
            .bind(song_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    DomainError::NotFound(format!("Song {} not found", song_id))
                }
                _ => persistence("like song", e),
            })?
            .rows_affected()
        } else {
            sqlx::query("DELETE FROM song_likes WHERE song_id = $1 AND user_id = $2")
                .bind(song_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence("unlike song", e))?
                .rows_affected()
        };

        if changed > 0 {
            let delta: i64 = if liked { 1 } else { -1 };
            sqlx::query("UPDATE songs SET likes_count = likes_count + $2 WHERE id = $1")
                .bind(song_id)
                .bind(delta)
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence("update likes count", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| persistence("commit like change", e))
    }

    async fn list_liked(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<Song>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM song_likes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence("count liked songs", e))?;

        let rows = sqlx::query_as::<_, SongRow>(
            r#"
            SELECT s.id, s.title, s.artist_id, s.album_id, s.genre, s.duration_secs,
                   s.audio_url, s.cover_url, s.play_count, s.likes_count,
                   s.created_at, s.updated_at
            FROM songs s
            INNER JOIN song_likes sl ON sl.song_id = s.id
            WHERE sl.user_id = $1
            ORDER BY sl.created_at DESC, sl.song_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(page.limit()))
        .bind(page.skip() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| persistence("list liked songs", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }
}
