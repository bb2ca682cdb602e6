//! Postgres playlist repository
//!
//! Playlist rows live in `playlists`; the ordered song membership lives
//! in `playlist_songs` keyed by position. `save` rewrites the
//! membership in the same transaction as the row update.

use crate::domain::playlist::{
    Playlist, PlaylistFilters, PlaylistRepository, PlaylistSortField,
};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

const PLAYLIST_COLUMNS: &str =
    "id, name, description, owner_id, is_public, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
struct PlaylistRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    owner_id: Uuid,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlaylistRow {
    fn into_playlist(self, song_ids: Vec<Uuid>) -> Playlist {
        Playlist {
            id: self.id,
            name: self.name,
            description: self.description,
            owner_id: self.owner_id,
            is_public: self.is_public,
            song_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    playlist_id: Uuid,
    song_id: Uuid,
}

pub struct PgPlaylistRepository {
    pool: PgPool,
}

impl PgPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(sort: PlaylistSortField) -> &'static str {
    match sort {
        PlaylistSortField::CreatedAt => "created_at",
        PlaylistSortField::Name => "name",
    }
}

fn apply_filters(
    qb: &mut QueryBuilder<'static, Postgres>,
    viewer: Option<Uuid>,
    filters: &PlaylistFilters,
) {
    match viewer {
        Some(viewer_id) => {
            qb.push(" WHERE (is_public = TRUE OR owner_id = ")
                .push_bind(viewer_id)
                .push(")");
        }
        None => {
            qb.push(" WHERE is_public = TRUE");
        }
    }
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", search));
    }
}

fn persistence(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::PersistenceError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl PlaylistRepository for PgPlaylistRepository {
    async fn create(&self, playlist: &Playlist) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence("open transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO playlists (id, name, description, owner_id, is_public,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.owner_id)
        .bind(playlist.is_public)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| persistence("create playlist", e))?;

        for (position, song_id) in playlist.song_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES ($1, $2, $3)",
            )
            .bind(playlist.id)
            .bind(song_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("write playlist membership", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| persistence("commit playlist", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>> {
        let row = sqlx::query_as::<_, PlaylistRow>(&format!(
            "SELECT {} FROM playlists WHERE id = $1",
            PLAYLIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence("get playlist", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let song_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT song_id FROM playlist_songs WHERE playlist_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| persistence("get playlist songs", e))?;

        Ok(Some(row.into_playlist(song_ids)))
    }

    async fn list(
        &self,
        viewer: Option<Uuid>,
        filters: PlaylistFilters,
        sort: PlaylistSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Playlist>, u64)> {
        let mut count_qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM playlists");
        apply_filters(&mut count_qb, viewer, &filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence("count playlists", e))?;

        let mut qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM playlists", PLAYLIST_COLUMNS));
        apply_filters(&mut qb, viewer, &filters);
        qb.push(format!(
            " ORDER BY {col} {dir}, id {dir}",
            col = sort_column(sort),
            dir = direction.as_sql()
        ));
        qb.push(" LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.skip() as i64);

        let rows: Vec<PlaylistRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| persistence("list playlists", e))?;

        // One membership query for the whole page.
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut memberships: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !ids.is_empty() {
            let member_rows = sqlx::query_as::<_, MembershipRow>(
                r#"
                SELECT playlist_id, song_id
                FROM playlist_songs
                WHERE playlist_id = ANY($1)
                ORDER BY playlist_id, position
                "#,
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| persistence("list playlist songs", e))?;

            for member in member_rows {
                memberships
                    .entry(member.playlist_id)
                    .or_default()
                    .push(member.song_id);
            }
        }

        let playlists = rows
            .into_iter()
            .map(|row| {
                let song_ids = memberships.remove(&row.id).unwrap_or_default();
                row.into_playlist(song_ids)
            })
            .collect();
        Ok((playlists, total as u64))
    }

    async fn save(&self, playlist: &Playlist) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence("open transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE playlists SET
                name = $2,
                description = $3,
                is_public = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.is_public)
        .bind(playlist.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| persistence("update playlist", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!(
                "Playlist {} not found",
                playlist.id
            )));
        }

        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = $1")
            .bind(playlist.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("clear playlist membership", e))?;

        for (position, song_id) in playlist.song_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES ($1, $2, $3)",
            )
            .bind(playlist.id)
            .bind(song_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("write playlist membership", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| persistence("commit playlist", e))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence("delete playlist", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Playlist {} not found", id)));
        }
        Ok(())
    }
}
