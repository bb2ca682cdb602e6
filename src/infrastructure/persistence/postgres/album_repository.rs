//! Postgres album repository

use crate::domain::album::{Album, AlbumFilters, AlbumRepository, AlbumSortField};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const ALBUM_COLUMNS: &str =
    "id, title, artist_id, release_year, genre, cover_url, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
struct AlbumRow {
    id: Uuid,
    title: String,
    artist_id: Uuid,
    release_year: Option<i32>,
    genre: Option<String>,
    cover_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AlbumRow> for Album {
    fn from(row: AlbumRow) -> Self {
        Album {
            id: row.id,
            title: row.title,
            artist_id: row.artist_id,
            release_year: row.release_year,
            genre: row.genre,
            cover_url: row.cover_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgAlbumRepository {
    pool: PgPool,
}

impl PgAlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(sort: AlbumSortField) -> &'static str {
    match sort {
        AlbumSortField::CreatedAt => "created_at",
        AlbumSortField::Title => "title",
        AlbumSortField::ReleaseYear => "release_year",
    }
}

fn apply_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &AlbumFilters) {
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
    }
}

fn persistence(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::PersistenceError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl AlbumRepository for PgAlbumRepository {
    async fn create(&self, album: &Album) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO albums (id, title, artist_id, release_year, genre, cover_url,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(album.id)
        .bind(&album.title)
        .bind(album.artist_id)
        .bind(album.release_year)
        .bind(&album.genre)
        .bind(&album.cover_url)
        .bind(album.created_at)
        .bind(album.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence("create album", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Album>> {
        let row = sqlx::query_as::<_, AlbumRow>(&format!(
            "SELECT {} FROM albums WHERE id = $1",
            ALBUM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence("get album", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filters: AlbumFilters,
        sort: AlbumSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<Album>, u64)> {
        let mut count_qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM albums");
        apply_filters(&mut count_qb, &filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence("count albums", e))?;

        let mut qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM albums", ALBUM_COLUMNS));
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

        let rows: Vec<AlbumRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| persistence("list albums", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }

    async fn update(&self, album: &Album) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE albums SET
                title = $2,
                release_year = $3,
                genre = $4,
                cover_url = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(album.id)
        .bind(&album.title)
        .bind(album.release_year)
        .bind(&album.genre)
        .bind(&album.cover_url)
        .bind(album.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence("update album", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Album {} not found", album.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // songs.album_id is ON DELETE SET NULL: tracks outlive their
        // album as singles.
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence("delete album", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Album {} not found", id)));
        }
        Ok(())
    }
}
