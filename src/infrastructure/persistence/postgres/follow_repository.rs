//! Postgres follow repository
//!
//! The edge insert/delete and both counter updates run in one
//! transaction. Concurrent toggles of the same pair serialize on the
//! unique index; the loser of an insert race gets a clean conflict
//! instead of drifted counters.

use super::user_repository::UserRow;
use crate::domain::follow::{FollowEdge, FollowRepository};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::PageRequest;
use crate::domain::shared::result::Result;
use crate::domain::user::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
struct FollowRow {
    id: Uuid,
    follower_id: Uuid,
    following_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<FollowRow> for FollowEdge {
    fn from(row: FollowRow) -> Self {
        FollowEdge {
            id: row.id,
            follower_id: row.follower_id,
            following_id: row.following_id,
            created_at: row.created_at,
        }
    }
}

pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::PersistenceError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    async fn find_edge(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<FollowEdge>> {
        let row = sqlx::query_as::<_, FollowRow>(
            r#"
            SELECT id, follower_id, following_id, created_at
            FROM follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence("get follow edge", e))?;

        Ok(row.map(Into::into))
    }

    async fn create_edge(&self, edge: &FollowEdge) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence("open transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(edge.id)
        .bind(edge.follower_id)
        .bind(edge.following_id)
        .bind(edge.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::AlreadyExists("already following this user".to_string())
            }
            _ => persistence("create follow edge", e),
        })?;

        sqlx::query("UPDATE users SET following_count = following_count + 1 WHERE id = $1")
            .bind(edge.follower_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("increment following count", e))?;
        sqlx::query("UPDATE users SET followers_count = followers_count + 1 WHERE id = $1")
            .bind(edge.following_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("increment followers count", e))?;

        tx.commit()
            .await
            .map_err(|e| persistence("commit follow", e))
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| persistence("open transaction", e))?;

        let deleted = sqlx::query("DELETE FROM follows WHERE id = $1")
            .bind(edge.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| persistence("delete follow edge", e))?;

        // Counters move only when a row was actually removed; losing a
        // race to a concurrent unfollow leaves them untouched.
        if deleted.rows_affected() > 0 {
            sqlx::query("UPDATE users SET following_count = following_count - 1 WHERE id = $1")
                .bind(edge.follower_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence("decrement following count", e))?;
            sqlx::query("UPDATE users SET followers_count = followers_count - 1 WHERE id = $1")
                .bind(edge.following_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| persistence("decrement followers count", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| persistence("commit unfollow", e))
    }

    async fn list_followers(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| persistence("count followers", e))?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.role, u.bio, u.avatar_url,
                   u.followers_count, u.following_count, u.created_at, u.updated_at
            FROM users u
            INNER JOIN follows f ON f.follower_id = u.id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(page.limit()))
        .bind(page.skip() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| persistence("list followers", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }

    async fn list_following(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| persistence("count following", e))?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.email, u.role, u.bio, u.avatar_url,
                   u.followers_count, u.following_count, u.created_at, u.updated_at
            FROM users u
            INNER JOIN follows f ON f.following_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(page.limit()))
        .bind(page.skip() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| persistence("list following", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }
}
