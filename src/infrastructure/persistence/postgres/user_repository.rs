//! Postgres user repository

use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use crate::domain::user::{
    CreateUser, UpdateProfile, User, UserFilters, UserRepository, UserRole, UserSortField,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, role, bio, avatar_url, \
     followers_count, following_count, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            role: UserRole::from_str(&row.role).unwrap_or(UserRole::Listener),
            bio: row.bio,
            avatar_url: row.avatar_url,
            followers_count: row.followers_count,
            following_count: row.following_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(sort: UserSortField) -> &'static str {
    match sort {
        UserSortField::CreatedAt => "created_at",
        UserSortField::Username => "username",
        UserSortField::FollowersCount => "followers_count",
    }
}

fn apply_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &UserFilters) {
    let mut clause = " WHERE ";
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(clause)
            .push("(username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
        clause = " AND ";
    }
    if let Some(role) = filters.role {
        qb.push(clause).push("role = ").push_bind(role.as_str());
    }
}

/// Map write failures, turning unique violations into conflicts the
/// caller can report precisely.
fn map_write_error(e: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("users_username_key") => {
                    DomainError::AlreadyExists("username is already taken".to_string())
                }
                Some("users_email_key") => {
                    DomainError::AlreadyExists("email is already registered".to_string())
                }
                _ => DomainError::AlreadyExists("user already exists".to_string()),
            };
        }
    }
    DomainError::PersistenceError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: CreateUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, email, role, bio, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(data.role.as_str())
        .bind(&data.bio)
        .bind(&data.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create user"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::PersistenceError(format!("Failed to get user: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::PersistenceError(format!("Failed to get user by username: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::PersistenceError(format!("Failed to get user by email: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filters: UserFilters,
        sort: UserSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64)> {
        let mut count_qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users");
        apply_filters(&mut count_qb, &filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::PersistenceError(format!("Failed to count users: {}", e)))?;

        let mut qb: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        apply_filters(&mut qb, &filters);
        // id tiebreaker keeps page boundaries stable on equal sort keys
        qb.push(format!(
            " ORDER BY {col} {dir}, id {dir}",
            col = sort_column(sort),
            dir = direction.as_sql()
        ));
        qb.push(" LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.skip() as i64);

        let rows: Vec<UserRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::PersistenceError(format!("Failed to list users: {}", e)))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                bio = COALESCE($4, bio),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.bio)
        .bind(&data.avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update profile"))?;

        row.map(Into::into)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))
    }
}
