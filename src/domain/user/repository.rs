//! User repository interface

use super::entity::{CreateUser, UpdateProfile, User, UserRole};
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filters applied to the user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    /// Case-insensitive substring match against username or email.
    /// Empty strings are treated as absent.
    pub search: Option<String>,
    /// Exact role filter.
    pub role: Option<UserRole>,
}

/// Sortable fields for the user listing
///
/// This is the allow-list: caller-supplied sort names outside of it fall
/// back to the default instead of reaching the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortField {
    #[default]
    CreatedAt,
    Username,
    FollowersCount,
}

impl UserSortField {
    /// Parse a caller-supplied field name. Both the wire spelling of the
    /// original API (`createdAt`) and snake_case are accepted; anything
    /// else falls back to the default sort.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("username") => UserSortField::Username,
            Some("followersCount") | Some("followers_count") => UserSortField::FollowersCount,
            _ => UserSortField::CreatedAt,
        }
    }
}

/// User repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, data: CreateUser) -> Result<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List users matching `filters`, sorted and paginated. Returns the
    /// page of users and the total match count before slicing.
    async fn list(
        &self,
        filters: UserFilters,
        sort: UserSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64)>;

    /// Update profile fields. Username/email collisions surface as
    /// `AlreadyExists`.
    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> Result<User>;
}
