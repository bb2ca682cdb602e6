//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular listener account
    Listener,
    /// Account that can publish songs and albums
    Artist,
    /// Administrative account
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Listener => "listener",
            UserRole::Artist => "artist",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "listener" => Some(UserRole::Listener),
            "artist" => Some(UserRole::Artist),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// User entity
///
/// `followers_count` and `following_count` are denormalized caches of the
/// follow edge counts. They are only ever mutated together with the edge
/// itself (see the follow repository), so they stay consistent with the
/// relation they summarize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User creation data
///
/// Registration itself (password handling, verification) lives in an
/// external collaborator; this is the persistence entry point it uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile update data; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn is_artist(&self) -> bool {
        self.role == UserRole::Artist
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
