//! Follow relationship entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed follow edge between two users
///
/// The pair `(follower_id, following_id)` is unique: a user follows
/// another user at most once. Self-edges are rejected before this type
/// is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub id: Uuid,
    /// The user doing the following
    pub follower_id: Uuid,
    /// The user being followed
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// Create a new follow edge
    pub fn new(follower_id: Uuid, following_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a follow toggle, reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowStatus {
    /// Whether the caller is following the target after the toggle
    pub following: bool,
}
