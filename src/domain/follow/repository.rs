//! Follow repository interface

use super::entity::FollowEdge;
use crate::domain::shared::pagination::PageRequest;
use crate::domain::shared::result::Result;
use crate::domain::user::User;
use async_trait::async_trait;
use uuid::Uuid;

/// Follow repository trait
///
/// Implementations keep the denormalized `followers_count` and
/// `following_count` columns on both users in lockstep with the edge
/// set: `create_edge` and `delete_edge` apply the edge write and both
/// counter updates as a single atomic step, so a crash or a lost race
/// can never leave the counters drifted from the edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Look up the edge from `follower_id` to `following_id`
    async fn find_edge(&self, follower_id: Uuid, following_id: Uuid)
        -> Result<Option<FollowEdge>>;

    /// Insert the edge and increment both counters atomically.
    /// A concurrent insert of the same pair surfaces as `AlreadyExists`.
    async fn create_edge(&self, edge: &FollowEdge) -> Result<()>;

    /// Delete the edge and decrement both counters atomically.
    /// Deleting an edge already removed by a concurrent toggle is a
    /// no-op: the counters are only decremented when a row was removed.
    async fn delete_edge(&self, edge: &FollowEdge) -> Result<()>;

    /// List the users following `user_id`, most recent edge first
    async fn list_followers(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)>;

    /// List the users `user_id` follows, most recent edge first
    async fn list_following(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)>;
}
