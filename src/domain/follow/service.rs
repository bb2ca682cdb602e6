//! Follow/unfollow domain service
//!
//! Owns the toggle state machine: one call either creates the follow
//! edge or removes it, depending on the current state. The counter
//! bookkeeping rides inside the repository's atomic edge operations, so
//! this service never touches counters directly.

use super::entity::{FollowEdge, FollowStatus};
use super::repository::FollowRepository;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{Page, PageRequest};
use crate::domain::shared::result::Result;
use crate::domain::user::{User, UserRepository};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Follow service
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Toggle the follow state from `follower_id` towards `target_id`.
    ///
    /// Returns the state after the toggle. Following yourself is always
    /// an `InvalidOperation`, checked before anything is loaded; a
    /// missing target is `NotFound`.
    pub async fn toggle(&self, follower_id: Uuid, target_id: Uuid) -> Result<FollowStatus> {
        if follower_id == target_id {
            return Err(DomainError::InvalidOperation(
                "you cannot follow yourself".to_string(),
            ));
        }

        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("User {} not found", target_id)));
        }

        match self.follows.find_edge(follower_id, target_id).await? {
            Some(edge) => {
                self.follows.delete_edge(&edge).await?;
                info!("User {} unfollowed {}", follower_id, target_id);
                Ok(FollowStatus { following: false })
            }
            None => {
                let edge = FollowEdge::new(follower_id, target_id);
                self.follows.create_edge(&edge).await?;
                info!("User {} followed {}", follower_id, target_id);
                Ok(FollowStatus { following: true })
            }
        }
    }

    /// Page through the followers of `user_id`.
    ///
    /// An unknown user simply has no followers; no existence check is
    /// made, matching the listing endpoints.
    pub async fn followers(&self, user_id: Uuid, page: PageRequest) -> Result<Page<User>> {
        let (items, total) = self.follows.list_followers(user_id, page).await?;
        Ok(Page::new(items, &page, total))
    }

    /// Page through the users `user_id` follows.
    pub async fn following(&self, user_id: Uuid, page: PageRequest) -> Result<Page<User>> {
        let (items, total) = self.follows.list_following(user_id, page).await?;
        Ok(Page::new(items, &page, total))
    }
}
