//! In-memory follow repository
//!
//! Edge writes and counter updates share one critical section, so the
//! counters can never drift from the edges they summarize.

use super::store::MemoryStore;
use crate::domain::follow::{FollowEdge, FollowRepository};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::PageRequest;
use crate::domain::shared::result::Result;
use crate::domain::user::User;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemoryFollowRepository {
    store: Arc<MemoryStore>,
}

impl MemoryFollowRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FollowRepository for MemoryFollowRepository {
    async fn find_edge(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<FollowEdge>> {
        self.store.with(|inner| {
            Ok(inner
                .follows
                .values()
                .find(|e| e.follower_id == follower_id && e.following_id == following_id)
                .cloned())
        })
    }

    async fn create_edge(&self, edge: &FollowEdge) -> Result<()> {
        self.store.with(|inner| {
            let duplicate = inner
                .follows
                .values()
                .any(|e| e.follower_id == edge.follower_id && e.following_id == edge.following_id);
            if duplicate {
                return Err(DomainError::AlreadyExists(
                    "already following this user".to_string(),
                ));
            }
            if !inner.users.contains_key(&edge.follower_id)
                || !inner.users.contains_key(&edge.following_id)
            {
                return Err(DomainError::PersistenceError(
                    "follow edge references a missing user".to_string(),
                ));
            }

            inner.follows.insert(edge.id, edge.clone());
            if let Some(user) = inner.users.get_mut(&edge.follower_id) {
                user.following_count += 1;
            }
            if let Some(user) = inner.users.get_mut(&edge.following_id) {
                user.followers_count += 1;
            }
            Ok(())
        })
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> Result<()> {
        self.store.with(|inner| {
            // Counters move only when the edge was actually removed;
            // losing a race to another delete leaves them untouched.
            if inner.follows.remove(&edge.id).is_some() {
                if let Some(user) = inner.users.get_mut(&edge.follower_id) {
                    user.following_count = (user.following_count - 1).max(0);
                }
                if let Some(user) = inner.users.get_mut(&edge.following_id) {
                    user.followers_count = (user.followers_count - 1).max(0);
                }
            }
            Ok(())
        })
    }

    async fn list_followers(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)> {
        self.store.with(|inner| {
            let mut edges: Vec<&FollowEdge> = inner
                .follows
                .values()
                .filter(|e| e.following_id == user_id)
                .collect();
            edges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

            let total = edges.len() as u64;
            let items = edges
                .into_iter()
                .skip(page.skip() as usize)
                .take(page.limit() as usize)
                .filter_map(|e| inner.users.get(&e.follower_id).cloned())
                .collect();
            Ok((items, total))
        })
    }

    async fn list_following(&self, user_id: Uuid, page: PageRequest) -> Result<(Vec<User>, u64)> {
        self.store.with(|inner| {
            let mut edges: Vec<&FollowEdge> = inner
                .follows
                .values()
                .filter(|e| e.follower_id == user_id)
                .collect();
            edges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

            let total = edges.len() as u64;
            let items = edges
                .into_iter()
                .skip(page.skip() as usize)
                .take(page.limit() as usize)
                .filter_map(|e| inner.users.get(&e.following_id).cloned())
                .collect();
            Ok((items, total))
        })
    }
}
