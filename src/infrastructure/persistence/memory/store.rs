//! Shared in-memory store
//!
//! All in-memory repositories hold the same `MemoryStore`, so a
//! multi-row operation (a follow edge plus its two counters) happens
//! inside one critical section and is atomic for every observer, the
//! same guarantee the Postgres implementations get from a transaction.

use crate::domain::album::Album;
use crate::domain::follow::FollowEdge;
use crate::domain::playlist::Playlist;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::PageRequest;
use crate::domain::shared::result::Result;
use crate::domain::song::Song;
use crate::domain::user::User;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub(super) struct StoreInner {
    pub(super) users: HashMap<Uuid, User>,
    pub(super) follows: HashMap<Uuid, FollowEdge>,
    pub(super) songs: HashMap<Uuid, Song>,
    /// Like edges: `(song_id, user_id)` to the time of the like
    pub(super) song_likes: HashMap<(Uuid, Uuid), DateTime<Utc>>,
    pub(super) albums: HashMap<Uuid, Album>,
    pub(super) playlists: HashMap<Uuid, Playlist>,
}

/// In-memory backing store
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Run `f` inside the store's critical section
    pub(super) fn with<T>(&self, f: impl FnOnce(&mut StoreInner) -> Result<T>) -> Result<T> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| DomainError::PersistenceError("store lock poisoned".to_string()))?;
        f(&mut inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Slice a fully sorted result set down to the requested page
pub(super) fn paginate<T>(items: Vec<T>, page: &PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip() as usize)
        .take(page.limit() as usize)
        .collect()
}
