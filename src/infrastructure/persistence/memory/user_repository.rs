//! In-memory user repository

use super::store::{paginate, MemoryStore};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use crate::domain::shared::result::Result;
use crate::domain::user::{
    CreateUser, UpdateProfile, User, UserFilters, UserRepository, UserSortField,
};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl MemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn matches(user: &User, filters: &UserFilters) -> bool {
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        if !user.username.to_lowercase().contains(&needle)
            && !user.email.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(role) = filters.role {
        if user.role != role {
            return false;
        }
    }
    true
}

fn order(a: &User, b: &User, sort: UserSortField, direction: SortDirection) -> Ordering {
    let ord = match sort {
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::Username => a.username.cmp(&b.username),
        UserSortField::FollowersCount => a.followers_count.cmp(&b.followers_count),
    }
    // id as tiebreaker keeps page boundaries stable on equal keys
    .then_with(|| a.id.cmp(&b.id));
    if direction.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, data: CreateUser) -> Result<User> {
        self.store.with(|inner| {
            if inner.users.values().any(|u| u.username == data.username) {
                return Err(DomainError::AlreadyExists(
                    "username is already taken".to_string(),
                ));
            }
            if inner.users.values().any(|u| u.email == data.email) {
                return Err(DomainError::AlreadyExists(
                    "email is already registered".to_string(),
                ));
            }

            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                username: data.username,
                email: data.email,
                role: data.role,
                bio: data.bio,
                avatar_url: data.avatar_url,
                followers_count: 0,
                following_count: 0,
                created_at: now,
                updated_at: now,
            };
            inner.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.store.with(|inner| Ok(inner.users.get(&id).cloned()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.store.with(|inner| {
            Ok(inner
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store
            .with(|inner| Ok(inner.users.values().find(|u| u.email == email).cloned()))
    }

    async fn list(
        &self,
        filters: UserFilters,
        sort: UserSortField,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64)> {
        self.store.with(|inner| {
            let mut found: Vec<User> = inner
                .users
                .values()
                .filter(|u| matches(u, &filters))
                .cloned()
                .collect();
            found.sort_by(|a, b| order(a, b, sort, direction));

            let total = found.len() as u64;
            Ok((paginate(found, &page), total))
        })
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> Result<User> {
        self.store.with(|inner| {
            if let Some(username) = &data.username {
                if inner.users.values().any(|u| u.id != id && &u.username == username) {
                    return Err(DomainError::AlreadyExists(
                        "username is already taken".to_string(),
                    ));
                }
            }
            if let Some(email) = &data.email {
                if inner.users.values().any(|u| u.id != id && &u.email == email) {
                    return Err(DomainError::AlreadyExists(
                        "email is already registered".to_string(),
                    ));
                }
            }

            let user = inner
                .users
                .get_mut(&id)
                .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
            if let Some(username) = data.username {
                user.username = username;
            }
            if let Some(email) = data.email {
                user.email = email;
            }
            if let Some(bio) = data.bio {
                user.bio = Some(bio);
            }
            if let Some(avatar_url) = data.avatar_url {
                user.avatar_url = Some(avatar_url);
            }
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    fn repo() -> MemoryUserRepository {
        MemoryUserRepository::new(Arc::new(MemoryStore::new()))
    }

    fn create_data(username: &str, role: UserRole) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
            bio: None,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo();
        let user = repo
            .create(create_data("ana", UserRole::Listener))
            .await
            .unwrap();

        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "ana");
        assert_eq!(by_id.followers_count, 0);

        let by_name = repo.find_by_username("ana").await.unwrap();
        assert!(by_name.is_some());
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let repo = repo();
        repo.create(create_data("ana", UserRole::Listener))
            .await
            .unwrap();

        let mut dup = create_data("ana", UserRole::Artist);
        dup.email = "second@example.com".to_string();
        let err = repo.create(dup).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_role_filter_with_pagination() {
        let repo = repo();
        for i in 0..12 {
            let role = if i < 3 { UserRole::Artist } else { UserRole::Listener };
            repo.create(create_data(&format!("user{:02}", i), role))
                .await
                .unwrap();
        }

        let filters = UserFilters {
            role: Some(UserRole::Artist),
            ..Default::default()
        };
        let (items, total) = repo
            .list(
                filters,
                UserSortField::CreatedAt,
                SortDirection::Descending,
                PageRequest::new(Some(1), Some(10)),
            )
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|u| u.role == UserRole::Artist));
    }

    #[tokio::test]
    async fn test_search_matches_username_and_email() {
        let repo = repo();
        repo.create(create_data("synthfan", UserRole::Listener))
            .await
            .unwrap();
        repo.create(CreateUser {
            username: "dj_karla".to_string(),
            email: "karla@synthmail.net".to_string(),
            role: UserRole::Artist,
            bio: None,
            avatar_url: None,
        })
        .await
        .unwrap();
        repo.create(create_data("basshead", UserRole::Listener))
            .await
            .unwrap();

        let (items, total) = repo
            .list(
                UserFilters {
                    search: Some("SYNTH".to_string()),
                    ..Default::default()
                },
                UserSortField::Username,
                SortDirection::Ascending,
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(total, 2);
        let names: Vec<&str> = items.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["dj_karla", "synthfan"]);
    }

    #[tokio::test]
    async fn test_update_profile_conflicts() {
        let repo = repo();
        repo.create(create_data("ana", UserRole::Listener))
            .await
            .unwrap();
        let bob = repo
            .create(create_data("bob", UserRole::Listener))
            .await
            .unwrap();

        let err = repo
            .update_profile(
                bob.id,
                UpdateProfile {
                    username: Some("ana".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let updated = repo
            .update_profile(
                bob.id,
                UpdateProfile {
                    bio: Some("bass enjoyer".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("bass enjoyer"));
        assert_eq!(updated.username, "bob");
    }
}
