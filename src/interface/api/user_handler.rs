//! User and follow API handlers

use super::auth::{require_user, CallerIdentity};
use super::metrics_handler::{record_follow_toggle, record_listing};
use super::response::{ApiError, ApiResponse, HealthResponse};
use super::user_dto::{
    PageQuery, PublicProfileResponse, UpdateProfileRequest, UserListQuery, UserResponse,
};
use crate::domain::album::AlbumRepository;
use crate::domain::follow::{FollowRepository, FollowService, FollowStatus};
use crate::domain::playlist::PlaylistRepository;
use crate::domain::shared::{DomainError, Page, PageRequest, SortDirection};
use crate::domain::song::{SongRepository, SongService};
use crate::domain::user::{UserFilters, UserRepository, UserRole, UserSortField};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub albums: Arc<dyn AlbumRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub follow_service: Arc<FollowService>,
    pub song_service: Arc<SongService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        songs: Arc<dyn SongRepository>,
        albums: Arc<dyn AlbumRepository>,
        playlists: Arc<dyn PlaylistRepository>,
    ) -> Self {
        let follow_service = Arc::new(FollowService::new(users.clone(), follows.clone()));
        let song_service = Arc::new(SongService::new(songs.clone(), albums.clone()));
        Self {
            users,
            follows,
            songs,
            albums,
            playlists,
            follow_service,
            song_service,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// List users with optional search, role filter and sorting
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<ApiResponse<Page<UserResponse>>>, ApiError> {
    info!(
        "API: Listing users (search: {:?}, role: {:?}, sortBy: {:?})",
        query.search, query.role, query.sort_by
    );

    let role = match query.role.as_deref() {
        Some(raw) => Some(
            UserRole::from_str(raw)
                .ok_or_else(|| DomainError::ValidationError(format!("unknown role: {}", raw)))?,
        ),
        None => None,
    };
    let filters = UserFilters {
        search: query.search,
        role,
    };
    let sort = UserSortField::parse(query.sort_by.as_deref());
    let direction = SortDirection::parse(query.sort_order.as_deref());
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    record_listing("users");
    let (items, total) = state.users.list(filters, sort, direction, page).await?;
    let body = Page::new(items, &page, total).map(UserResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// Get the authenticated user's own profile
pub async fn get_me(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    info!("API: Getting own profile for {}", caller.0);

    let user = require_user(&state, caller).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Update the authenticated user's own profile
pub async fn update_me(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    info!("API: Updating profile for {}", caller.0);

    let user = require_user(&state, caller).await?;
    let updated = state.users.update_profile(user.id, req.into()).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    info!("API: Getting user {}", id);

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Get a user's public profile by username
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<PublicProfileResponse>>, ApiError> {
    info!("API: Getting user by username: {}", username);

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("User {} not found", username)))?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Toggle the follow edge between the caller and the target user
pub async fn toggle_follow(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FollowStatus>>, ApiError> {
    info!("API: Toggling follow {} -> {}", caller.0, id);

    let user = require_user(&state, caller).await?;
    let status = state.follow_service.toggle(user.id, id).await?;
    record_follow_toggle(status.following);
    Ok(Json(ApiResponse::success(status)))
}

/// List the users following the given user
pub async fn list_followers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<PublicProfileResponse>>>, ApiError> {
    info!("API: Listing followers of {}", id);

    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("followers");
    let body = state
        .follow_service
        .followers(id, page)
        .await?
        .map(PublicProfileResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// List the users the given user follows
pub async fn list_following(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<PublicProfileResponse>>>, ApiError> {
    info!("API: Listing users {} follows", id);

    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("following");
    let body = state
        .follow_service
        .following(id, page)
        .await?
        .map(PublicProfileResponse::from);
    Ok(Json(ApiResponse::success(body)))
}
