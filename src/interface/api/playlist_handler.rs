//! Playlist API handlers

use super::auth::{require_user, CallerIdentity, MaybeCaller};
use super::metrics_handler::record_listing;
use super::playlist_dto::{
    CreatePlaylistRequest, PlaylistListQuery, PlaylistResponse, UpdatePlaylistRequest,
};
use super::response::{ApiError, ApiResponse, DeleteResponse};
use super::user_handler::AppState;
use crate::domain::playlist::{Playlist, PlaylistFilters, PlaylistSortField};
use crate::domain::shared::{DomainError, Page, PageRequest, SortDirection};
use crate::domain::user::User;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

async fn require_playlist(state: &AppState, id: Uuid) -> Result<Playlist, ApiError> {
    let playlist = state
        .playlists
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Playlist {} not found", id)))?;
    Ok(playlist)
}

fn check_owner(playlist: &Playlist, caller: &User) -> Result<(), ApiError> {
    if playlist.owner_id != caller.id && !caller.is_admin() {
        return Err(DomainError::Forbidden("you do not own this playlist".to_string()).into());
    }
    Ok(())
}

/// List playlists visible to the caller
///
/// Anonymous callers see public playlists only; authenticated callers
/// additionally see their own private ones.
pub async fn list_playlists(
    State(state): State<AppState>,
    viewer: MaybeCaller,
    Query(query): Query<PlaylistListQuery>,
) -> Result<Json<ApiResponse<Page<PlaylistResponse>>>, ApiError> {
    info!("API: Listing playlists (viewer: {:?})", viewer.0);

    let filters = PlaylistFilters {
        search: query.search,
    };
    let sort = PlaylistSortField::parse(query.sort_by.as_deref());
    let direction = SortDirection::parse(query.sort_order.as_deref());
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    record_listing("playlists");
    let (items, total) = state
        .playlists
        .list(viewer.0, filters, sort, direction, page)
        .await?;
    let body = Page::new(items, &page, total).map(PlaylistResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// Get a playlist by ID, honoring its visibility
pub async fn get_playlist(
    State(state): State<AppState>,
    viewer: MaybeCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlaylistResponse>>, ApiError> {
    info!("API: Getting playlist {}", id);

    let playlist = require_playlist(&state, id).await?;
    if !playlist.is_visible_to(viewer.0) {
        return Err(DomainError::Forbidden("this playlist is private".to_string()).into());
    }
    Ok(Json(ApiResponse::success(playlist.into())))
}

/// Create a new playlist owned by the caller
pub async fn create_playlist(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlaylistResponse>>), ApiError> {
    info!("API: Creating playlist {} by {}", req.name, caller.0);

    let user = require_user(&state, caller).await?;
    if req.name.trim().is_empty() {
        return Err(
            DomainError::ValidationError("playlist name must not be empty".to_string()).into(),
        );
    }

    let playlist = Playlist::new(user.id, req.into());
    state.playlists.create(&playlist).await?;
    info!("API: Created playlist {} (ID: {})", playlist.name, playlist.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(playlist.into())),
    ))
}

/// Update a playlist's name, description or visibility
pub async fn update_playlist(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<ApiResponse<PlaylistResponse>>, ApiError> {
    info!("API: Updating playlist {}", id);

    let user = require_user(&state, caller).await?;
    let mut playlist = require_playlist(&state, id).await?;
    check_owner(&playlist, &user)?;
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(
                DomainError::ValidationError("playlist name must not be empty".to_string()).into(),
            );
        }
    }

    playlist.apply_update(req.into());
    state.playlists.save(&playlist).await?;
    Ok(Json(ApiResponse::success(playlist.into())))
}

/// Delete a playlist
pub async fn delete_playlist(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    info!("API: Deleting playlist {}", id);

    let user = require_user(&state, caller).await?;
    let playlist = require_playlist(&state, id).await?;
    check_owner(&playlist, &user)?;

    state.playlists.delete(id).await?;
    Ok(Json(ApiResponse::success(DeleteResponse { id, deleted: true })))
}

/// Add a song to a playlist
pub async fn add_playlist_song(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, song_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<PlaylistResponse>>, ApiError> {
    info!("API: Adding song {} to playlist {}", song_id, id);

    let user = require_user(&state, caller).await?;
    let mut playlist = require_playlist(&state, id).await?;
    check_owner(&playlist, &user)?;
    state
        .songs
        .find_by_id(song_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Song {} not found", song_id)))?;

    playlist.add_song(song_id)?;
    state.playlists.save(&playlist).await?;
    Ok(Json(ApiResponse::success(playlist.into())))
}

/// Remove a song from a playlist
pub async fn remove_playlist_song(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, song_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<PlaylistResponse>>, ApiError> {
    info!("API: Removing song {} from playlist {}", song_id, id);

    let user = require_user(&state, caller).await?;
    let mut playlist = require_playlist(&state, id).await?;
    check_owner(&playlist, &user)?;

    playlist.remove_song(song_id)?;
    state.playlists.save(&playlist).await?;
    Ok(Json(ApiResponse::success(playlist.into())))
}
