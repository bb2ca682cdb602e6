//! Album API handlers
//!
//! Albums have no domain service; ownership and validation rules are
//! small enough to live at the handler boundary.

use super::album_dto::{AlbumListQuery, AlbumResponse, CreateAlbumRequest, UpdateAlbumRequest};
use super::auth::{require_user, CallerIdentity};
use super::metrics_handler::record_listing;
use super::response::{ApiError, ApiResponse, DeleteResponse};
use super::song_dto::SongResponse;
use super::user_dto::PageQuery;
use super::user_handler::AppState;
use crate::domain::album::{Album, AlbumFilters, AlbumSortField};
use crate::domain::shared::{DomainError, Page, PageRequest, SortDirection};
use crate::domain::song::{SongFilters, SongSortField};
use crate::domain::user::User;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

async fn require_album(state: &AppState, id: Uuid) -> Result<Album, ApiError> {
    let album = state
        .albums
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Album {} not found", id)))?;
    Ok(album)
}

fn check_owner(album: &Album, caller: &User) -> Result<(), ApiError> {
    if album.artist_id != caller.id && !caller.is_admin() {
        return Err(DomainError::Forbidden("you do not own this album".to_string()).into());
    }
    Ok(())
}

fn parse_artist_filter(raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw {
        Some(value) => {
            let id = Uuid::parse_str(value).map_err(|_| {
                DomainError::ValidationError(format!("invalid artist id: {}", value))
            })?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

/// List albums with optional search, genre and artist filters
pub async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<AlbumListQuery>,
) -> Result<Json<ApiResponse<Page<AlbumResponse>>>, ApiError> {
    info!(
        "API: Listing albums (search: {:?}, genre: {:?}, artist: {:?})",
        query.search, query.genre, query.artist
    );

    let filters = AlbumFilters {
        search: query.search,
        genre: query.genre,
        artist_id: parse_artist_filter(query.artist.as_deref())?,
    };
    let sort = AlbumSortField::parse(query.sort_by.as_deref());
    let direction = SortDirection::parse(query.sort_order.as_deref());
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    record_listing("albums");
    let (items, total) = state.albums.list(filters, sort, direction, page).await?;
    let body = Page::new(items, &page, total).map(AlbumResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// Get an album by ID
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AlbumResponse>>, ApiError> {
    info!("API: Getting album {}", id);

    let album = require_album(&state, id).await?;
    Ok(Json(ApiResponse::success(album.into())))
}

/// Create a new album owned by the caller
pub async fn create_album(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AlbumResponse>>), ApiError> {
    info!("API: Creating album {} by {}", req.title, caller.0);

    let user = require_user(&state, caller).await?;
    if !user.is_artist() && !user.is_admin() {
        return Err(DomainError::Forbidden("only artists can create albums".to_string()).into());
    }
    if req.title.trim().is_empty() {
        return Err(DomainError::ValidationError("album title must not be empty".to_string()).into());
    }

    let album = Album::new(user.id, req.into());
    state.albums.create(&album).await?;
    info!("API: Created album {} (ID: {})", album.title, album.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(album.into())),
    ))
}

/// Update an album's metadata
pub async fn update_album(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAlbumRequest>,
) -> Result<Json<ApiResponse<AlbumResponse>>, ApiError> {
    info!("API: Updating album {}", id);

    let user = require_user(&state, caller).await?;
    let mut album = require_album(&state, id).await?;
    check_owner(&album, &user)?;
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(
                DomainError::ValidationError("album title must not be empty".to_string()).into(),
            );
        }
    }

    album.apply_update(req.into());
    state.albums.update(&album).await?;
    Ok(Json(ApiResponse::success(album.into())))
}

/// Delete an album; its songs stay behind as singles
pub async fn delete_album(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    info!("API: Deleting album {}", id);

    let user = require_user(&state, caller).await?;
    let album = require_album(&state, id).await?;
    check_owner(&album, &user)?;

    state.albums.delete(id).await?;
    Ok(Json(ApiResponse::success(DeleteResponse { id, deleted: true })))
}

/// List the songs on an album in track order
pub async fn album_songs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<SongResponse>>>, ApiError> {
    info!("API: Listing songs on album {}", id);

    require_album(&state, id).await?;
    let filters = SongFilters {
        album_id: Some(id),
        ..SongFilters::default()
    };
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("album_songs");
    let (items, total) = state
        .songs
        .list(
            filters,
            SongSortField::CreatedAt,
            SortDirection::Ascending,
            page,
        )
        .await?;
    let body = Page::new(items, &page, total).map(SongResponse::from);
    Ok(Json(ApiResponse::success(body)))
}
