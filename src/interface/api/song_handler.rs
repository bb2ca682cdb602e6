//! Song API handlers

use super::auth::{require_user, CallerIdentity};
use super::metrics_handler::{record_listing, record_song_like, record_song_play};
use super::response::{ApiError, ApiResponse, DeleteResponse};
use super::song_dto::{
    CreateSongRequest, PlayCountResponse, SongListQuery, SongResponse, UpdateSongRequest,
};
use super::user_dto::PageQuery;
use super::user_handler::AppState;
use crate::domain::shared::{DomainError, Page, PageRequest, SortDirection};
use crate::domain::song::{LikeStatus, SongFilters, SongSortField};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

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

/// List songs with optional search, genre and artist filters
pub async fn list_songs(
    State(state): State<AppState>,
    Query(query): Query<SongListQuery>,
) -> Result<Json<ApiResponse<Page<SongResponse>>>, ApiError> {
    info!(
        "API: Listing songs (search: {:?}, genre: {:?}, artist: {:?})",
        query.search, query.genre, query.artist
    );

    let filters = SongFilters {
        search: query.search,
        genre: query.genre,
        artist_id: parse_artist_filter(query.artist.as_deref())?,
        album_id: None,
    };
    let sort = SongSortField::parse(query.sort_by.as_deref());
    let direction = SortDirection::parse(query.sort_order.as_deref());
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    record_listing("songs");
    let (items, total) = state.songs.list(filters, sort, direction, page).await?;
    let body = Page::new(items, &page, total).map(SongResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// List songs ranked by play count
///
/// The sort is pinned; client sort parameters are not accepted here.
pub async fn trending_songs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<SongResponse>>>, ApiError> {
    info!("API: Listing trending songs");

    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("trending");
    let (items, total) = state
        .songs
        .list(
            SongFilters::default(),
            SongSortField::PlayCount,
            SortDirection::Descending,
            page,
        )
        .await?;
    let body = Page::new(items, &page, total).map(SongResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// Get a song by ID
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SongResponse>>, ApiError> {
    info!("API: Getting song {}", id);

    let song = state
        .songs
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Song {} not found", id)))?;
    Ok(Json(ApiResponse::success(song.into())))
}

/// Publish a new song
pub async fn create_song(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<CreateSongRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SongResponse>>), ApiError> {
    info!("API: Creating song {} by {}", req.title, caller.0);

    let user = require_user(&state, caller).await?;
    let song = state.song_service.create(&user, req.into()).await?;
    info!("API: Created song {} (ID: {})", song.title, song.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(song.into()))))
}

/// Update a song's metadata
pub async fn update_song(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSongRequest>,
) -> Result<Json<ApiResponse<SongResponse>>, ApiError> {
    info!("API: Updating song {}", id);

    let user = require_user(&state, caller).await?;
    let song = state.song_service.update(&user, id, req.into()).await?;
    Ok(Json(ApiResponse::success(song.into())))
}

/// Delete a song
pub async fn delete_song(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    info!("API: Deleting song {}", id);

    let user = require_user(&state, caller).await?;
    state.song_service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(DeleteResponse { id, deleted: true })))
}

/// Toggle the caller's like on a song
pub async fn toggle_like(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeStatus>>, ApiError> {
    info!("API: Toggling like on song {} by {}", id, caller.0);

    let user = require_user(&state, caller).await?;
    let status = state.song_service.toggle_like(user.id, id).await?;
    record_song_like(status.liked);
    Ok(Json(ApiResponse::success(status)))
}

/// Record a playback event and return the new play count
pub async fn record_play(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlayCountResponse>>, ApiError> {
    info!("API: Recording play for song {}", id);

    let play_count = state.song_service.record_play(id).await?;
    record_song_play();
    Ok(Json(ApiResponse::success(PlayCountResponse { play_count })))
}

/// List the songs the caller has liked, most recently liked first
pub async fn liked_songs(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<SongResponse>>>, ApiError> {
    info!("API: Listing liked songs for {}", caller.0);

    let user = require_user(&state, caller).await?;
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("liked_songs");
    let (items, total) = state.songs.list_liked(user.id, page).await?;
    let body = Page::new(items, &page, total).map(SongResponse::from);
    Ok(Json(ApiResponse::success(body)))
}
