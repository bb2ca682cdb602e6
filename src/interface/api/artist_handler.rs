//! Artist catalog handlers
//!
//! Read-only views over an artist's songs and albums. An unknown
//! artist ID yields an empty page rather than an error; the catalog
//! is a filter, not a profile lookup.

use super::album_dto::AlbumResponse;
use super::metrics_handler::record_listing;
use super::response::{ApiError, ApiResponse};
use super::song_dto::SongResponse;
use super::user_dto::PageQuery;
use super::user_handler::AppState;
use crate::domain::album::{AlbumFilters, AlbumSortField};
use crate::domain::shared::{Page, PageRequest, SortDirection};
use crate::domain::song::{SongFilters, SongSortField};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

/// List an artist's songs, newest first
pub async fn artist_songs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<SongResponse>>>, ApiError> {
    info!("API: Listing songs by artist {}", id);

    let filters = SongFilters {
        artist_id: Some(id),
        ..SongFilters::default()
    };
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("artist_songs");
    let (items, total) = state
        .songs
        .list(
            filters,
            SongSortField::CreatedAt,
            SortDirection::Descending,
            page,
        )
        .await?;
    let body = Page::new(items, &page, total).map(SongResponse::from);
    Ok(Json(ApiResponse::success(body)))
}

/// List an artist's albums, newest first
pub async fn artist_albums(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<AlbumResponse>>>, ApiError> {
    info!("API: Listing albums by artist {}", id);

    let filters = AlbumFilters {
        artist_id: Some(id),
        ..AlbumFilters::default()
    };
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    record_listing("artist_albums");
    let (items, total) = state
        .albums
        .list(
            filters,
            AlbumSortField::CreatedAt,
            SortDirection::Descending,
            page,
        )
        .await?;
    let body = Page::new(items, &page, total).map(AlbumResponse::from);
    Ok(Json(ApiResponse::success(body)))
}
