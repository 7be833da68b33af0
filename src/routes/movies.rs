use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::non_blank;
use crate::{
    AppState,
    error::{AppError, AppResult},
    filters::{CollectionFilter, CollectionQuery, CollectionStats},
    models::{Movie, MovieInput},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CollectionQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(query) = query?;
    let filter = CollectionFilter::try_from(query)?;
    let movies = state.store.get().await?.list().await?;
    Ok(Json(filter.apply(movies)))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CollectionQuery>, QueryRejection>,
) -> AppResult<Json<CollectionStats>> {
    let Query(query) = query?;
    let filter = CollectionFilter::try_from(query)?;
    let movies = state.store.get().await?.list().await?;
    let total = movies.len();
    Ok(Json(CollectionStats::compute(total, &filter.apply(movies))))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(input) = body?;
    let movie = state.store.get().await?.create(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Creates a record pre-filled from the catalog. Fields in the body
/// override the catalog's values.
pub async fn import(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(input) = body?;
    let imdb_id = non_blank(input.imdb_id.as_deref())
        .ok_or_else(|| AppError::validation("IMDB ID is required"))?
        .to_string();

    let store = state.store.get().await?;
    let detail = state.catalog.details(&imdb_id).await?;
    let merged = input.merged_over(MovieInput::from_catalog(&detail));

    let movie = store.create(merged).await?;
    tracing::info!(id = movie.id, imdb_id = %imdb_id, "imported movie from catalog");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.get().await?.get(id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<Json<Movie>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    Ok(Json(state.store.get().await?.update(id, input).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    state.store.get().await?.delete(id).await?;
    Ok(Json(json!({ "message": "Movie deleted successfully" })))
}

/// IDs that cannot exist are reported the same way as missing ones.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim().parse().map_err(|_| AppError::not_found("Movie not found"))
}
