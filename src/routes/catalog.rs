use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::non_blank;
use crate::{
    AppState,
    catalog::DEFAULT_REGION_LIMIT,
    error::{AppError, AppResult},
    models::{CatalogKind, CatalogMovie, SearchQuery},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    year: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(params) = params?;

    let query = non_blank(params.query.as_deref())
        .ok_or_else(|| AppError::validation("Search query is required"))?;
    let kind = non_blank(params.kind.as_deref()).map(str::parse::<CatalogKind>).transpose()?;
    let page = non_blank(params.page.as_deref())
        .map(|p| {
            p.parse::<u32>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| AppError::validation("Page must be a positive number"))
        })
        .transpose()?;

    let search = SearchQuery {
        query: query.to_string(),
        year: non_blank(params.year.as_deref()).map(str::to_string),
        kind,
        page,
    };
    let page = state.catalog.search(&search).await?;

    Ok(Json(json!({
        "success": true,
        "movies": page.movies,
        "totalResults": page.total_results,
    })))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie = state.catalog.details(&imdb_id).await?;
    Ok(Json(json!({ "success": true, "movie": movie })))
}

#[derive(Debug, Deserialize)]
pub struct RegionParams {
    limit: Option<String>,
}

pub async fn region_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RegionParams>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(params) = params?;
    // Anything that is not a positive number falls back to the default.
    let limit = non_blank(params.limit.as_deref())
        .and_then(|l| l.parse::<usize>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_REGION_LIMIT);

    let movies = state.catalog.region_movies(limit).await?;
    Ok(Json(json!({ "success": true, "count": movies.len(), "movies": movies })))
}

#[derive(Debug, Deserialize)]
pub struct ActorParams {
    actor: Option<String>,
}

pub async fn search_by_actor(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ActorParams>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(params) = params?;
    let actor = non_blank(params.actor.as_deref())
        .ok_or_else(|| AppError::validation("Actor name is required"))?;

    let movies = state.catalog.search_by_actor(actor).await?;
    Ok(Json(json!({ "success": true, "count": movies.len(), "movies": movies })))
}

/// Typed rather than `json!` so the actors stay in featured order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedActors {
    success: bool,
    actors_movies: IndexMap<String, Vec<CatalogMovie>>,
}

pub async fn featured_actors(State(state): State<Arc<AppState>>) -> AppResult<Json<FeaturedActors>> {
    let actors_movies = state.catalog.featured_actors_movies().await?;
    Ok(Json(FeaturedActors { success: true, actors_movies }))
}

pub async fn featured_actor_names(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "success": true, "actors": state.catalog.featured_actor_names() }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(alias = "movieList")]
    id_list: Option<Vec<BatchItem>>,
}

/// Either a bare ID or a search hit carrying one. Anything else is
/// kept so it can be counted as skipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchItem {
    Id(String),
    Hit {
        #[serde(rename = "imdbID", default)]
        imdb_id: Option<String>,
    },
    Other(Value),
}

impl BatchItem {
    fn imdb_id(&self) -> &str {
        match self {
            BatchItem::Id(id) => id,
            BatchItem::Hit { imdb_id } => imdb_id.as_deref().unwrap_or(""),
            BatchItem::Other(_) => "",
        }
    }
}

pub async fn batch_details(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = body?;
    let items = body.id_list.ok_or_else(|| AppError::validation("ID list array is required"))?;

    let ids: Vec<&str> = items.iter().map(BatchItem::imdb_id).collect();
    let batch = state.catalog.many_details(&ids).await;

    Ok(Json(json!({
        "success": true,
        "count": batch.movies.len(),
        "skipped": batch.skipped,
        "movies": batch.movies,
    })))
}
