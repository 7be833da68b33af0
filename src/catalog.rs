use std::{collections::HashMap, future::Future, time::Duration};

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogHit, CatalogMovie, SearchPage, SearchQuery},
    region,
};

pub const DETAIL_BATCH_SIZE: usize = 5;
pub const DEFAULT_REGION_LIMIT: usize = 20;
const ACTOR_DETAIL_LIMIT: usize = 10;
const FEATURED_DETAIL_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlotLength {
    Short,
    Full,
}

impl PlotLength {
    pub fn as_str(self) -> &'static str {
        match self {
            PlotLength::Short => "short",
            PlotLength::Full => "full",
        }
    }
}

/// Upstream lookups the aggregations are built from.
pub trait CatalogSource: Send + Sync {
    /// Fails with `NotFound` when the catalog reports no match.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = AppResult<SearchPage>> + Send;

    /// Fails with `NotFound` when the catalog has no such ID.
    fn details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> impl Future<Output = AppResult<CatalogMovie>> + Send;
}

/// Pauses that keep bursts of upstream calls under the catalog's rate limit.
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    pub between_batches: Duration,
    pub between_seeds: Duration,
    pub between_actors: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_batches: Duration::from_millis(200),
            between_seeds: Duration::from_millis(100),
            between_actors: Duration::from_millis(200),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            between_batches: Duration::ZERO,
            between_seeds: Duration::ZERO,
            between_actors: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchDetails {
    pub movies: Vec<CatalogMovie>,
    /// Entries dropped because they had no ID or their fetch failed.
    pub skipped: usize,
}

pub struct Catalog<S> {
    source: S,
    pacing: Pacing,
}

impl<S: CatalogSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self { source, pacing: Pacing::default() }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        if query.query.trim().is_empty() {
            return Err(AppError::validation("Search query is required"));
        }
        self.source.search(query).await
    }

    pub async fn details(&self, imdb_id: &str) -> AppResult<CatalogMovie> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(AppError::validation("IMDB ID is required"));
        }
        self.source.details(imdb_id, PlotLength::Full).await
    }

    /// Best-effort bulk read: fetches in batches of [`DETAIL_BATCH_SIZE`],
    /// dropping blank IDs and failed lookups. Results keep input order.
    pub async fn many_details(&self, ids: &[&str]) -> BatchDetails {
        let mut out = BatchDetails::default();

        for (n, batch) in ids.chunks(DETAIL_BATCH_SIZE).enumerate() {
            if n > 0 {
                pause(self.pacing.between_batches).await;
            }
            let fetched = join_all(batch.iter().map(|id| self.fetch_one(id))).await;
            for movie in fetched {
                match movie {
                    Some(movie) => out.movies.push(movie),
                    None => out.skipped += 1,
                }
            }
        }

        debug!(
            requested = ids.len(),
            fetched = out.movies.len(),
            skipped = out.skipped,
            "batch detail fetch finished"
        );
        out
    }

    async fn fetch_one(&self, imdb_id: &str) -> Option<CatalogMovie> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            warn!("skipping catalog entry without an imdbID");
            return None;
        }
        match self.source.details(imdb_id, PlotLength::Short).await {
            Ok(movie) => Some(movie),
            Err(err) => {
                warn!(imdb_id = %imdb_id, error = %err, "detail fetch failed, skipping");
                None
            },
        }
    }

    /// Merges the region seed searches, keeps the first `limit` distinct
    /// titles and prefers the ones tied to the region.
    pub async fn region_movies(&self, limit: usize) -> AppResult<Vec<CatalogMovie>> {
        let mut merged = Vec::new();
        for (n, keyword) in region::seed_keywords().iter().enumerate() {
            if n > 0 {
                pause(self.pacing.between_seeds).await;
            }
            match self.source.search(&SearchQuery::keyword(*keyword)).await {
                Ok(page) => merged.extend(page.movies),
                Err(AppError::NotFound(reason)) => {
                    debug!(keyword = %keyword, reason = %reason, "seed search found nothing");
                },
                Err(err) => return Err(err),
            }
        }

        let mut unique = dedup_by_id(merged);
        unique.truncate(limit);

        let ids: Vec<&str> = unique.iter().map(|hit| hit.imdb_id.as_str()).collect();
        let detailed = self.many_details(&ids).await.movies;
        Ok(prefer_region(detailed))
    }

    pub async fn search_by_actor(&self, name: &str) -> AppResult<Vec<CatalogMovie>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Actor name is required"));
        }

        let hits = match self.source.search(&SearchQuery::keyword(name)).await {
            Ok(page) => page.movies,
            Err(AppError::NotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let ids: Vec<&str> =
            hits.iter().take(ACTOR_DETAIL_LIMIT).map(|hit| hit.imdb_id.as_str()).collect();
        let detailed = self.many_details(&ids).await.movies;

        let needle = name.to_lowercase();
        Ok(detailed
            .into_iter()
            .filter(|m| m.actors.as_deref().is_some_and(|a| a.to_lowercase().contains(&needle)))
            .collect())
    }

    /// Actor name to a few of their titles, in featured order. Actors
    /// without hits are left out.
    pub async fn featured_actors_movies(&self) -> AppResult<IndexMap<String, Vec<CatalogMovie>>> {
        let mut out = IndexMap::new();

        for (n, actor) in region::featured_actors().iter().enumerate() {
            if n > 0 {
                pause(self.pacing.between_actors).await;
            }

            let hits = match self.source.search(&SearchQuery::keyword(*actor)).await {
                Ok(page) => page.movies,
                Err(AppError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };
            if hits.is_empty() {
                continue;
            }

            let ids: Vec<&str> =
                hits.iter().take(FEATURED_DETAIL_LIMIT).map(|hit| hit.imdb_id.as_str()).collect();
            let detailed = self.many_details(&ids).await.movies;
            out.insert(actor.to_string(), detailed);
        }

        Ok(out)
    }

    pub fn featured_actor_names(&self) -> &'static [&'static str] {
        &region::FEATURED_ACTORS
    }
}

/// One entry per ID. A repeated ID keeps the position of its first
/// occurrence but the contents of its last. Hits without an ID are dropped.
pub fn dedup_by_id(hits: Vec<CatalogHit>) -> Vec<CatalogHit> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<CatalogHit> = Vec::with_capacity(hits.len());

    for hit in hits {
        if hit.imdb_id.trim().is_empty() {
            continue;
        }
        match index.get(&hit.imdb_id) {
            Some(&pos) => out[pos] = hit,
            None => {
                index.insert(hit.imdb_id.clone(), out.len());
                out.push(hit);
            },
        }
    }

    out
}

/// Region matches if there are any, otherwise everything.
fn prefer_region(movies: Vec<CatalogMovie>) -> Vec<CatalogMovie> {
    let matching: Vec<CatalogMovie> = movies.iter().filter(|m| region::matches(m)).cloned().collect();
    if matching.is_empty() { movies } else { matching }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
