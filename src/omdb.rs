use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    catalog::{CatalogSource, PlotLength},
    error::{AppError, AppResult},
    models::{CatalogHit, CatalogMovie, SearchPage, SearchQuery},
};

/// Upstream calls are never retried; a timeout fails the call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, rps: u32) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no OMDB_API_KEY provided, catalog requests will fail");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, api_key, base_url, limiter }
    }

    async fn fetch(&self, params: &[(&str, String)]) -> AppResult<Value> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::upstream("OMDB API key is not configured"));
        }

        self.limiter.until_ready().await;

        let body: Value = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("r", "json")])
            .query(params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        open_envelope(body)
    }
}

impl CatalogSource for OmdbClient {
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let mut params = vec![("s", query.query.clone())];
        if let Some(page) = query.page.filter(|p| *p > 1) {
            params.push(("page", page.to_string()));
        }
        if let Some(year) = &query.year {
            params.push(("y", year.clone()));
        }
        if let Some(kind) = query.kind {
            params.push(("type", kind.as_str().to_string()));
        }

        tracing::debug!(query = %query.query, page = ?query.page, "searching catalog");

        let body = self.fetch(&params).await?;
        let resp: SearchResponse =
            serde_json::from_value(body).map_err(|e| AppError::Upstream(anyhow::Error::new(e)))?;

        Ok(SearchPage {
            movies: resp.search,
            total_results: resp.total_results.and_then(|t| t.trim().parse().ok()).unwrap_or(0),
        })
    }

    async fn details(&self, imdb_id: &str, plot: PlotLength) -> AppResult<CatalogMovie> {
        tracing::debug!(imdb_id = %imdb_id, plot = plot.as_str(), "fetching catalog record");

        let params = [("i", imdb_id.to_string()), ("plot", plot.as_str().to_string())];
        let body = self.fetch(&params).await?;
        serde_json::from_value(body).map_err(|e| AppError::Upstream(anyhow::Error::new(e)))
    }
}

/// The catalog answers 200 for misses too, flagging them with
/// `"Response": "False"` and an `Error` message.
fn open_envelope(body: Value) -> AppResult<Value> {
    if body.get("Response").and_then(Value::as_str) == Some("True") {
        return Ok(body);
    }
    let message = body.get("Error").and_then(Value::as_str).unwrap_or("Movie not found!");
    Err(AppError::NotFound(message.to_string()))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<CatalogHit>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}
