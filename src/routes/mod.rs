use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::{AppError, attach_error_details},
};

mod catalog;
mod movies;

pub fn router(state: Arc<AppState>) -> Router {
    let movies = Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route("/stats", get(movies::stats))
        .route("/import", post(movies::import))
        .route("/{id}", get(movies::get).put(movies::update).delete(movies::delete));

    let omdb = Router::new()
        .route("/search", get(catalog::search))
        .route("/movie/{imdb_id}", get(catalog::details))
        .route("/region-movies", get(catalog::region_movies))
        .route("/search-by-actor", get(catalog::search_by_actor))
        .route("/featured-actors", get(catalog::featured_actors))
        .route("/featured-actor-names", get(catalog::featured_actor_names))
        .route("/batch-details", post(catalog::batch_details));

    let api = Router::new()
        .route("/health", get(health))
        .nest("/movies", movies)
        .nest("/omdb", omdb)
        .fallback(api_not_found);

    let expose_details = state.environment.exposes_error_details();
    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &state.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }
    let mut app = app.with_state(state);
    if expose_details {
        app = app.layer(middleware::map_response(attach_error_details));
    }

    app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": jiff::Timestamp::now().to_string(),
        "message": "Movie collection API is running",
        "persistence": state.store.is_configured(),
    }))
}

async fn api_not_found() -> AppError {
    AppError::not_found("API route not found")
}

/// Trimmed value, or `None` when missing or blank.
fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
