use std::sync::Arc;

use reelshelf::{
    AppState,
    catalog::Catalog,
    config::Config,
    omdb::{self, OmdbClient},
    routes,
    store::StoreHandle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelshelf=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("reelshelf/0.1")
        .timeout(omdb::REQUEST_TIMEOUT)
        .build()?;

    let omdb = OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
        config.omdb_rps,
    );

    let store = StoreHandle::new(config.database_url.clone());
    if !store.is_configured() {
        tracing::warn!("DATABASE_URL not set, collection routes are disabled");
    } else if let Err(err) = store.get().await {
        tracing::error!(error = ?err, "collection store unavailable, retrying on first use");
    }

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving front-end files");
    }

    let state = Arc::new(AppState {
        catalog: Catalog::new(omdb),
        store,
        environment: config.environment,
        static_dir: config.static_dir.clone(),
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, environment = ?config.environment, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
