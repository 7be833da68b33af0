use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn exposes_error_details(self) -> bool {
        self != Environment::Production
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    /// `None` disables the collection store; catalog routes keep working.
    pub database_url: Option<String>,
    pub omdb_rps: u32,
    pub environment: Environment,
    /// Front-end files served outside `/api`, with `index.html` as fallback.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let omdb_api_key = std::env::var("OMDB_API_KEY").unwrap_or_else(|_| "".to_string());
        let omdb_base_url = std::env::var("OMDB_BASE_URL")
            .unwrap_or_else(|_| "https://www.omdbapi.com/".to_string());

        let database_url =
            std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let omdb_rps: u32 =
            std::env::var("OMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        let environment = std::env::var("APP_ENV")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Environment::Development);

        let static_dir =
            std::env::var("STATIC_DIR").ok().filter(|dir| !dir.trim().is_empty()).map(PathBuf::from);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            omdb_api_key,
            omdb_base_url,
            database_url,
            omdb_rps,
            environment,
            static_dir,
        })
    }
}
