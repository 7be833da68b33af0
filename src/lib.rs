pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filters;
pub mod models;
pub mod omdb;
pub mod region;
pub mod routes;
pub mod store;

use std::path::PathBuf;

use crate::{catalog::Catalog, config::Environment, omdb::OmdbClient, store::StoreHandle};

pub struct AppState {
    pub catalog: Catalog<OmdbClient>,
    pub store: StoreHandle,
    pub environment: Environment,
    pub static_dir: Option<PathBuf>,
}
