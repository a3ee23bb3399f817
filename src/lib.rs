use config::Config;
use database::Repository;
use std::sync::Arc;
use storage::ObjectStore;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod storage;
pub mod upload;
pub mod utils;

pub use router::create_router;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repo: Arc<dyn Repository>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        repo: impl Repository + 'static,
        store: impl ObjectStore + 'static,
    ) -> Self {
        Self {
            config,
            repo: Arc::new(repo),
            store: Arc::new(store),
        }
    }
}
