pub mod handlers;
pub mod request_id;
pub mod server;
pub mod service;

use std::sync::Arc;

use pkg_sources::SourceProvider;
use pkg_types::cluster::Cluster;

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SourceProvider>,
    pub clusters: Arc<Vec<Cluster>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn SourceProvider>, clusters: Vec<Cluster>) -> Self {
        Self {
            provider,
            clusters: Arc::new(clusters),
        }
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }
}
