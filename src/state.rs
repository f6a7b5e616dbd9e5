use crate::{config::ProxyConfig, services::store::ObjectStore};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(config: ProxyConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
