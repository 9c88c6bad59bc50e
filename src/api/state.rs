// src/api/state.rs
use crate::config::AppConfig;
use crate::upstream::{HttpUpstream, Upstream};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_upstream(config, Arc::new(HttpUpstream::new(Client::new())))
    }

    /// Builds state around a custom transport, e.g. a scripted one in tests.
    pub fn with_upstream(config: AppConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }
}
