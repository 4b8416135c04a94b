use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::flow::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, analyzer: Arc<dyn ResumeAnalyzer>) -> Self {
        Self {
            sessions: SessionStore::new(config.payment_delay()),
            analyzer,
            config,
        }
    }
}
