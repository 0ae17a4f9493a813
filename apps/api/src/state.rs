use std::sync::Arc;

use crate::config::Config;
use crate::imaging::Renderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Image renderer holding the font set loaded at startup. Stateless between requests.
    pub renderer: Arc<Renderer>,
}
