mod config;
mod errors;
mod imaging;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::imaging::{FontSet, Renderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    // Load fonts once; missing files degrade to system or metrics-only faces
    let font_paths = config.font_paths();
    info!("Loading fonts from {}", config.font_dir.display());
    let fonts = tokio::task::spawn_blocking(move || FontSet::load(&font_paths))
        .await
        .unwrap_or_else(|e| {
            warn!("Font loading panicked, using metrics-only faces: {e}");
            FontSet::fallback()
        });

    let limits = config.render_limits();
    info!(
        "Render limits: {} titles per batch, {}px max dimension",
        limits.max_titles, limits.max_dimension
    );
    let renderer = Arc::new(Renderer::new(Arc::new(fonts), limits));

    // Build app state
    let state = AppState {
        config: config.clone(),
        renderer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
