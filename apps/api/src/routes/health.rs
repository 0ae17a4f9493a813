use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus where each font role was loaded from.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobboard-api",
        "fonts": state.renderer.fonts().describe(),
        "limits": {
            "maxTitlesPerBatch": state.config.max_titles_per_batch,
            "maxImageDimension": state.config.max_image_dimension,
        },
    }))
}
