//! Axum route handler for the image generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::imaging::{ContactInfo, RenderRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImagesRequest {
    #[serde(default)]
    pub job_titles: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub contact_website: Option<String>,
    pub bottom_text: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImagesResponse {
    pub images: Vec<String>,
}

impl GenerateImagesRequest {
    /// Drops blank titles and fills in the default canvas size.
    fn into_render_request(self) -> RenderRequest {
        let titles = self
            .job_titles
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();

        let mut request = RenderRequest::new(titles);
        request.contact = ContactInfo {
            phone: self.contact_phone,
            email: self.contact_email,
            website: self.contact_website,
            footer: self.bottom_text,
        };
        if let Some(width) = self.image_width {
            request.width = width;
        }
        if let Some(height) = self.image_height {
            request.height = height;
        }
        request
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-images
///
/// Renders one PNG per non-blank job title and returns them as data URIs,
/// in the order the titles were given.
pub async fn handle_generate_images(
    State(state): State<AppState>,
    Json(request): Json<GenerateImagesRequest>,
) -> Result<Json<GenerateImagesResponse>, AppError> {
    let request = request.into_render_request();
    if request.titles.is_empty() {
        return Err(AppError::Validation("Job titles are required".to_string()));
    }

    let batch_id = Uuid::new_v4();
    info!(
        %batch_id,
        titles = request.titles.len(),
        width = request.width,
        height = request.height,
        "Generating job images"
    );

    // CPU-bound; keep it off the async workers.
    let renderer = state.renderer.clone();
    let images = tokio::task::spawn_blocking(move || renderer.render(&request))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in image render: {e}")))??;

    info!(%batch_id, images = images.len(), "Job images generated");

    Ok(Json(GenerateImagesResponse {
        images: images.into_iter().map(|image| image.data_uri).collect(),
    }))
}
