// Job-card image generation.
// Pure CPU work: callers on the async runtime must go through tokio::task::spawn_blocking.

pub mod canvas;
pub mod encode;
pub mod fonts;
pub mod handlers;
pub mod palette;
pub mod placement;
pub mod renderer;
pub mod script;
pub mod wrap;

use thiserror::Error;

// Re-export the public API consumed by main, state and routes.
pub use fonts::{FontPaths, FontSet};
pub use placement::ContactInfo;
pub use renderer::{RenderLimits, RenderRequest, Renderer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Validation(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Raster error: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
