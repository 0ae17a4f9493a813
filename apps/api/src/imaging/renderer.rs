//! Batch renderer: one job card per title.
//!
//! # Pipeline (per title, in input order)
//! 1. Background from the batch's `ColorCursor`, foreground by luminance.
//! 2. Title face by script; greedy wrap into the content width, centred, bold.
//! 3. Separator under the title when there is room.
//! 4. Contact lines stacked up from the bottom margin.
//! 5. PNG → base64 data URI.
//!
//! Validation runs before any drawing. The first failure after that aborts the whole
//! batch and no images are returned.

use std::sync::Arc;

use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

use crate::imaging::canvas::{Baseline, Canvas};
use crate::imaging::encode::{encode_png, to_data_uri};
use crate::imaging::fonts::FontSet;
use crate::imaging::palette::{contrasting_text_color, ColorCursor, Rgb};
use crate::imaging::placement::{
    stack_contact_blocks, CardGeometry, ContactInfo, SEPARATOR_ALPHA, SEPARATOR_THICKNESS,
};
use crate::imaging::script::detect_script;
use crate::imaging::RenderError;

/// Default square social-media post size.
pub const DEFAULT_IMAGE_SIZE: u32 = 1080;

// ────────────────────────────────────────────────────────────────────────────
// Request / output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub titles: Vec<String>,
    pub contact: ContactInfo,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    /// Titles only, default size, no contact lines.
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            contact: ContactInfo::default(),
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedImage {
    pub title: String,
    pub background: Rgb,
    pub data_uri: String,
}

/// Bounds on the work a single batch may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub max_titles: usize,
    pub max_dimension: u32,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_titles: 50,
            max_dimension: 4096,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

pub struct Renderer {
    fonts: Arc<FontSet>,
    limits: RenderLimits,
}

impl Renderer {
    pub fn new(fonts: Arc<FontSet>, limits: RenderLimits) -> Self {
        Self { fonts, limits }
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Renders one image per title, in order.
    ///
    /// The palette cursor is local to this call, so every batch starts at the first
    /// palette color regardless of what earlier batches rendered.
    pub fn render(&self, request: &RenderRequest) -> Result<Vec<RenderedImage>, RenderError> {
        self.validate(request)?;

        let geometry = CardGeometry::new(request.width, request.height);
        let mut cursor = ColorCursor::new();

        request
            .titles
            .iter()
            .map(|title| -> Result<RenderedImage, RenderError> {
                let slot = cursor.position();
                let background = cursor.advance();
                let image = self.render_card(title, background, &request.contact, &geometry)?;
                let png = encode_png(&image)?;
                debug!(
                    title = %title,
                    palette_slot = slot,
                    background = %background.to_hex(),
                    bytes = png.len(),
                    "Rendered job card"
                );
                Ok(RenderedImage {
                    title: title.clone(),
                    background,
                    data_uri: to_data_uri(&png),
                })
            })
            .collect()
    }

    /// Paints a single card on `background`.
    pub fn render_card(
        &self,
        title: &str,
        background: Rgb,
        contact: &ContactInfo,
        geometry: &CardGeometry,
    ) -> Result<RgbaImage, RenderError> {
        let foreground = contrasting_text_color(background);
        let mut canvas = Canvas::new(geometry.width as u32, geometry.height as u32)?;
        canvas.fill(background);

        // Title
        let title_face = self.fonts.title_face(detect_script(title));
        let title_block = geometry.title_block(title, |s| title_face.measure(s, geometry.title_px));
        for line in &title_block.lines {
            canvas.draw_line_text(
                title_face,
                &line.text,
                geometry.center_x,
                line.y,
                geometry.title_px,
                Baseline::Middle,
                foreground,
            );
        }

        // Separator
        if let Some(y) = geometry.separator_y(title_block.next_y) {
            canvas.stroke_horizontal(
                geometry.padding,
                geometry.width - geometry.padding,
                y,
                SEPARATOR_THICKNESS,
                foreground,
                SEPARATOR_ALPHA,
            );
        }

        // Contact lines
        let contact_face = self.fonts.contact_face();
        let stack = stack_contact_blocks(contact, geometry, |s, px| contact_face.measure(s, px));
        debug!(
            title_lines = title_block.line_count(),
            title_bottom = title_block.next_y,
            contact_blocks = stack.blocks.len(),
            contact_top = stack.top,
            "Card layout"
        );
        for placed in &stack.blocks {
            for line in &placed.block.lines {
                canvas.draw_line_text(
                    contact_face,
                    &line.text,
                    geometry.center_x,
                    line.y,
                    placed.px,
                    Baseline::Bottom,
                    foreground,
                );
            }
        }

        Ok(canvas.into_image())
    }

    fn validate(&self, request: &RenderRequest) -> Result<(), RenderError> {
        if request.titles.is_empty() {
            return Err(RenderError::Validation(
                "Job titles are required".to_string(),
            ));
        }
        if request.titles.len() > self.limits.max_titles {
            return Err(RenderError::Validation(format!(
                "At most {} job titles can be rendered per request, got {}",
                self.limits.max_titles,
                request.titles.len()
            )));
        }
        if let Some(idx) = request.titles.iter().position(|t| t.trim().is_empty()) {
            return Err(RenderError::Validation(format!(
                "Job title at position {idx} is empty"
            )));
        }
        if request.width == 0 || request.height == 0 {
            return Err(RenderError::Validation(
                "imageWidth and imageHeight must be positive".to_string(),
            ));
        }
        let max = self.limits.max_dimension;
        if request.width > max || request.height > max {
            return Err(RenderError::Validation(format!(
                "imageWidth and imageHeight must not exceed {max}"
            )));
        }
        Ok(())
    }
}
