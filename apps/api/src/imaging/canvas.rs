//! RGBA raster surface with the handful of 2D operations a job card needs.

use image::RgbaImage;

use crate::imaging::fonts::FontFace;
use crate::imaging::palette::Rgb;
use crate::imaging::RenderError;

/// Vertical anchor of a text line, as in a 2D canvas `textBaseline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// `y` is the middle of the em box.
    Middle,
    /// `y` is the bottom of the em box.
    Bottom,
}

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Raster(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    pub fn fill(&mut self, color: Rgb) {
        let px = color.to_rgba();
        for pixel in self.image.pixels_mut() {
            *pixel = px;
        }
    }

    /// Source-over blend of `color` at `coverage` (0..=1). Out-of-bounds is clipped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x, y);
        let inv = 1.0 - alpha;
        let src = [color.r, color.g, color.b];
        for (channel, s) in dst.0.iter_mut().take(3).zip(src) {
            *channel = (s as f32 * alpha + *channel as f32 * inv).round() as u8;
        }
        dst.0[3] = 0xFF;
    }

    /// Horizontal rule from `x0` to `x1`, `thickness` pixels tall, centred on `y`.
    pub fn stroke_horizontal(
        &mut self,
        x0: f32,
        x1: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let top = (y - thickness / 2.0).round() as i32;
        let bottom = (y + thickness / 2.0).round() as i32;
        let left = x0.round() as i32;
        let right = x1.round() as i32;

        for py in top..bottom {
            for px in left..right {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// Draws one line of text horizontally centred on `center_x`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_text(
        &mut self,
        face: &dyn FontFace,
        text: &str,
        center_x: f32,
        y: f32,
        px: f32,
        baseline: Baseline,
        color: Rgb,
    ) {
        let width = face.measure(text, px);
        let metrics = face.vertical_metrics(px);
        let baseline_y = match baseline {
            Baseline::Middle => y + (metrics.ascent + metrics.descent) / 2.0,
            Baseline::Bottom => y + metrics.descent,
        };
        face.draw(self, text, center_x - width / 2.0, baseline_y, px, color);
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let p = self.image.get_pixel(x, y);
        Rgb::new(p.0[0], p.0[1], p.0[2])
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
