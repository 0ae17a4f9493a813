//! Background palette, per-batch color cursor and foreground selection.
//!
//! Every batch walks the same fixed palette from the start, so the first card of
//! any request always gets `#F94144`, the second `#F3722C`, and so on.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Color type
// ────────────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 0xFF,
    g: 0xFF,
    b: 0xFF,
};

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 0xFF])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Palette
// ────────────────────────────────────────────────────────────────────────────

/// Fixed ordered background palette.
pub const PALETTE: [Rgb; 24] = [
    Rgb::new(0xF9, 0x41, 0x44),
    Rgb::new(0xF3, 0x72, 0x2C),
    Rgb::new(0xF8, 0x96, 0x1E),
    Rgb::new(0xF9, 0xC7, 0x4F),
    Rgb::new(0x90, 0xBE, 0x6D),
    Rgb::new(0x43, 0xAA, 0x8B),
    Rgb::new(0x4D, 0x90, 0x8E),
    Rgb::new(0x57, 0x75, 0x90),
    Rgb::new(0x27, 0x7D, 0xA1),
    Rgb::new(0x00, 0x30, 0x49),
    Rgb::new(0xD6, 0x28, 0x28),
    Rgb::new(0xF7, 0x7F, 0x00),
    Rgb::new(0xFC, 0xBF, 0x49),
    Rgb::new(0xEA, 0xE2, 0xB7),
    Rgb::new(0x2A, 0x9D, 0x8F),
    Rgb::new(0xE7, 0x6F, 0x51),
    Rgb::new(0xF4, 0xA2, 0x61),
    Rgb::new(0xE9, 0xC4, 0x6A),
    Rgb::new(0x26, 0x46, 0x53),
    Rgb::new(0x2B, 0x2D, 0x42),
    Rgb::new(0x8D, 0x99, 0xAE),
    Rgb::new(0xED, 0xF2, 0xF4),
    Rgb::new(0xEF, 0x23, 0x3C),
    Rgb::new(0xD9, 0x04, 0x29),
];

/// Rotating index into [`PALETTE`], scoped to a single batch.
/// The first `advance()` yields `PALETTE[0]`.
#[derive(Debug, Clone, Default)]
pub struct ColorCursor {
    next: usize,
}

impl ColorCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to the next palette slot (wrapping) and returns its color.
    pub fn advance(&mut self) -> Rgb {
        let color = PALETTE[self.next];
        self.next = (self.next + 1) % PALETTE.len();
        color
    }

    /// Palette index the next `advance()` will return.
    pub fn position(&self) -> usize {
        self.next
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Foreground selection
// ────────────────────────────────────────────────────────────────────────────

/// Weighted perceptual luminance in [0, 1].
pub fn luminance(color: Rgb) -> f32 {
    (0.299 * color.r as f32 + 0.587 * color.g as f32 + 0.114 * color.b as f32) / 255.0
}

/// Black text on light backgrounds, white text on dark ones.
///
/// Fixed 0.5 luminance cut-off; this is not a WCAG contrast-ratio check.
pub fn contrasting_text_color(background: Rgb) -> Rgb {
    if luminance(background) > 0.5 {
        BLACK
    } else {
        WHITE
    }
}
