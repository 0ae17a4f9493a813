//! Font faces and the startup-loaded font set.
//!
//! `FontSet::load` is run once in `main` and the resulting set is shared (via `Arc`)
//! with every render. A role whose font file is missing falls back to a system
//! sans-serif face, then to a metrics-only face. None of these steps is fatal.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusttype::{point, Font, GlyphId, Scale};
use serde::Serialize;
use tracing::{info, warn};

use crate::imaging::canvas::Canvas;
use crate::imaging::palette::Rgb;
use crate::imaging::script::Script;
use crate::imaging::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Face trait
// ────────────────────────────────────────────────────────────────────────────

/// Where a face was loaded from. Reported on `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FaceOrigin {
    File(String),
    System(String),
    Fallback,
}

impl fmt::Display for FaceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceOrigin::File(path) => write!(f, "file {path}"),
            FaceOrigin::System(name) => write!(f, "system font {name}"),
            FaceOrigin::Fallback => write!(f, "metrics-only fallback"),
        }
    }
}

/// Vertical extents of a face at a pixel size. `descent` is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// A font face the renderer can measure and paint with.
///
/// `FontSet` carries these as `Arc<dyn FontFace>` so tests can substitute their own.
pub trait FontFace: Send + Sync {
    /// Advance width of `text` at `px` pixels per em.
    fn measure(&self, text: &str, px: f32) -> f32;

    fn vertical_metrics(&self, px: f32) -> VerticalMetrics;

    /// Paints `text` with its left edge at `x` and alphabetic baseline at `baseline`.
    fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, px: f32, color: Rgb);

    fn origin(&self) -> FaceOrigin;
}

// ────────────────────────────────────────────────────────────────────────────
// OutlineFace: rustybuzz shaping, rusttype rasterisation
// ────────────────────────────────────────────────────────────────────────────

/// One glyph of a shaped run, in pixels relative to the run's pen origin.
///
/// `y` grows downward, like canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    pub x: f32,
    pub y: f32,
}

/// Output of [`OutlineFace::shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    /// Sum of the shaped advances.
    pub advance: f32,
}

/// A parsed TrueType/OpenType face.
///
/// Text goes through OpenType shaping before anything is measured or drawn, so
/// reordered vowel signs, conjuncts, ligatures and GPOS kerning all come out of
/// the font's own tables. The raw bytes are kept so a transient `rustybuzz::Face`
/// can borrow them per call.
pub struct OutlineFace {
    bytes: Arc<Vec<u8>>,
    face_index: u32,
    raster: Font<'static>,
    units_per_em: f32,
    origin: FaceOrigin,
}

impl OutlineFace {
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("cannot read {}: {e}", path.display())))?;
        Self::from_bytes(data, 0, FaceOrigin::File(path.display().to_string()))
    }

    /// Parses face `face_index` of `data` (0 unless `data` is a collection).
    pub fn from_bytes(
        data: Vec<u8>,
        face_index: u32,
        origin: FaceOrigin,
    ) -> Result<Self, RenderError> {
        let units_per_em = rustybuzz::Face::from_slice(&data, face_index)
            .map(|face| face.units_per_em() as f32)
            .ok_or_else(|| RenderError::Font(format!("cannot parse {origin}")))?;
        let raster = Font::try_from_vec_and_index(data.clone(), face_index)
            .ok_or_else(|| RenderError::Font(format!("cannot rasterise {origin}")))?;

        Ok(Self {
            bytes: Arc::new(data),
            face_index,
            raster,
            units_per_em,
            origin,
        })
    }

    /// Pixels per font unit at `px` pixels per em.
    fn units_to_px(&self, px: f32) -> f32 {
        px / self.units_per_em
    }

    /// rusttype scales by ascent-to-descent height, not by em; convert so glyph
    /// outlines agree with the shaper's em-based advances.
    fn raster_scale(&self, px: f32) -> Scale {
        let v = self.raster.v_metrics_unscaled();
        Scale::uniform(px * (v.ascent - v.descent) / self.units_per_em)
    }

    /// Shapes `text` as a single run at `px` pixels per em.
    pub fn shape(&self, text: &str, px: f32) -> ShapedRun {
        let Some(face) = rustybuzz::Face::from_slice(&self.bytes, self.face_index) else {
            return ShapedRun {
                glyphs: Vec::new(),
                advance: 0.0,
            };
        };

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], buffer);

        let k = self.units_to_px(px);
        let mut pen = 0.0_f32;
        let glyphs = shaped
            .glyph_infos()
            .iter()
            .zip(shaped.glyph_positions())
            .map(|(info, pos)| {
                let glyph = ShapedGlyph {
                    id: info.glyph_id as u16,
                    x: pen + pos.x_offset as f32 * k,
                    y: -(pos.y_offset as f32 * k),
                };
                pen += pos.x_advance as f32 * k;
                glyph
            })
            .collect();

        ShapedRun {
            glyphs,
            advance: pen,
        }
    }
}

impl FontFace for OutlineFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        self.shape(text, px).advance
    }

    fn vertical_metrics(&self, px: f32) -> VerticalMetrics {
        let v = self.raster.v_metrics_unscaled();
        let k = self.units_to_px(px);
        VerticalMetrics {
            ascent: v.ascent * k,
            descent: v.descent * k,
        }
    }

    fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, px: f32, color: Rgb) {
        let scale = self.raster_scale(px);

        for shaped in self.shape(text, px).glyphs {
            let glyph = self
                .raster
                .glyph(GlyphId(shaped.id))
                .scaled(scale)
                .positioned(point(x + shaped.x, baseline + shaped.y));
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    canvas.blend_pixel(bb.min.x + gx as i32, bb.min.y + gy as i32, color, coverage);
                });
            }
        }
    }

    fn origin(&self) -> FaceOrigin {
        self.origin.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FixedAdvanceFace: metrics-only stand-in
// ────────────────────────────────────────────────────────────────────────────

/// Approximate em-fraction advances for when no outline font is available.
///
/// Layout still works (wrapping, stacking, separator placement) but no glyphs
/// are painted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAdvanceFace;

impl FixedAdvanceFace {
    fn advance_em(c: char) -> f32 {
        match c {
            ' ' => 0.26,
            'i' | 'l' | 'j' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.25,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.62,
            _ => 0.55,
        }
    }
}

impl FontFace for FixedAdvanceFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars().map(Self::advance_em).sum::<f32>() * px
    }

    fn vertical_metrics(&self, px: f32) -> VerticalMetrics {
        VerticalMetrics {
            ascent: 0.8 * px,
            descent: -0.2 * px,
        }
    }

    fn draw(&self, _: &mut Canvas, _: &str, _: f32, _: f32, _: f32, _: Rgb) {}

    fn origin(&self) -> FaceOrigin {
        FaceOrigin::Fallback
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FontSet
// ────────────────────────────────────────────────────────────────────────────

/// The three font roles the card layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Sinhala,
    LatinRegular,
    LatinBold,
}

/// Font file locations, one per role.
#[derive(Debug, Clone)]
pub struct FontPaths {
    pub sinhala: PathBuf,
    pub latin_regular: PathBuf,
    pub latin_bold: PathBuf,
}

/// One line of `FontSet::describe`.
#[derive(Debug, Clone, Serialize)]
pub struct FaceReport {
    pub role: FontRole,
    pub origin: FaceOrigin,
}

/// Loaded faces for every role. Immutable once built.
#[derive(Clone)]
pub struct FontSet {
    sinhala: Arc<dyn FontFace>,
    latin_regular: Arc<dyn FontFace>,
    latin_bold: Arc<dyn FontFace>,
}

impl FontSet {
    /// Loads every role from disk, falling back to system fonts, then to metrics only.
    pub fn load(paths: &FontPaths) -> Self {
        let mut system = SystemFonts::default();

        let sinhala = load_role(FontRole::Sinhala, &paths.sinhala, &mut system);
        let latin_regular = load_role(FontRole::LatinRegular, &paths.latin_regular, &mut system);
        let latin_bold = load_role(FontRole::LatinBold, &paths.latin_bold, &mut system);

        let set = Self {
            sinhala,
            latin_regular,
            latin_bold,
        };
        for report in set.describe() {
            info!(role = ?report.role, "Font face: {}", report.origin);
        }
        set
    }

    pub fn from_faces(
        sinhala: Arc<dyn FontFace>,
        latin_regular: Arc<dyn FontFace>,
        latin_bold: Arc<dyn FontFace>,
    ) -> Self {
        Self {
            sinhala,
            latin_regular,
            latin_bold,
        }
    }

    /// Metrics-only faces for every role.
    pub fn fallback() -> Self {
        let face: Arc<dyn FontFace> = Arc::new(FixedAdvanceFace);
        Self::from_faces(face.clone(), face.clone(), face)
    }

    pub fn face(&self, role: FontRole) -> &dyn FontFace {
        match role {
            FontRole::Sinhala => self.sinhala.as_ref(),
            FontRole::LatinRegular => self.latin_regular.as_ref(),
            FontRole::LatinBold => self.latin_bold.as_ref(),
        }
    }

    /// Titles are bold in Latin, and use the Sinhala face when they contain Sinhala.
    pub fn title_role(script: Script) -> FontRole {
        match script {
            Script::Sinhala => FontRole::Sinhala,
            Script::Latin => FontRole::LatinBold,
        }
    }

    pub fn title_face(&self, script: Script) -> &dyn FontFace {
        self.face(Self::title_role(script))
    }

    /// Contact lines and footer text are always Latin regular.
    pub fn contact_face(&self) -> &dyn FontFace {
        self.face(FontRole::LatinRegular)
    }

    pub fn describe(&self) -> Vec<FaceReport> {
        [FontRole::Sinhala, FontRole::LatinRegular, FontRole::LatinBold]
            .into_iter()
            .map(|role| FaceReport {
                role,
                origin: self.face(role).origin(),
            })
            .collect()
    }
}

fn load_role(role: FontRole, path: &Path, system: &mut SystemFonts) -> Arc<dyn FontFace> {
    match OutlineFace::from_file(path) {
        Ok(face) => return Arc::new(face),
        Err(e) => warn!(role = ?role, "Font not loaded, trying system fonts: {e}"),
    }

    if let Some(face) = system.lookup(role) {
        return Arc::new(face);
    }

    warn!(
        role = ?role,
        "No usable font found; text for this role will be measured but not drawn"
    );
    Arc::new(FixedAdvanceFace)
}

// ────────────────────────────────────────────────────────────────────────────
// System font lookup (fontdb)
// ────────────────────────────────────────────────────────────────────────────

const SINHALA_FAMILIES: &[fontdb::Family<'static>] = &[
    fontdb::Family::Name("Iskoola Pota"),
    fontdb::Family::Name("Noto Sans Sinhala"),
    fontdb::Family::SansSerif,
];

const LATIN_FAMILIES: &[fontdb::Family<'static>] =
    &[fontdb::Family::Name("Open Sans"), fontdb::Family::SansSerif];

/// Lazily-populated system font database. Only scanned if a configured file is missing.
#[derive(Default)]
struct SystemFonts {
    db: Option<fontdb::Database>,
}

impl SystemFonts {
    fn database(&mut self) -> &fontdb::Database {
        self.db.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            info!("Scanned {} system font faces", db.len());
            db
        })
    }

    fn lookup(&mut self, role: FontRole) -> Option<OutlineFace> {
        let (families, weight) = match role {
            FontRole::Sinhala => (SINHALA_FAMILIES, fontdb::Weight::NORMAL),
            FontRole::LatinRegular => (LATIN_FAMILIES, fontdb::Weight::NORMAL),
            FontRole::LatinBold => (LATIN_FAMILIES, fontdb::Weight::BOLD),
        };

        let db = self.database();
        let id = db.query(&fontdb::Query {
            families,
            weight,
            ..fontdb::Query::default()
        })?;
        let name = db
            .face(id)
            .map(|info| info.post_script_name.clone())
            .unwrap_or_default();
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        match OutlineFace::from_bytes(data, index, FaceOrigin::System(name.clone())) {
            Ok(face) => {
                info!(role = ?role, "Using system font {name}");
                Some(face)
            }
            Err(e) => {
                warn!(role = ?role, "System font unusable: {e}");
                None
            }
        }
    }
}
