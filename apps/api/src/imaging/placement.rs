//! Card geometry and vertical placement of the title, separator and contact blocks.
//!
//! All sizes are derived from the canvas dimensions so a 1080×1080 post and a
//! 1200×628 link preview keep the same proportions.
//!
//! Contact blocks stack bottom-up in a fixed order (footer, website, email, phone)
//! from the bottom margin. A field that is absent contributes no height, so the
//! remaining blocks slide down to the margin instead of leaving a gap.

use serde::Serialize;

use crate::imaging::wrap::{wrap_text, WrappedBlock};

// ────────────────────────────────────────────────────────────────────────────
// Proportions
// ────────────────────────────────────────────────────────────────────────────

const PADDING_RATIO: f32 = 0.08;
const TITLE_SIZE_RATIO: f32 = 0.07;
const TITLE_LINE_SPACING: f32 = 1.2;
const TITLE_TOP_RATIO: f32 = 0.35;
const SEPARATOR_GAP_RATIO: f32 = 0.05;
const CONTACT_SIZE_RATIO: f32 = 0.035;
const CONTACT_LINE_SPACING: f32 = 1.4;
const FOOTER_SIZE_SCALE: f32 = 0.9;
const FOOTER_WIDTH_SCALE: f32 = 0.9;
const FOOTER_LINE_SCALE: f32 = 0.8;
/// Height the footer reserves above itself for its first line.
const FOOTER_BLOCK_SCALE: f32 = 1.2;

pub const SEPARATOR_THICKNESS: f32 = 2.0;
pub const SEPARATOR_ALPHA: f32 = 0.5;

/// Pixel geometry of one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardGeometry {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub content_width: f32,
    pub center_x: f32,
    pub title_px: f32,
    pub title_line_height: f32,
    pub title_y: f32,
    pub contact_px: f32,
    pub contact_line_height: f32,
    pub footer_px: f32,
    pub footer_max_width: f32,
    pub footer_line_height: f32,
}

impl CardGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let padding = (w * PADDING_RATIO).floor();
        let content_width = w - 2.0 * padding;
        let title_px = (w * TITLE_SIZE_RATIO).floor();
        let contact_px = (w * CONTACT_SIZE_RATIO).floor();
        let contact_line_height = contact_px * CONTACT_LINE_SPACING;

        Self {
            width: w,
            height: h,
            padding,
            content_width,
            center_x: w / 2.0,
            title_px,
            title_line_height: title_px * TITLE_LINE_SPACING,
            title_y: h * TITLE_TOP_RATIO,
            contact_px,
            contact_line_height,
            footer_px: contact_px * FOOTER_SIZE_SCALE,
            footer_max_width: content_width * FOOTER_WIDTH_SCALE,
            footer_line_height: contact_line_height * FOOTER_LINE_SCALE,
        }
    }

    /// The bottom margin line every contact stack starts from.
    pub fn bottom_margin(&self) -> f32 {
        self.height - self.padding
    }

    /// Separator position below a title ending at `title_next_y`, if it fits.
    ///
    /// Omitted when it would intrude into the lowest three paddings of the card.
    pub fn separator_y(&self, title_next_y: f32) -> Option<f32> {
        let y = title_next_y + (self.height * SEPARATOR_GAP_RATIO).floor();
        if y < self.height - self.padding * 3.0 {
            Some(y)
        } else {
            None
        }
    }

    /// Wraps a title into centred lines starting at `title_y`.
    pub fn title_block<M>(&self, title: &str, measure: M) -> WrappedBlock
    where
        M: Fn(&str) -> f32,
    {
        wrap_text(
            title,
            self.content_width,
            self.title_line_height,
            self.title_y,
            measure,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact stacking
// ────────────────────────────────────────────────────────────────────────────

/// Optional lines printed at the bottom of every card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub footer: Option<String>,
}

impl ContactInfo {
    /// The value of `field`, or `None` when missing or blank.
    pub fn get(&self, field: ContactField) -> Option<&str> {
        let value = match field {
            ContactField::Footer => &self.footer,
            ContactField::Website => &self.website,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Footer,
    Website,
    Email,
    Phone,
}

/// Bottom-up stacking order.
pub const STACK_ORDER: [ContactField; 4] = [
    ContactField::Footer,
    ContactField::Website,
    ContactField::Email,
    ContactField::Phone,
];

/// A contact field after wrapping and vertical placement.
///
/// Line `y` values are bottom anchors (text sits on them).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub field: ContactField,
    pub px: f32,
    pub block: WrappedBlock,
}

#[cfg(test)]
impl PlacedBlock {
    /// Vertical anchor of the first line.
    pub fn anchor(&self) -> f32 {
        self.block.lines.first().map(|l| l.y).unwrap_or(self.block.next_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactStack {
    /// Present blocks, in stacking order (footer first).
    pub blocks: Vec<PlacedBlock>,
    /// Anchor directly above the topmost block; the bottom margin when nothing is present.
    pub top: f32,
}

#[cfg(test)]
impl ContactStack {
    pub fn block(&self, field: ContactField) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.field == field)
    }
}

/// Places every present contact field, compacting toward the bottom margin.
///
/// `measure(text, px)` is the width of `text` in the contact face at `px`.
pub fn stack_contact_blocks<M>(
    contact: &ContactInfo,
    geometry: &CardGeometry,
    measure: M,
) -> ContactStack
where
    M: Fn(&str, f32) -> f32,
{
    let lh = geometry.contact_line_height;
    let mut bottom = geometry.bottom_margin();
    let mut blocks = Vec::new();

    for field in STACK_ORDER {
        let Some(text) = contact.get(field) else {
            continue;
        };

        let (px, max_width, line_height) = match field {
            ContactField::Footer => (
                geometry.footer_px,
                geometry.footer_max_width,
                geometry.footer_line_height,
            ),
            _ => (geometry.contact_px, geometry.content_width, lh),
        };

        let mut block = wrap_text(text, max_width, line_height, 0.0, |s| measure(s, px));
        let extra_lines = block.line_count().saturating_sub(1) as f32;

        // The footer's last line sits one contact line above the margin; the other
        // fields put their last line on the running bottom.
        let (first_y, consumed) = match field {
            ContactField::Footer => (
                bottom - lh - extra_lines * line_height,
                FOOTER_BLOCK_SCALE * lh + extra_lines * line_height,
            ),
            _ => (
                bottom - extra_lines * line_height,
                (extra_lines + 1.0) * line_height,
            ),
        };
        block.translate(first_y);
        bottom -= consumed;

        blocks.push(PlacedBlock { field, px, block });
    }

    ContactStack {
        blocks,
        top: bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn narrow(text: &str, _px: f32) -> f32 {
        text.chars().count() as f32
    }

    fn contact(
        phone: Option<&str>,
        email: Option<&str>,
        website: Option<&str>,
        footer: Option<&str>,
    ) -> ContactInfo {
        ContactInfo {
            phone: phone.map(String::from),
            email: email.map(String::from),
            website: website.map(String::from),
            footer: footer.map(String::from),
        }
    }

    #[test]
    fn test_geometry_for_square_post() {
        let g = CardGeometry::new(1080, 1080);
        assert_eq!(g.padding, 86.0);
        assert_eq!(g.content_width, 908.0);
        assert_eq!(g.title_px, 75.0);
        assert!((g.title_line_height - 90.0).abs() < EPS);
        assert!((g.title_y - 378.0).abs() < EPS);
        assert_eq!(g.contact_px, 37.0);
        assert!((g.contact_line_height - 51.8).abs() < EPS);
        assert_eq!(g.bottom_margin(), 994.0);
    }

    #[test]
    fn test_separator_follows_title() {
        let g = CardGeometry::new(1080, 1080);
        // one-line title at 378 → next_y 468, plus floor(54) gap
        let block = g.title_block("Software Engineer", |_| 100.0);
        assert!((block.next_y - 468.0).abs() < EPS);
        let y = g.separator_y(block.next_y).unwrap();
        assert!((y - 522.0).abs() < EPS);
    }

    #[test]
    fn test_separator_skipped_when_title_runs_low() {
        let g = CardGeometry::new(1080, 1080);
        // bottom-three-paddings limit is 1080 - 258 = 822
        assert_eq!(g.separator_y(800.0), None);
    }

    #[test]
    fn test_no_contact_fields_leaves_stack_at_bottom_margin() {
        let g = CardGeometry::new(1080, 1080);
        let stack = stack_contact_blocks(&ContactInfo::default(), &g, narrow);
        assert!(stack.blocks.is_empty());
        assert_eq!(stack.top, g.bottom_margin());
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(Some("  "), Some(""), None, Some("\t"));
        let stack = stack_contact_blocks(&info, &g, narrow);
        assert!(stack.blocks.is_empty());
        assert_eq!(stack.top, g.bottom_margin());
    }

    #[test]
    fn test_single_field_sits_on_bottom_margin() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(None, None, Some("jobs.example.lk"), None);
        let stack = stack_contact_blocks(&info, &g, narrow);
        let website = stack.block(ContactField::Website).unwrap();
        assert!((website.anchor() - g.bottom_margin()).abs() < EPS);
        assert!((stack.top - (994.0 - 51.8)).abs() < EPS);
    }

    #[test]
    fn test_full_stack_positions() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(
            Some("+94 77 123 4567"),
            Some("hr@example.lk"),
            Some("example.lk"),
            Some("Apply before 30 June"),
        );
        let stack = stack_contact_blocks(&info, &g, narrow);
        let lh = 51.8;

        let footer = stack.block(ContactField::Footer).unwrap();
        let website = stack.block(ContactField::Website).unwrap();
        let email = stack.block(ContactField::Email).unwrap();
        let phone = stack.block(ContactField::Phone).unwrap();

        assert!((footer.anchor() - (994.0 - lh)).abs() < EPS);
        assert!((website.anchor() - (994.0 - 1.2 * lh)).abs() < EPS);
        assert!((email.anchor() - (994.0 - 1.2 * lh - lh)).abs() < EPS);
        assert!((phone.anchor() - (994.0 - 1.2 * lh - 2.0 * lh)).abs() < EPS);
        assert!((stack.top - (994.0 - 1.2 * lh - 3.0 * lh)).abs() < EPS);
        assert!((footer.px - 33.3).abs() < EPS);
    }

    #[test]
    fn test_missing_middle_field_closes_gap() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(Some("+94 77 123 4567"), None, Some("example.lk"), None);
        let stack = stack_contact_blocks(&info, &g, narrow);
        let phone = stack.block(ContactField::Phone).unwrap();
        // phone directly above website, no email-sized hole
        assert!((phone.anchor() - (994.0 - 51.8)).abs() < EPS);
    }

    /// Each char is 20 px wide, so 45 chars fit on a 908 px line.
    fn wide(text: &str, _px: f32) -> f32 {
        text.chars().count() as f32 * 20.0
    }

    #[test]
    fn test_overlong_single_word_field_stays_one_line() {
        let g = CardGeometry::new(1080, 1080);
        let url = "careers.example.lk/openings/software-engineering/colombo-2024";
        let info = contact(None, None, Some(url), None);
        let stack = stack_contact_blocks(&info, &g, wide);
        let website = stack.block(ContactField::Website).unwrap();
        assert_eq!(website.block.line_count(), 1);
        assert!((website.anchor() - 994.0).abs() < EPS);
    }

    #[test]
    fn test_wrapped_field_pushes_fields_above_it_up() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(
            Some("+94 77 123 4567"),
            None,
            Some("visit us at careers example lk for the full list of openings"),
            None,
        );
        let stack = stack_contact_blocks(&info, &g, wide);
        let website = stack.block(ContactField::Website).unwrap();
        let phone = stack.block(ContactField::Phone).unwrap();
        assert_eq!(website.block.line_count(), 2);
        // last website line on the margin, phone above both lines
        assert!((website.block.lines[1].y - 994.0).abs() < EPS);
        assert!((phone.anchor() - (994.0 - 2.0 * 51.8)).abs() < EPS);
    }

    #[test]
    fn test_wrapped_footer_grows_upward() {
        let g = CardGeometry::new(1080, 1080);
        // footer max width is 817.2 px → 40 chars per line
        let footer = "Walk-in interviews every Monday at our head office in Colombo seven";
        let info = contact(None, None, None, Some(footer));
        let stack = stack_contact_blocks(&info, &g, wide);
        let block = stack.block(ContactField::Footer).unwrap();
        assert_eq!(block.block.line_count(), 2);
        let lh = 51.8;
        let footer_lh = lh * 0.8;
        // last footer line keeps its single-line position
        assert!((block.block.lines[1].y - (994.0 - lh)).abs() < EPS);
        assert!((stack.top - (994.0 - 1.2 * lh - footer_lh)).abs() < EPS);
    }

    #[test]
    fn test_stack_order_is_footer_first() {
        let g = CardGeometry::new(1080, 1080);
        let info = contact(Some("p"), Some("e"), Some("w"), Some("f"));
        let stack = stack_contact_blocks(&info, &g, narrow);
        let order: Vec<ContactField> = stack.blocks.iter().map(|b| b.field).collect();
        assert_eq!(order, STACK_ORDER.to_vec());
    }
}
