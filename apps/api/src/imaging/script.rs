//! Script classification for title text.

use serde::{Deserialize, Serialize};

/// Sinhala Unicode block.
const SINHALA_RANGE: std::ops::RangeInclusive<char> = '\u{0D80}'..='\u{0DFF}';

/// Which font family a title needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    /// At least one code point in U+0D80–U+0DFF.
    Sinhala,
    Latin,
}

/// Classifies text as Sinhala if any character falls in the Sinhala block.
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(|c| SINHALA_RANGE.contains(&c)) {
        Script::Sinhala
    } else {
        Script::Latin
    }
}
