//! Greedy word-atomic line wrapping.
//!
//! Same shape as a typesetter's first-fit pass: keep appending words until the
//! measured line would exceed the width, then break. A word is never split, so a
//! single word wider than `max_width` gets a line of its own.

use serde::Serialize;

/// One laid-out line. `y` is the line's vertical anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    pub text: String,
    pub width: f32,
    pub y: f32,
}

/// Output of [`wrap_text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedBlock {
    pub lines: Vec<LayoutLine>,
    /// Vertical position immediately below the last line.
    pub next_y: f32,
}

impl WrappedBlock {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Shifts every line (and `next_y`) by `dy`.
    pub fn translate(&mut self, dy: f32) {
        for line in &mut self.lines {
            line.y += dy;
        }
        self.next_y += dy;
    }
}

/// Whitespace a line may break at. No-break spaces keep their neighbours together.
fn is_break(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}

/// Wraps `text` into lines no wider than `max_width` under `measure`.
///
/// The first line sits at `start_y`; each further line is `line_height` lower.
/// Text without words produces no lines and `next_y == start_y`.
pub fn wrap_text<M>(
    text: &str,
    max_width: f32,
    line_height: f32,
    start_y: f32,
    measure: M,
) -> WrappedBlock
where
    M: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    let mut y = start_y;

    for word in text.split(is_break).filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let candidate_width = measure(&candidate);

        if candidate_width > max_width && !current.is_empty() {
            lines.push(LayoutLine {
                text: std::mem::take(&mut current),
                width: current_width,
                y,
            });
            y += line_height;
            current_width = measure(word);
            current = word.to_string();
        } else {
            current = candidate;
            current_width = candidate_width;
        }
    }

    if current.is_empty() {
        return WrappedBlock {
            lines,
            next_y: start_y,
        };
    }

    lines.push(LayoutLine {
        text: current,
        width: current_width,
        y,
    });

    WrappedBlock {
        lines,
        next_y: y + line_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One unit per character, spaces included.
    fn chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    fn texts(block: &WrappedBlock) -> Vec<&str> {
        block.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_short_text_is_single_line() {
        let block = wrap_text("Software Engineer", 100.0, 10.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Software Engineer"]);
        assert_eq!(block.next_y, 10.0);
    }

    #[test]
    fn test_breaks_when_next_word_overflows() {
        // "aaa bbb" = 7 fits exactly, "aaa bbb ccc" = 11 does not
        let block = wrap_text("aaa bbb ccc", 7.0, 10.0, 100.0, chars);
        assert_eq!(texts(&block), vec!["aaa bbb", "ccc"]);
        assert_eq!(block.lines[0].y, 100.0);
        assert_eq!(block.lines[1].y, 110.0);
        assert_eq!(block.next_y, 120.0);
    }

    #[test]
    fn test_long_word_is_never_split() {
        let block = wrap_text("a supercalifragilistic b", 5.0, 1.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["a", "supercalifragilistic", "b"]);
        assert!(block.lines[1].width > 5.0);
    }

    #[test]
    fn test_single_overlong_word_is_one_line() {
        let block = wrap_text("Administrator", 3.0, 2.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Administrator"]);
        assert_eq!(block.next_y, 2.0);
    }

    #[test]
    fn test_multi_word_lines_never_exceed_max_width() {
        let text = "Senior Backend Engineer for distributed payment infrastructure in Colombo";
        let max = 20.0;
        let block = wrap_text(text, max, 1.0, 0.0, chars);
        for line in &block.lines {
            if line.text.contains(' ') {
                assert!(line.width <= max, "{:?} is {} wide", line.text, line.width);
            }
        }
        // Every word survives, in order.
        let rejoined = texts(&block).join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_line_widths_match_measure() {
        let block = wrap_text("aa bb cc dd", 5.0, 1.0, 0.0, chars);
        for line in &block.lines {
            assert_eq!(line.width, chars(&line.text));
        }
    }

    #[test]
    fn test_collapses_repeated_whitespace() {
        let block = wrap_text("  Data   Analyst  ", 100.0, 1.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Data Analyst"]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let block = wrap_text("   ", 10.0, 5.0, 42.0, chars);
        assert_eq!(block.line_count(), 0);
        assert_eq!(block.next_y, 42.0);
    }

    #[test]
    fn test_translate_moves_lines_and_cursor() {
        let mut block = wrap_text("aaa bbb ccc", 7.0, 10.0, 0.0, chars);
        block.translate(-5.0);
        assert_eq!(block.lines[0].y, -5.0);
        assert_eq!(block.lines[1].y, 5.0);
        assert_eq!(block.next_y, 15.0);
    }

    #[test]
    fn test_no_break_space_keeps_words_together() {
        let block = wrap_text("Driver\u{00A0}Colombo Kandy", 14.0, 10.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Driver\u{00A0}Colombo", "Kandy"]);
    }

    #[test]
    fn test_newlines_and_tabs_are_break_opportunities() {
        let block = wrap_text("Cook\nWaiter\tCleaner", 8.0, 10.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Cook", "Waiter", "Cleaner"]);
    }

    #[test]
    fn test_runs_of_spaces_collapse_to_one() {
        let block = wrap_text("Night   Guard", 100.0, 10.0, 0.0, chars);
        assert_eq!(texts(&block), vec!["Night Guard"]);
    }
}
