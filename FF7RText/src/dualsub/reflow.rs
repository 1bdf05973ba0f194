//! Subtitle line reflow

use crate::formats::text::{Entry, LINE_BREAK};

/// Packed lines must stay below this width, in half-width character cells.
pub const MAX_LINE_WIDTH: usize = 68;

/// Join separator for a language with the given character width.
#[must_use]
pub fn separator(char_width: usize) -> &'static str {
    if char_width == 2 { "\u{3000}" } else { " " }
}

/// Greedily pack CR-LF separated lines into lines narrower than
/// [`MAX_LINE_WIDTH`].
///
/// Each character counts `char_width` cells and so does the separator
/// inserted between two packed lines. A single line that is already too
/// wide is kept as is. Empty lines are dropped.
#[must_use]
pub fn reflow_text(text: &str, char_width: usize) -> String {
    let sep = separator(char_width);
    let mut packed: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut width = 0;

    for line in text.split(LINE_BREAK) {
        let line_width = line.chars().count() * char_width;
        let mut new_width = width + line_width;
        if !current.is_empty() {
            new_width += char_width;
        }

        if new_width < MAX_LINE_WIDTH {
            if !current.is_empty() {
                current.push_str(sep);
            }
            current.push_str(line);
            width = new_width;
        } else {
            if !current.is_empty() {
                packed.push(std::mem::take(&mut current));
            }
            current.push_str(line);
            width = line_width;
        }
    }
    if !current.is_empty() {
        packed.push(current);
    }
    packed.join(LINE_BREAK)
}

/// Reflow an entry's text in place.
pub fn reflow(entry: &mut Entry, char_width: usize) {
    entry.text = reflow_text(&entry.text, char_width);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(line: &str, char_width: usize) -> usize {
        line.chars().count() * char_width
    }

    #[test]
    fn test_packs_short_lines() {
        assert_eq!(reflow_text("Hello\r\nworld", 1), "Hello world");
        assert_eq!(reflow_text("こんにちは\r\n世界", 2), "こんにちは\u{3000}世界");
    }

    #[test]
    fn test_keeps_long_lines_apart() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let text = format!("{a}\r\n{b}");
        assert_eq!(reflow_text(&text, 1), text);
    }

    #[test]
    fn test_line_after_flush_counts_its_width() {
        let long = "l".repeat(65);
        let middle = "m".repeat(40);
        let last = "t".repeat(30);
        let text = [long.as_str(), middle.as_str(), last.as_str()].join(LINE_BREAK);
        assert_eq!(reflow_text(&text, 1), text);

        let text = format!("{long}\r\n{}\r\nx", "s".repeat(10));
        assert_eq!(
            reflow_text(&text, 1),
            format!("{long}\r\n{} x", "s".repeat(10))
        );
    }

    #[test]
    fn test_drops_empty_lines() {
        assert_eq!(reflow_text("", 1), "");
        assert_eq!(reflow_text("\r\nHi", 1), "Hi");
    }

    #[test]
    fn test_width_bound_and_idempotence() {
        for char_width in [1, 2] {
            let lines: Vec<String> = (0..24)
                .map(|i| "w".repeat(1 + (i * 7) % 29))
                .collect();
            let text = lines.join(LINE_BREAK);
            let once = reflow_text(&text, char_width);

            for line in once.split(LINE_BREAK) {
                if line.contains(separator(char_width)) {
                    assert!(width(line, char_width) < MAX_LINE_WIDTH, "{line}");
                }
            }
            assert_eq!(reflow_text(&once, char_width), once);
        }
    }
}
