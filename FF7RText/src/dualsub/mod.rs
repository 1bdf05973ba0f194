//! Dual subtitles
//!
//! Merges the voiced lines of a second language into a first one, so the
//! game shows both texts in one subtitle box. Multi-line texts are reflowed
//! first to make room.

mod reflow;

pub use reflow::{MAX_LINE_WIDTH, reflow, reflow_text, separator};

use tracing::debug;

use crate::error::{Error, Result};
use crate::formats::text::{LINE_BREAK, Uexp, find_entry};

/// Lines one subtitle box can show.
pub const MAX_MERGED_LINES: usize = 6;

/// Append the subtitle texts of `secondary` to the matching entries of
/// `primary`.
///
/// Entries are paired by id, using each secondary entry's index as the
/// lookup hint. A pair is merged when either side is a subtitle line and
/// neither text is just its own id. Returns the number of merged entries;
/// zero means there was nothing to do.
///
/// `primary` is only changed when every pair merged.
///
/// # Errors
/// Returns [`Error::LineOverflow`] when a merged text would need more than
/// [`MAX_MERGED_LINES`] lines after reflow.
pub fn merge(primary: &mut Uexp, secondary: &Uexp) -> Result<usize> {
    let primary_width = primary.language.char_width();
    let secondary_width = secondary.language.char_width();

    let mut entries = primary.entries.clone();
    let mut count = 0;
    for (hint, other) in secondary.entries.iter().enumerate() {
        let Some(index) = find_entry(&entries, &other.id, hint) else {
            continue;
        };
        let entry = &mut entries[index];
        if !other.is_subtitle() && !entry.is_subtitle() {
            continue;
        }

        // Some entries hold their own id as text; those stay untouched.
        if entry.id == entry.text || other.id == other.text {
            continue;
        }

        let mut other = other.clone();
        if entry.count_lines() > 1 || other.count_lines() > 1 {
            reflow(entry, primary_width);
            reflow(&mut other, secondary_width);
            let (primary_lines, secondary_lines) = (entry.count_lines(), other.count_lines());
            if primary_lines + secondary_lines > MAX_MERGED_LINES {
                return Err(Error::LineOverflow {
                    id: entry.id.clone(),
                    primary_lines,
                    secondary_lines,
                });
            }
        }

        entry.append_text(&other, LINE_BREAK);
        count += 1;
    }
    primary.entries = entries;

    debug!(
        "Merged {count} {} entries into {}",
        secondary.language, primary.language
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::text::{Entry, Language, SubEntry};
    use pretty_assertions::assert_eq;

    fn actor(id: &str, text: &str) -> Entry {
        let mut entry = Entry::new(id, text);
        entry.sub_entries.push(SubEntry {
            name_id: 1,
            id: "ACTOR".to_string(),
            text: "Bob".to_string(),
        });
        entry
    }

    fn uexp(language: Language, entries: Vec<Entry>) -> Uexp {
        let mut uexp = Uexp::new(language);
        uexp.entries = entries;
        uexp
    }

    fn lines(count: usize, fill: char) -> String {
        vec![fill.to_string().repeat(40); count].join(LINE_BREAK)
    }

    #[test]
    fn test_merge_single_lines() {
        let mut primary = uexp(Language::Us, vec![actor("X01", "Hello")]);
        let secondary = uexp(Language::Fr, vec![Entry::new("X01", "Bonjour")]);

        assert_eq!(merge(&mut primary, &secondary).unwrap(), 1);
        assert_eq!(primary.entries[0].text, "Hello\r\nBonjour");
        assert_eq!(primary.entries[0].sub_entries.len(), 1);
    }

    #[test]
    fn test_merge_line_budget() {
        let mut primary = uexp(Language::Us, vec![actor("X01", &lines(4, 'a'))]);
        let secondary = uexp(Language::Fr, vec![actor("X01", &lines(2, 'b'))]);
        assert_eq!(merge(&mut primary, &secondary).unwrap(), 1);
        assert_eq!(primary.entries[0].count_lines(), 6);

        let mut primary = uexp(Language::Us, vec![actor("X01", &lines(4, 'a'))]);
        let secondary = uexp(Language::Fr, vec![actor("X01", &lines(3, 'b'))]);
        assert!(matches!(
            merge(&mut primary, &secondary),
            Err(Error::LineOverflow { primary_lines: 4, secondary_lines: 3, .. })
        ));
    }

    #[test]
    fn test_overflow_leaves_primary_untouched() {
        let mut primary = uexp(
            Language::Us,
            vec![
                actor("X01", "Hello"),
                actor("X02", &lines(4, 'a')),
            ],
        );
        let secondary = uexp(
            Language::Fr,
            vec![actor("X01", "Bonjour"), actor("X02", &lines(3, 'b'))],
        );
        let before = primary.clone();

        assert!(merge(&mut primary, &secondary).is_err());
        assert_eq!(primary, before);
    }

    #[test]
    fn test_hint_past_primary_end() {
        let mut primary = uexp(Language::Us, vec![actor("Z01", "Hello")]);
        let secondary = uexp(
            Language::Fr,
            vec![Entry::new("A01", "Salut"), Entry::new("Z01", "Bonjour")],
        );

        assert_eq!(merge(&mut primary, &secondary).unwrap(), 1);
        assert_eq!(primary.entries[0].text, "Hello\r\nBonjour");
    }

    #[test]
    fn test_merge_reflows_short_lines() {
        let mut primary = uexp(Language::Jp, vec![actor("X01", "こんにちは\r\n世界")]);
        let secondary = uexp(Language::Us, vec![actor("X01", "Hello\r\nworld")]);

        merge(&mut primary, &secondary).unwrap();
        assert_eq!(primary.entries[0].text, "こんにちは\u{3000}世界\r\nHello world");
    }

    #[test]
    fn test_skips_placeholders_and_non_subtitles() {
        let mut primary = uexp(
            Language::Us,
            vec![
                actor("X01", "X01"),
                Entry::new("X02", "Menu"),
                actor("X03", "Hi"),
            ],
        );
        let secondary = uexp(
            Language::Fr,
            vec![
                Entry::new("X01", "Salut"),
                Entry::new("X02", "Menu FR"),
                Entry::new("X04", "Absent"),
            ],
        );

        assert_eq!(merge(&mut primary, &secondary).unwrap(), 0);
        assert_eq!(primary.entries[0].text, "X01");
        assert_eq!(primary.entries[1].text, "Menu");
        assert_eq!(primary.entries[2].text, "Hi");
    }

    #[test]
    fn test_empty_primary_takes_secondary() {
        let mut primary = uexp(Language::Us, vec![actor("X01", "")]);
        let secondary = uexp(Language::Fr, vec![Entry::new("X01", "Bonjour")]);
        assert_eq!(merge(&mut primary, &secondary).unwrap(), 1);
        assert_eq!(primary.entries[0].text, "Bonjour");
    }
}
