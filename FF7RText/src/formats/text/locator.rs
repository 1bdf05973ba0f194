//! Entry lookup by id
//!
//! Entries in a payload are sorted by id. Edited data and the second
//! language of a dual subtitle list the same ids in the same order, so the
//! index of the previous match is almost always the answer for the next
//! one. The search starts from that hint and halves the distance towards
//! whichever bound it just tightened, which makes aligned lookups O(1) and
//! everything else logarithmic.

use std::cmp::Ordering;

use super::Entry;

/// Find `key` in `entries` (sorted ascending by id), probing `hint` first.
///
/// A hint past the end is clamped to the last entry. Returns `None` when the
/// key is absent; never returns the index of a different id.
#[must_use]
pub fn find_entry(entries: &[Entry], key: &str, hint: usize) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }
    let mut id = hint.min(entries.len() - 1);
    let mut min_id = 0;
    let mut max_id = entries.len();

    while id >= min_id && id < max_id {
        match key.cmp(entries[id].id.as_str()) {
            Ordering::Equal => return Some(id),
            Ordering::Less => {
                if id <= min_id {
                    return None;
                }
                max_id = id;
                id -= ((id - min_id) / 2).max(1);
            }
            Ordering::Greater => {
                if id + 1 >= max_id {
                    return None;
                }
                min_id = id;
                id += ((max_id - id) / 2).max(1);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(ids: &[&str]) -> Vec<Entry> {
        ids.iter().map(|id| Entry::new(*id, "")).collect()
    }

    #[test]
    fn test_every_key_from_every_hint() {
        let ids: Vec<String> = (0..37).map(|i| format!("TXT_{:04}", i * 3)).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let entries = entries(&refs);

        for (expected, key) in refs.iter().enumerate() {
            for hint in 0..entries.len() {
                assert_eq!(find_entry(&entries, key, hint), Some(expected), "{key} from {hint}");
            }
        }
    }

    #[test]
    fn test_absent_keys_from_every_hint() {
        let entries = entries(&["B", "D", "F", "H", "J", "L", "N"]);
        for key in ["A", "C", "E", "G", "I", "K", "M", "O", "Z", ""] {
            for hint in 0..entries.len() {
                assert_eq!(find_entry(&entries, key, hint), None, "{key} from {hint}");
            }
        }
    }

    #[test]
    fn test_hint_is_clamped() {
        let entries = entries(&["A", "B", "C"]);
        assert_eq!(find_entry(&entries, "A", 100), Some(0));
        assert_eq!(find_entry(&entries, "C", 3), Some(2));
    }

    #[test]
    fn test_empty() {
        assert_eq!(find_entry(&[], "A", 0), None);
    }

    #[test]
    fn test_single() {
        let entries = entries(&["M"]);
        assert_eq!(find_entry(&entries, "M", 0), Some(0));
        assert_eq!(find_entry(&entries, "A", 0), None);
        assert_eq!(find_entry(&entries, "Z", 0), None);
    }
}
