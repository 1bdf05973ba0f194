//! JSON export and import

use std::io::{Read, Write};

use serde::Deserialize;

use crate::error::Result;
use crate::formats::text::{Entry, Uexp};

/// Payload as it appears in edited JSON. The language stays a plain string
/// so an unknown code is reported as such rather than as a parse error.
#[derive(Debug, Deserialize)]
struct JsonUexp {
    language: String,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// Write `uexp` as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn export_json<W: Write>(uexp: &Uexp, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, uexp)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse edited JSON into a standalone payload model.
///
/// # Errors
/// Returns [`Error::JsonError`] for malformed JSON and
/// [`Error::UnknownLanguage`] for an unsupported code.
///
/// [`Error::JsonError`]: crate::Error::JsonError
/// [`Error::UnknownLanguage`]: crate::Error::UnknownLanguage
pub fn parse_json<R: Read>(reader: R) -> Result<Uexp> {
    let parsed: JsonUexp = serde_json::from_reader(reader)?;
    let mut uexp = Uexp::new(parsed.language.parse()?);
    uexp.entries = parsed.entries;
    Ok(uexp)
}

/// Apply edited JSON onto `uexp`.
///
/// # Errors
/// Returns a parse error, or [`Error::UnknownEntry`] /
/// [`Error::UnknownSubEntry`] for ids the payload does not have.
///
/// [`Error::UnknownEntry`]: crate::Error::UnknownEntry
/// [`Error::UnknownSubEntry`]: crate::Error::UnknownSubEntry
pub fn import_json<R: Read>(uexp: &mut Uexp, reader: R) -> Result<()> {
    let new = parse_json(reader)?;
    uexp.update_with(&new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::text::{Language, SubEntry};
    use pretty_assertions::assert_eq;

    fn sample() -> Uexp {
        let mut uexp = Uexp::new(Language::Jp);
        let mut entry = Entry::new("EV0_01_MAIN_0001", "<b>こんにちは</b>\r\n");
        entry.sub_entries.push(SubEntry {
            name_id: 5,
            id: "ACTOR".to_string(),
            text: "クラウド".to_string(),
        });
        uexp.entries.push(entry);
        uexp.entries.push(Entry::new("EV0_01_MAIN_0002", ""));
        uexp
    }

    #[test]
    fn test_export_layout() {
        let mut out = Vec::new();
        export_json(&sample(), &mut out).unwrap();
        let json = String::from_utf8(out).unwrap();

        let expected = r#"{
  "language": "JP",
  "entries": [
    {
      "id": "EV0_01_MAIN_0001",
      "text": "<b>こんにちは</b>\r\n",
      "sub_entries": [
        {
          "id": "ACTOR",
          "text": "クラウド"
        }
      ]
    },
    {
      "id": "EV0_01_MAIN_0002",
      "text": ""
    }
  ]
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_import_updates_texts() {
        let mut uexp = sample();
        let json = r#"{
            "language": "US",
            "entries": [
                { "id": "EV0_01_MAIN_0001", "text": "Hello",
                  "sub_entries": [ { "id": "ACTOR", "text": "Cloud" } ] }
            ]
        }"#;
        import_json(&mut uexp, json.as_bytes()).unwrap();

        assert_eq!(uexp.language, Language::Us);
        assert_eq!(uexp.entries[0].text, "Hello");
        assert_eq!(uexp.entries[0].sub_entries[0].text, "Cloud");
        assert_eq!(uexp.entries[0].sub_entries[0].name_id, 5);
    }

    #[test]
    fn test_unknown_language() {
        let mut uexp = sample();
        assert!(matches!(
            import_json(&mut uexp, r#"{ "language": "EN" }"#.as_bytes()),
            Err(Error::UnknownLanguage(code)) if code == "EN"
        ));
    }

    #[test]
    fn test_malformed() {
        let mut uexp = sample();
        assert!(matches!(
            import_json(&mut uexp, "{".as_bytes()),
            Err(Error::JsonError(_))
        ));
    }
}
