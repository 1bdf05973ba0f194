//! CSV export and import
//!
//! # Format
//!
//! ```csv
//! id,sub_id,text
//! language,,US
//! EV0_01_MAIN_0001,,Hello<br>there
//! EV0_01_MAIN_0001,ACTOR,Cloud
//! ```
//!
//! One row per entry with an empty `sub_id`, followed by one row per
//! sub-entry. Line breaks inside texts are written as `<br>` so every record
//! stays on one line in spreadsheet applications.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::formats::text::{LINE_BREAK, Uexp};

const HEADER: [&str; 3] = ["id", "sub_id", "text"];
const LANGUAGE_ROW: &str = "language";
const BR_TOKEN: &str = "<br>";

/// Write `uexp` as CSV.
///
/// # Errors
/// Returns an error if writing fails.
pub fn export_csv<W: Write>(uexp: &Uexp, mut writer: W) -> Result<()> {
    write_record(&mut writer, &HEADER)?;
    write_record(&mut writer, &[LANGUAGE_ROW, "", uexp.language.code()])?;
    for entry in &uexp.entries {
        write_record(&mut writer, &[&entry.id, "", &to_csv_text(&entry.text)])?;
        for sub in &entry.sub_entries {
            write_record(&mut writer, &[&entry.id, &sub.id, &to_csv_text(&sub.text)])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Apply CSV rows onto `uexp`.
///
/// Rows are matched to entries by id. Rows may be a subset of the entries
/// and need only keep the original order to resolve quickly.
///
/// # Errors
/// Returns [`Error::InvalidCsv`] for malformed rows, and
/// [`Error::UnknownLanguage`], [`Error::UnknownEntry`] or
/// [`Error::UnknownSubEntry`] for values the payload cannot take.
pub fn import_csv<R: Read>(uexp: &mut Uexp, mut reader: R) -> Result<()> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;

    let mut last_index = 0;
    for record in parse_records(&data)? {
        let [id, sub_id, text] = <[String; 3]>::try_from(record.fields).map_err(|fields| {
            Error::InvalidCsv {
                line: record.line,
                message: format!("each row should have 3 fields, found {}", fields.len()),
            }
        })?;

        if id == HEADER[0] {
            continue;
        }
        if id == LANGUAGE_ROW {
            uexp.language = text.parse()?;
            continue;
        }

        let index = uexp
            .find_entry(&id, last_index)
            .ok_or_else(|| Error::UnknownEntry(id.clone()))?;
        last_index = index;

        let text = from_csv_text(&text);
        let entry = &mut uexp.entries[index];
        if sub_id.is_empty() {
            entry.text = text;
        } else {
            entry.set_sub_text(&sub_id, &text)?;
        }
    }
    Ok(())
}

fn to_csv_text(text: &str) -> String {
    text.replace(LINE_BREAK, BR_TOKEN)
}

fn from_csv_text(text: &str) -> String {
    text.replace(BR_TOKEN, LINE_BREAK)
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")?;
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n']) || field.starts_with([' ', '\t'])
}

fn escape_field(field: &str) -> String {
    if needs_quotes(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One parsed CSV record with the line it starts on.
#[derive(Debug, PartialEq, Eq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Split CSV text into records.
///
/// Quoted fields may span lines and use `""` for a literal quote. A CR-LF
/// pair ends a record like a bare LF does, and blank lines are skipped.
fn parse_records(data: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut chars = data.chars().peekable();
    let mut line = 1;

    while chars.peek().is_some() {
        let start_line = line;
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut field_started = false;

        loop {
            let Some(c) = chars.next() else {
                if quoted {
                    return Err(Error::InvalidCsv {
                        line: start_line,
                        message: "unterminated quoted field".to_string(),
                    });
                }
                break;
            };

            if quoted {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    '\n' => {
                        line += 1;
                        field.push('\n');
                    }
                    _ => field.push(c),
                }
                continue;
            }

            match c {
                '"' if !field_started => {
                    quoted = true;
                    field_started = true;
                }
                ',' => {
                    fields.push(std::mem::take(&mut field));
                    field_started = false;
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    line += 1;
                    break;
                }
                _ => {
                    field.push(c);
                    field_started = true;
                }
            }
        }

        if fields.is_empty() && field.is_empty() && !field_started {
            continue;
        }
        fields.push(field);
        records.push(Record {
            line: start_line,
            fields,
        });
    }
    Ok(records)
}
