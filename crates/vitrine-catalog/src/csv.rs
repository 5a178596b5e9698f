//! CSV decoding for published spreadsheets, plus encoding for exports.
//!
//! Follows conventional quoting: quoted cells may carry commas and newlines,
//! and `""` inside a quoted cell is a literal quote. Nothing here ever fails;
//! degenerate input simply yields fewer rows.

use crate::error::CatalogError;

/// One data row keyed by header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    #[must_use]
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive lookup; the first matching header wins.
    #[must_use]
    pub fn get_ignore_case(&self, header: &str) -> Option<&str> {
        let wanted = header.trim().to_lowercase();
        self.fields
            .iter()
            .find(|(h, _)| h.trim().to_lowercase() == wanted)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Splits `text` into rows of cells.
///
/// Line endings are normalized to `\n` first. Unquoted cells are trimmed;
/// quoted cells keep their content verbatim. Blank lines produce no row and
/// the last row is flushed even without a trailing newline.
#[must_use]
pub fn decode_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }

        match c {
            '"' if !quoted && cell.trim().is_empty() => {
                cell.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                row.push(finish_cell(&mut cell, quoted));
                quoted = false;
            }
            '\n' => {
                if row.is_empty() && !quoted && cell.trim().is_empty() {
                    cell.clear();
                    continue;
                }
                row.push(finish_cell(&mut cell, quoted));
                quoted = false;
                rows.push(std::mem::take(&mut row));
            }
            // Whitespace between a closing quote and the delimiter is noise.
            c if quoted && c.is_whitespace() => {}
            c => cell.push(c),
        }
    }

    if quoted || !row.is_empty() || !cell.trim().is_empty() {
        row.push(finish_cell(&mut cell, quoted));
        rows.push(row);
    }

    rows
}

fn finish_cell(cell: &mut String, quoted: bool) -> String {
    let value = std::mem::take(cell);
    if quoted {
        value
    } else {
        value.trim().to_string()
    }
}

/// Decodes `text` into header-keyed records.
///
/// The first row is the header. Rows shorter than the header are dropped;
/// longer rows keep only the first `header.len()` values.
#[must_use]
pub fn decode_records(text: &str) -> Vec<RawRecord> {
    let mut rows = decode_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

    rows.enumerate()
        .filter_map(|(idx, row)| {
            if row.len() < header.len() {
                tracing::debug!(
                    row = idx + 2,
                    fields = row.len(),
                    expected = header.len(),
                    "dropping short CSV row"
                );
                return None;
            }
            let fields = header.iter().cloned().zip(row).collect();
            Some(RawRecord::new(fields))
        })
        .collect()
}

/// Encodes rows as `\n`-terminated CSV with every cell quoted.
///
/// [`decode_rows`] keeps quoted cells verbatim, so edge whitespace and
/// rows holding a single empty cell come back unchanged.
///
/// # Errors
///
/// Returns [`CatalogError::Encode`] if the writer fails to flush.
pub fn encode_rows(rows: &[Vec<String>]) -> Result<String, CatalogError> {
    let mut writer = ::csv::WriterBuilder::new()
        .quote_style(::csv::QuoteStyle::Always)
        .terminator(::csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(::csv::Error::from)?;
    Ok(String::from_utf8_lossy(writer.get_ref()).into_owned())
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;
