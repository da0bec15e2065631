//! Price-list spreadsheet decoding
//!
//! The price list is a single-sheet Excel workbook with a title block above
//! the column-label row. Only the first sheet is read; the header row is
//! located by scanning for the product-number label.

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

use super::models::RawRow;

/// How many leading rows to scan for the header row
const HEADER_SCAN_ROWS: usize = 10;

/// Column label that anchors the header row
const HEADER_ANCHOR: &str = "Numero";

/// Decode raw spreadsheet bytes into one [`RawRow`] per product line
pub fn decode_price_list(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).context("Failed to open price-list workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Price-list workbook has no sheets")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;

    debug!(sheet = %sheet_name, rows = range.height(), "Read price-list sheet");

    rows_from_range(&range)
}

/// Convert a cell range into labeled rows.
///
/// Cells in columns without a header label are dropped, as are empty cells,
/// so absent fields simply have no key in the resulting row.
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<RawRow>> {
    let mut header: Option<(usize, Vec<String>)> = None;

    for (index, row) in range.rows().enumerate().take(HEADER_SCAN_ROWS) {
        if row.iter().any(|cell| cell_text(cell) == HEADER_ANCHOR) {
            header = Some((index, row.iter().map(cell_text).collect()));
            break;
        }
    }

    let (header_index, labels) = header.with_context(|| {
        format!(
            "Header row with '{}' column not found in first {} rows",
            HEADER_ANCHOR, HEADER_SCAN_ROWS
        )
    })?;

    let mut rows = Vec::new();
    for row in range.rows().skip(header_index + 1) {
        let mut raw = RawRow::new();
        for (label, cell) in labels.iter().zip(row.iter()) {
            if label.is_empty() {
                continue;
            }
            let value = cell_text(cell);
            if value.is_empty() {
                continue;
            }
            raw.insert(label.clone(), value);
        }
        if !raw.is_empty() {
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Cell content as trimmed text. Whole-valued floats print without the
/// fraction so product numbers survive Excel's numeric cells.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        },
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sheet shaped like the real price list: a title row, a blank row, the
    /// header row, then data.
    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (4, 3));
        range.set_value((0, 0), Data::String("Alkon hinnasto".to_string()));

        range.set_value((2, 0), Data::String("Numero".to_string()));
        range.set_value((2, 1), Data::String("Nimi".to_string()));
        range.set_value((2, 2), Data::String("Hinta".to_string()));
        range.set_value((2, 3), Data::String("Tyyppi".to_string()));

        range.set_value((3, 0), Data::Float(906458.0));
        range.set_value((3, 1), Data::String("Koskenkorva Viina".to_string()));
        range.set_value((3, 2), Data::Float(13.99));
        range.set_value((3, 3), Data::String("Vodkat ja viinat".to_string()));

        range.set_value((4, 0), Data::Float(101.0));
        range.set_value((4, 1), Data::String("Talon Olut".to_string()));
        range.set_value((4, 3), Data::String("Oluet".to_string()));

        range
    }

    #[test]
    fn test_rows_from_range_skips_title_block() {
        let rows = rows_from_range(&sample_range()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].get("Numero").unwrap(), "906458");
        assert_eq!(rows[0].get("Nimi").unwrap(), "Koskenkorva Viina");
        assert_eq!(rows[0].get("Hinta").unwrap(), "13.99");
        assert_eq!(rows[0].get("Tyyppi").unwrap(), "Vodkat ja viinat");
    }

    #[test]
    fn test_missing_cells_have_no_key() {
        let rows = rows_from_range(&sample_range()).unwrap();
        assert_eq!(rows[1].get("Numero").unwrap(), "101");
        assert!(rows[1].get("Hinta").is_none());
    }

    #[test]
    fn test_missing_header_row_is_an_error() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Jotain muuta".to_string()));
        range.set_value((1, 0), Data::Float(1.0));

        assert!(rows_from_range(&range).is_err());
    }

    #[test]
    fn test_cell_text_formats() {
        assert_eq!(cell_text(&Data::Float(906458.0)), "906458");
        assert_eq!(cell_text(&Data::Float(13.99)), "13.99");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::String("  olut  ".to_string())), "olut");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
