//! Delimited-text catalog loader
//!
//! Reads the comma-separated catalog export. Quoted fields may contain
//! commas, line breaks and doubled quotes (`""`). Rows end at LF, CR or
//! CRLF outside of quotes. The first row names the columns.

use serde_json::{Map, Value};
use soundscape_core::CatalogRow;

use crate::error::{CatalogError, Result};

/// Split delimited text into rows of cells.
pub fn parse_delimited(text: &str) -> Vec<Vec<String>> {
    parse_records(text).into_iter().map(|(_, row)| row).collect()
}

/// Split delimited text into rows, each with the physical line it starts on.
fn parse_records(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut records = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => row.push(std::mem::take(&mut cell)),
            '\r' | '\n' if !quoted => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                row.push(std::mem::take(&mut cell));
                records.push((start, std::mem::take(&mut row)));
                start = line;
            }
            '\r' | '\n' => {
                // CRLF inside a quoted cell is one line break
                if c == '\n' || chars.peek() != Some(&'\n') {
                    line += 1;
                }
                cell.push(c);
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        records.push((start, row));
    }

    records
}

/// Parse a delimited catalog export into rows.
///
/// Columns are matched to [`CatalogRow`] fields by name, accepting the same
/// spellings as the JSON export; unknown columns become extra attributes.
/// Blank lines are skipped. Cells missing from short rows are absent.
pub fn rows_from_delimited(text: &str) -> Result<Vec<CatalogRow>> {
    let mut table = parse_records(text).into_iter();
    let Some((_, headers)) = table.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (line, cells) in table {
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let object: Map<String, Value> = headers
            .iter()
            .zip(cells)
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), Value::String(cell)))
            .collect();

        let row = serde_json::from_value(Value::Object(object)).map_err(|e| {
            CatalogError::Source(format!("catalog line {}: {}", line, e))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_rows() {
        let rows = parse_delimited("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn handles_quotes_and_embedded_separators() {
        let rows = parse_delimited("name,note\r\n\"Hello, world\",\"say \"\"hi\"\"\"\r\n\"multi\nline\",x");
        assert_eq!(rows[1], vec!["Hello, world", "say \"hi\""]);
        assert_eq!(rows[2], vec!["multi\nline", "x"]);
    }

    #[test]
    fn lone_carriage_return_ends_a_row() {
        let rows = parse_delimited("a\rb");
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn empty_cells_are_kept() {
        let rows = parse_delimited("a,,c\n");
        assert_eq!(rows, vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn maps_columns_onto_rows() {
        let text = "id,type,name,soundset,product_or_pack,sub_type,rating\n\
                    m:1,mood,Tavern,Inn,CoreSet,,4\n\
                    \n\
                    e:2,element,Door,Inn,CoreSet,oneshot\n";
        let rows = rows_from_delimited(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.as_deref(), Some("m:1"));
        assert_eq!(rows[0].soundset_name.as_deref(), Some("Inn"));
        assert_eq!(rows[0].extra.get("rating"), Some(&Value::String("4".into())));
        assert_eq!(rows[1].sub_type.as_deref(), Some("oneshot"));
        // Short row: trailing column simply absent
        assert!(!rows[1].extra.contains_key("rating"));
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(rows_from_delimited("").unwrap().is_empty());
        assert!(rows_from_delimited("id,type,name\n").unwrap().is_empty());
    }

    #[test]
    fn records_start_on_physical_lines() {
        let records = parse_records("a,b\r\n\"x\r\ny\",1\r\n\r\nz,2");
        let starts: Vec<usize> = records.iter().map(|(line, _)| *line).collect();
        assert_eq!(starts, vec![1, 2, 4, 5]);
    }

    #[test]
    fn errors_name_the_physical_line() {
        let text = "id,name,soundset,soundset_name\n\
                    m:1,\"Two\nlines\",Inn\n\
                    m:2,Clash,Inn,Inn\n";
        let err = rows_from_delimited(text).unwrap_err();
        assert!(err.to_string().contains("catalog line 4"), "{err}");
    }
}
