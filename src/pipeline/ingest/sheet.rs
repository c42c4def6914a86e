//! Spreadsheet extraction: XLSX workbooks and plain CSV.
//!
//! Each sheet becomes one page whose text is the sheet rendered as
//! comma-delimited rows in native column order. One table per sheet carries
//! the raw rows; header inference is left to downstream consumers.

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::types::{FormatExtraction, Page, Table};
use super::IngestError;

/// Structured data parses with near-certainty.
const SHEET_QUALITY: f32 = 0.95;

/// Zip local-file-header magic; an XLSX is a zip container.
const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];

pub fn extract(bytes: &[u8]) -> Result<FormatExtraction, IngestError> {
    if bytes.starts_with(&ZIP_MAGIC) {
        extract_xlsx(bytes)
    } else {
        extract_csv(bytes)
    }
}

// ── XLSX ────────────────────────────────────────────────────────────────

fn extract_xlsx(bytes: &[u8]) -> Result<FormatExtraction, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::SheetParsing(format!("not an XLSX container: {e}")))?;

    let shared = match archive.by_name("xl/sharedStrings.xml") {
        Ok(part) => {
            let xml = std::io::read_to_string(part)
                .map_err(|e| IngestError::SheetParsing(e.to_string()))?;
            parse_shared_strings(&xml)?
        }
        Err(_) => Vec::new(),
    };

    // Worksheet parts in native order: sheet1.xml, sheet2.xml, ...
    let mut sheet_parts: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/sheet") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    sheet_parts.sort_by_key(|name| sheet_index(name));

    if sheet_parts.is_empty() {
        return Err(IngestError::SheetParsing("workbook has no worksheets".into()));
    }

    let mut pages = Vec::with_capacity(sheet_parts.len());
    let mut tables = Vec::with_capacity(sheet_parts.len());

    for (i, part_name) in sheet_parts.iter().enumerate() {
        let part = archive
            .by_name(part_name)
            .map_err(|e| IngestError::SheetParsing(e.to_string()))?;
        let xml =
            std::io::read_to_string(part).map_err(|e| IngestError::SheetParsing(e.to_string()))?;
        let rows = parse_worksheet(&xml, &shared)?;

        let page_number = i + 1;
        let text = rows
            .iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n");

        tables.push(Table {
            page_number,
            headers: vec![],
            rows: rows.clone(),
            confidence: Some(SHEET_QUALITY),
        });
        pages.push(Page {
            page_number,
            text,
            tables: vec![Table {
                page_number,
                headers: vec![],
                rows,
                confidence: Some(SHEET_QUALITY),
            }],
            quality: Some(SHEET_QUALITY),
        });
    }

    let quality = if pages.iter().any(|p| !p.text.is_empty()) {
        SHEET_QUALITY
    } else {
        0.0
    };

    Ok(FormatExtraction {
        pages,
        tables,
        quality,
    })
}

/// Numeric suffix of a worksheet part name, for native ordering.
fn sheet_index(part_name: &str) -> u32 {
    part_name
        .trim_start_matches("xl/worksheets/sheet")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(u32::MAX)
}

/// Parse `xl/sharedStrings.xml` into the indexed string table. Rich-text
/// entries concatenate their runs.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_entry = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"si" => {
                    in_entry = true;
                    current.clear();
                }
                b"t" if in_entry => in_text = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"si" => {
                    in_entry = false;
                    strings.push(current.clone());
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::SheetParsing(format!(
                    "sharedStrings parse error: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Parse one worksheet part into rows of cell strings, native column order,
/// gaps filled with empty strings.
fn parse_worksheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<String>>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell_col: usize = 0;
    let mut cell_type = CellType::Number;
    let mut cell_value: Option<String> = None;
    let mut in_value = false;
    let mut in_inline = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.name().as_ref() {
                    b"row" => row.clear(),
                    b"c" => {
                        cell_col = row.len();
                        cell_type = CellType::Number;
                        cell_value = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    cell_col = column_index(&attr.value);
                                }
                                b"t" => {
                                    cell_type = CellType::from_bytes(&attr.value);
                                }
                                _ => {}
                            }
                        }
                    }
                    b"v" => in_value = true,
                    b"is" => in_inline = true,
                    b"t" if in_inline => in_value = true,
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"row" => {
                    rows.push(std::mem::take(&mut row));
                }
                b"c" => {
                    let value = match (&cell_type, cell_value.take()) {
                        (CellType::Shared, Some(v)) => v
                            .parse::<usize>()
                            .ok()
                            .and_then(|idx| shared.get(idx).cloned())
                            .unwrap_or_default(),
                        (_, Some(v)) => v,
                        (_, None) => String::new(),
                    };
                    while row.len() < cell_col {
                        row.push(String::new());
                    }
                    row.push(value);
                }
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"t" => in_value = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_value => {
                let text = e.unescape().unwrap_or_default();
                match cell_value {
                    Some(ref mut v) => v.push_str(&text),
                    None => cell_value = Some(text.into_owned()),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::SheetParsing(format!(
                    "worksheet parse error: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

enum CellType {
    Shared,
    Number,
    Literal,
}

impl CellType {
    fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            b"s" => Self::Shared,
            b"str" | b"inlineStr" | b"b" => Self::Literal,
            _ => Self::Number,
        }
    }
}

/// 0-based column index from a cell reference like "B7".
fn column_index(cell_ref: &[u8]) -> usize {
    let mut col = 0usize;
    for &b in cell_ref {
        if b.is_ascii_uppercase() {
            col = col * 26 + (b - b'A' + 1) as usize;
        } else {
            break;
        }
    }
    col.saturating_sub(1)
}

// ── CSV ─────────────────────────────────────────────────────────────────

fn extract_csv(bytes: &[u8]) -> Result<FormatExtraction, IngestError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IngestError::SheetParsing(format!("CSV is not valid UTF-8: {e}")))?;

    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_csv_line)
        .collect();

    let page_text = rows
        .iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n");

    let table = Table {
        page_number: 1,
        headers: vec![],
        rows,
        confidence: Some(SHEET_QUALITY),
    };

    let quality = if page_text.is_empty() { 0.0 } else { SHEET_QUALITY };

    Ok(FormatExtraction {
        pages: vec![Page {
            page_number: 1,
            text: page_text,
            tables: vec![table.clone()],
            quality: Some(quality),
        }],
        tables: vec![table],
        quality,
    })
}

/// Minimal quote-aware CSV field splitter.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
