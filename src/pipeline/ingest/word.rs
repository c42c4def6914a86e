//! Raw-text extraction for word-processing documents.
//!
//! DOCX is an OOXML zip container; the main document part is walked directly
//! for text runs. Word documents carry no structural page boundaries, so
//! pages are synthesized from explicit page-break markers when present,
//! otherwise the whole document is a single page.

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::types::{FormatExtraction, Page};
use super::IngestError;

const DOC_QUALITY: f32 = 0.9;

/// Internal page-break marker inserted while walking the XML.
const PAGE_BREAK: char = '\u{0C}';

/// OLE compound-file magic: legacy binary .doc, which has no XML parts.
const OLE_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

pub fn extract(bytes: &[u8]) -> Result<FormatExtraction, IngestError> {
    if bytes.starts_with(&OLE_MAGIC) {
        return Err(IngestError::WordParsing(
            "legacy binary .doc has no text part; convert to .docx".into(),
        ));
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::WordParsing(format!("not a DOCX container: {e}")))?;
    let part = archive
        .by_name("word/document.xml")
        .map_err(|e| IngestError::WordParsing(format!("missing word/document.xml: {e}")))?;
    let xml = std::io::read_to_string(part)
        .map_err(|e| IngestError::WordParsing(format!("unreadable document part: {e}")))?;

    let text = document_text(&xml)?;

    let pages: Vec<Page> = text
        .split(PAGE_BREAK)
        .enumerate()
        .map(|(i, chunk)| Page {
            page_number: i + 1,
            text: chunk.trim().to_string(),
            tables: vec![],
            quality: Some(DOC_QUALITY),
        })
        .collect();

    let quality = if pages.iter().any(|p| !p.text.is_empty()) {
        DOC_QUALITY
    } else {
        0.0
    };

    Ok(FormatExtraction {
        pages,
        tables: vec![],
        quality,
    })
}

/// Collect text runs from the main document part. Paragraph ends become
/// newlines; explicit page breaks become the internal break marker.
fn document_text(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:br" if is_page_break(e) => out.push(PAGE_BREAK),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:br" if is_page_break(e) => out.push(PAGE_BREAK),
                b"w:lastRenderedPageBreak" => out.push(PAGE_BREAK),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                out.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::WordParsing(format!("XML parse error: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn is_page_break(e: &quick_xml::events::BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"w:type" && a.value.as_ref() == b"page")
}
