//! Text-layer extraction for digitally-born PDFs.
//!
//! A scanned image masquerading as a PDF has no extractable text layer; it
//! comes back here as empty pages with quality 0, and the orchestrator
//! escalates it to the vision path instead of failing.

use super::types::{FormatExtraction, Page};
use super::IngestError;

/// Per-page quality for pages that carry a real text layer.
const PAGE_QUALITY: f32 = 0.9;

/// Minimum trimmed length for a page to count as carrying text.
const MIN_PAGE_TEXT: usize = 10;

pub fn extract(bytes: &[u8]) -> Result<FormatExtraction, IngestError> {
    let page_texts = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| IngestError::PdfParsing(e.to_string()))?;

    let pages: Vec<Page> = page_texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let quality = if text.trim().len() >= MIN_PAGE_TEXT {
                PAGE_QUALITY
            } else {
                0.0
            };
            Page {
                page_number: i + 1,
                text,
                tables: vec![],
                quality: Some(quality),
            }
        })
        .collect();

    let has_text = pages.iter().any(|p| p.quality.unwrap_or(0.0) > 0.0);
    let quality = if has_text { PAGE_QUALITY } else { 0.0 };

    Ok(FormatExtraction {
        pages,
        tables: vec![],
        quality,
    })
}
