//! Ingestion orchestrator: route → extract → detect language → assemble.
//!
//! Routing failures are fatal (`UnsupportedFormat`). Extractor-internal
//! problems are not: they become a zero-confidence extraction with the error
//! recorded in `metadata.extraction_errors`, and the method-selection policy
//! decides whether the document can still proceed via the vision path.

use std::time::Instant;

use crate::config::IngestConfig;

use super::format::{route, FileKind};
use super::image;
use super::language::detect_language;
use super::types::{
    ExtractionMethod, FormatExtraction, IngestionMetadata, IngestionResult, Page, RawDocument,
};
use super::{pdf, sheet, word, IngestError};

/// Drives the full ingestion pipeline for one document.
///
/// Stateless apart from configuration; concurrent ingestions of different
/// documents need no coordination.
pub struct DocumentIngestor {
    config: IngestConfig,
}

impl Default for DocumentIngestor {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

impl DocumentIngestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Ingest one document. Deterministic for identical bytes and declared
    /// type, except for the wall-clock duration in metadata.
    pub fn ingest(&self, doc: &RawDocument<'_>) -> Result<IngestionResult, IngestError> {
        let started = Instant::now();
        let kind = route(doc.mime_type, doc.file_name)?;

        tracing::info!(
            file = doc.file_name,
            kind = kind.as_str(),
            size = doc.size(),
            "Starting ingestion"
        );

        let mut errors: Vec<String> = Vec::new();
        let extraction = match kind {
            FileKind::Image => image::extract(),
            FileKind::Pdf => self.run_extractor(pdf::extract, doc, &mut errors),
            FileKind::Word => self.run_extractor(word::extract, doc, &mut errors),
            FileKind::Spreadsheet => self.run_extractor(sheet::extract, doc, &mut errors),
        };

        let mut pages = extraction.pages;
        let tables = extraction.tables;
        let text = join_pages(&pages);
        let text_chars = non_whitespace_len(&text);

        // Extraction-method selection policy. The thresholds drive cost and
        // accuracy tradeoffs downstream, so they live in IngestConfig rather
        // than inline.
        let (method, confidence) = if kind == FileKind::Image {
            (ExtractionMethod::Vision, image::VISION_QUALITY)
        } else if text_chars >= self.config.min_text_chars {
            (ExtractionMethod::TextParsing, extraction.quality)
        } else if kind == FileKind::Pdf && doc.size() < self.config.vision_size_ceiling {
            // Likely a scanned/flattened PDF: eligible for image-mode
            // submission to the external model.
            (ExtractionMethod::Vision, image::VISION_QUALITY)
        } else {
            return Err(IngestError::InsufficientContent {
                text_chars,
                file_size: doc.size(),
            });
        };

        // A vision-bound document with no native pages still needs one page
        // to anchor provenance.
        if method == ExtractionMethod::Vision && pages.is_empty() {
            pages.push(image::placeholder_page(1));
        }

        let text = if method == ExtractionMethod::Vision && text_chars == 0 {
            join_pages(&pages)
        } else {
            text
        };

        let language = detect_language(&text);
        let page_count = pages.len();
        let duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            file = doc.file_name,
            method = method.as_str(),
            pages = page_count,
            confidence,
            language = %language,
            duration_ms,
            "Ingestion complete"
        );

        Ok(IngestionResult {
            file_type: kind,
            language,
            page_count,
            pages,
            text,
            tables,
            extraction_method: method,
            confidence,
            metadata: IngestionMetadata {
                file_name: doc.file_name.to_string(),
                file_size: doc.size(),
                mime_type: doc.mime_type.to_string(),
                extraction_duration_ms: duration_ms,
                extraction_errors: errors,
            },
        })
    }

    /// Run a format extractor, converting an internal failure into an empty
    /// zero-quality extraction plus an error-list entry. A corrupt document
    /// must not abort ingestion outright; the policy above decides its fate.
    fn run_extractor(
        &self,
        extractor: fn(&[u8]) -> Result<FormatExtraction, IngestError>,
        doc: &RawDocument<'_>,
        errors: &mut Vec<String>,
    ) -> FormatExtraction {
        match extractor(doc.bytes) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!(file = doc.file_name, error = %e, "Extractor failed");
                errors.push(e.to_string());
                FormatExtraction::default()
            }
        }
    }
}

fn join_pages(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
