use serde::{Deserialize, Serialize};

use super::format::FileKind;

/// Raw input handed to the pipeline. Owned by the caller and never mutated;
/// the same buffer may be submitted again (e.g. as vision-mode images) after
/// ingestion completes.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    pub bytes: &'a [u8],
    /// Declared MIME type, possibly empty. Routing falls back to the file
    /// extension when it is absent or ambiguous.
    pub mime_type: &'a str,
    pub file_name: &'a str,
}

impl RawDocument<'_> {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// How the document's text content was (or must be) obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "TEXT_PARSING")]
    TextParsing,
    #[serde(rename = "OCR")]
    Ocr,
    #[serde(rename = "HYBRID")]
    Hybrid,
    #[serde(rename = "VISION")]
    Vision,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextParsing => "TEXT_PARSING",
            Self::Ocr => "OCR",
            Self::Hybrid => "HYBRID",
            Self::Vision => "VISION",
        }
    }
}

/// One extracted page. Page numbers are 1-based and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: usize,
    /// Extracted text; possibly empty, never absent.
    pub text: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Extraction confidence for this page: high for digitally-born text,
    /// low for content that must come from the vision model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
}

/// Tabular data found on a page. Headers may be empty — extractors pass raw
/// rows and leave header inference to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub page_number: usize,
    #[serde(default)]
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Per-ingestion bookkeeping carried alongside the extracted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub extraction_duration_ms: u64,
    /// Non-fatal problems accumulated during extraction. A corrupt sheet or
    /// page lands here instead of aborting the document.
    #[serde(default)]
    pub extraction_errors: Vec<String>,
}

/// Everything the ingestion stage knows about one document. Immutable once
/// produced; persisted unmodified as the retrievable source text of a
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub file_type: FileKind,
    /// ISO-639-1-like tag from the heuristic detector. A display and
    /// prompt-localization hint, not authoritative.
    pub language: String,
    pub page_count: usize,
    pub pages: Vec<Page>,
    /// Full concatenated text, pages joined in order. This is the LLM
    /// text-mode input.
    pub text: String,
    pub tables: Vec<Table>,
    pub extraction_method: ExtractionMethod,
    pub confidence: f32,
    pub metadata: IngestionMetadata,
}

/// Output of a single format extractor, before the orchestrator attaches
/// language, method, and metadata.
#[derive(Debug, Clone, Default)]
pub struct FormatExtraction {
    pub pages: Vec<Page>,
    pub tables: Vec<Table>,
    /// Quality hint in [0,1] for the whole document.
    pub quality: f32,
}
