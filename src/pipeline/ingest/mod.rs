pub mod format;
pub mod image;
pub mod language;
pub mod orchestrator;
pub mod pdf;
pub mod sheet;
pub mod types;
pub mod word;

pub use format::*;
pub use orchestrator::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Routing failed: neither MIME type nor file extension matched a
    /// supported format. Terminal for the whole ingestion, not retried.
    #[error("Unsupported format: mime type '{mime_type}', file '{file_name}'")]
    UnsupportedFormat { mime_type: String, file_name: String },

    /// The document yielded too little text for text parsing and is not
    /// eligible for the vision path. Recoverable only by resubmission.
    #[error(
        "Insufficient content: {text_chars} non-whitespace chars extracted from \
         {file_size} bytes, not vision-eligible"
    )]
    InsufficientContent { text_chars: usize, file_size: u64 },

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Word parsing failed: {0}")]
    WordParsing(String),

    #[error("Spreadsheet parsing failed: {0}")]
    SheetParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
