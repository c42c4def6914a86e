use serde::{Deserialize, Serialize};

use super::IngestError;

/// Broad format categories the pipeline handles, one per format extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Word,
    Spreadsheet,
    Image,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Spreadsheet => "spreadsheet",
            Self::Image => "image",
        }
    }
}

/// Route a document to its format extractor.
///
/// Decision order: exact MIME match, then substring match on the declared
/// type, then the same matching applied to the MIME type guessed from the
/// file extension. Spreadsheet markers are checked before word-processing
/// ones because OOXML spreadsheet types contain the substring "document".
pub fn route(mime_type: &str, file_name: &str) -> Result<FileKind, IngestError> {
    if let Some(kind) = classify_mime(&mime_type.to_lowercase()) {
        return Ok(kind);
    }

    // Extension fallback for absent or unhelpful declared types
    if let Some(guessed) = mime_guess::from_path(file_name).first_raw() {
        if let Some(kind) = classify_mime(&guessed.to_lowercase()) {
            return Ok(kind);
        }
    }

    Err(IngestError::UnsupportedFormat {
        mime_type: mime_type.to_string(),
        file_name: file_name.to_string(),
    })
}

fn classify_mime(mime: &str) -> Option<FileKind> {
    if mime.is_empty() {
        return None;
    }
    match mime {
        "application/pdf" => return Some(FileKind::Pdf),
        "text/csv" => return Some(FileKind::Spreadsheet),
        _ => {}
    }
    if mime.contains("pdf") {
        Some(FileKind::Pdf)
    } else if mime.contains("sheet") || mime.contains("excel") || mime.contains("csv") {
        Some(FileKind::Spreadsheet)
    } else if mime.contains("word") || mime.contains("document") {
        Some(FileKind::Word)
    } else if mime.starts_with("image/") {
        Some(FileKind::Image)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_exact_mime_types() {
        assert_eq!(route("application/pdf", "contract").unwrap(), FileKind::Pdf);
        assert_eq!(
            route(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "contract"
            )
            .unwrap(),
            FileKind::Word
        );
        assert_eq!(
            route(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "rates"
            )
            .unwrap(),
            FileKind::Spreadsheet
        );
        assert_eq!(route("image/png", "scan").unwrap(), FileKind::Image);
        assert_eq!(route("image/tiff", "scan").unwrap(), FileKind::Image);
    }

    #[test]
    fn spreadsheet_wins_over_word_for_ooxml_sheet_mime() {
        // The full OOXML sheet MIME contains "officedocument" — it must not
        // land in the Word extractor.
        let kind = route(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "rates.xlsx",
        )
        .unwrap();
        assert_eq!(kind, FileKind::Spreadsheet);
    }

    #[test]
    fn routes_by_extension_when_mime_absent() {
        assert_eq!(route("", "contract.pdf").unwrap(), FileKind::Pdf);
        assert_eq!(route("", "contract.docx").unwrap(), FileKind::Word);
        assert_eq!(route("", "contract.doc").unwrap(), FileKind::Word);
        assert_eq!(route("", "rates.xlsx").unwrap(), FileKind::Spreadsheet);
        assert_eq!(route("", "rates.xls").unwrap(), FileKind::Spreadsheet);
        assert_eq!(route("", "rates.csv").unwrap(), FileKind::Spreadsheet);
        assert_eq!(route("", "scan.png").unwrap(), FileKind::Image);
        assert_eq!(route("", "scan.jpg").unwrap(), FileKind::Image);
        assert_eq!(route("", "scan.jpeg").unwrap(), FileKind::Image);
        assert_eq!(route("", "scan.tiff").unwrap(), FileKind::Image);
    }

    #[test]
    fn routes_by_extension_when_mime_generic() {
        assert_eq!(
            route("application/octet-stream", "contract.pdf").unwrap(),
            FileKind::Pdf
        );
    }

    #[test]
    fn legacy_office_mimes_route_by_substring() {
        assert_eq!(route("application/msword", "old").unwrap(), FileKind::Word);
        assert_eq!(
            route("application/vnd.ms-excel", "old").unwrap(),
            FileKind::Spreadsheet
        );
    }

    #[test]
    fn unknown_input_is_unsupported() {
        let err = route("application/zip", "archive.zip").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));

        let err = route("", "no_extension").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }
}
