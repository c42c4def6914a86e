//! End-to-end contract processing: ingest → normalize → canonicalize.
//!
//! Single entry point over the three pipeline stages, with optional
//! persistence. Persistence failure never destroys pipeline output — the
//! extracted record has value independent of its storage, so a store error
//! is logged and surfaced as a warning on the outcome instead.

use chrono::Utc;
use thiserror::Error;

use crate::config::{IngestConfig, MapperConfig, NormalizeConfig};
use crate::db::ContractStore;
use crate::models::CanonicalContract;
use crate::pipeline::canonical::ContractMapper;
use crate::pipeline::ingest::{
    DocumentIngestor, FileKind, IngestError, IngestionResult, RawDocument,
};
use crate::pipeline::normalize::{ChatModel, ContractNormalizer, NormalizeError};

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Everything produced for one document. The ingestion result is kept
/// unmodified as the contract's retrievable source text.
#[derive(Debug)]
pub struct ProcessedContract {
    pub ingestion: IngestionResult,
    pub contract: CanonicalContract,
    /// Record id when a store was supplied and the write succeeded.
    pub stored_id: Option<uuid::Uuid>,
    /// Populated when persistence was attempted and failed.
    pub store_warning: Option<String>,
}

/// Orchestrates the full pipeline for one document at a time. No shared
/// mutable state: concurrent processors (or one processor across threads)
/// ingest independent documents without coordination.
pub struct ContractProcessor {
    ingestor: DocumentIngestor,
    normalizer: ContractNormalizer,
    mapper: ContractMapper,
}

impl ContractProcessor {
    pub fn new(
        model: Box<dyn ChatModel + Send + Sync>,
        ingest_config: IngestConfig,
        normalize_config: NormalizeConfig,
        mapper_config: MapperConfig,
    ) -> Self {
        Self {
            ingestor: DocumentIngestor::new(ingest_config),
            normalizer: ContractNormalizer::new(model, normalize_config),
            mapper: ContractMapper::new(mapper_config),
        }
    }

    /// Default-configured processor around a model client.
    pub fn with_model(model: Box<dyn ChatModel + Send + Sync>) -> Self {
        Self::new(
            model,
            IngestConfig::default(),
            NormalizeConfig::default(),
            MapperConfig::default(),
        )
    }

    /// Run the full pipeline. The caller receives either a complete record
    /// or a structured error naming the failed stage — never a partial
    /// record presented as complete.
    pub fn process(&self, doc: &RawDocument<'_>) -> Result<ProcessedContract, ProcessingError> {
        let ingestion = self.ingestor.ingest(doc)?;

        // Image documents are submitted to the vision model as their own
        // original bytes. Scanned PDFs flagged VISION need caller-rendered
        // page images; without them the text strategy still runs.
        let images: Vec<Vec<u8>> = if ingestion.file_type == FileKind::Image {
            vec![doc.bytes.to_vec()]
        } else {
            vec![]
        };

        let payload = self.normalizer.normalize(&ingestion, &images)?;
        let contract = self.mapper.canonicalize(&payload, &ingestion, Utc::now());

        Ok(ProcessedContract {
            ingestion,
            contract,
            stored_id: None,
            store_warning: None,
        })
    }

    /// Run the full pipeline and persist the result. Store failures are
    /// reported on the outcome, not raised.
    pub fn process_and_store(
        &self,
        doc: &RawDocument<'_>,
        store: &ContractStore,
    ) -> Result<ProcessedContract, ProcessingError> {
        let mut processed = self.process(doc)?;

        match store.create_record(&processed.contract) {
            Ok(id) => processed.stored_id = Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist contract; returning result anyway");
                processed.store_warning = Some(e.to_string());
            }
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingest::ExtractionMethod;
    use crate::pipeline::normalize::MockChatModel;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const REPLY: &str = r#"```json
{
  "hotelName": "Hotel Aurora",
  "contractStartDate": "2026-01-01",
  "contractEndDate": "2026-12-31",
  "currency": "EUR",
  "paymentTerms": "Net 30 days",
  "roomRates": [
    {"roomType": "Double", "season": "High", "rate": 150, "mealPlan": "BB", "currency": "EUR"}
  ],
  "confidence": 0.9
}
```"#;

    fn make_docx(text: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn full_pipeline_from_docx_to_contract() {
        let processor = ContractProcessor::with_model(Box::new(MockChatModel::new(REPLY)));
        let docx = make_docx(
            "Hotel Aurora agreement. Double room 150 EUR bed and breakfast, high season.",
        );
        let doc = RawDocument {
            bytes: &docx,
            mime_type: "",
            file_name: "aurora.docx",
        };

        let processed = processor.process(&doc).unwrap();
        assert_eq!(
            processed.ingestion.extraction_method,
            ExtractionMethod::TextParsing
        );
        assert_eq!(processed.contract.meta.hotel_name, "Hotel Aurora");
        assert_eq!(processed.contract.rates.len(), 1);
        assert!(processed.stored_id.is_none());
    }

    #[test]
    fn image_document_submits_original_bytes_as_vision_payload() {
        let mock = std::sync::Arc::new(MockChatModel::new(REPLY));
        let processor = ContractProcessor::with_model(Box::new(mock.clone()));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let doc = RawDocument {
            bytes: &jpeg,
            mime_type: "image/jpeg",
            file_name: "scan.jpg",
        };

        let processed = processor.process(&doc).unwrap();
        assert_eq!(
            processed.ingestion.extraction_method,
            ExtractionMethod::Vision
        );
        // First call went out in vision mode
        let modes = mock.calls.lock().unwrap().clone();
        assert_eq!(
            modes.first().copied(),
            Some(crate::pipeline::normalize::RequestMode::Vision)
        );
    }

    #[test]
    fn unsupported_format_names_the_failed_stage() {
        let processor = ContractProcessor::with_model(Box::new(MockChatModel::new(REPLY)));
        let doc = RawDocument {
            bytes: b"data",
            mime_type: "application/zip",
            file_name: "a.zip",
        };
        let err = processor.process(&doc).unwrap_err();
        assert!(matches!(err, ProcessingError::Ingest(_)));
    }

    #[test]
    fn process_and_store_round_trips_through_store() {
        let processor = ContractProcessor::with_model(Box::new(MockChatModel::new(REPLY)));
        let store = ContractStore::open_in_memory().unwrap();

        let docx = make_docx(
            "Hotel Aurora agreement. Double room 150 EUR bed and breakfast, high season.",
        );
        let doc = RawDocument {
            bytes: &docx,
            mime_type: "",
            file_name: "aurora.docx",
        };

        let processed = processor.process_and_store(&doc, &store).unwrap();
        let id = processed.stored_id.unwrap();
        assert!(processed.store_warning.is_none());

        let fetched = store.get_record(&id).unwrap().unwrap();
        assert_eq!(fetched, processed.contract);
    }
}
