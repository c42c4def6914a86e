//! Normalization orchestrator.
//!
//! "Try text, fall back to vision" is expressed as one ordered list of named
//! strategies with a uniform success/failure contract, instead of nested
//! conditionals per document shape. Each strategy gets bounded transport
//! retries with backoff and one stricter-prompt retry after a malformed
//! response; a timeout abandons the strategy and moves to the next mode.

use base64::Engine as _;

use crate::config::NormalizeConfig;
use crate::pipeline::ingest::{ExtractionMethod, IngestionResult};

use super::parser::parse_payload;
use super::prompt::{build_text_request, build_vision_request};
use super::types::{ChatModel, ModelRequest, RawExtractionPayload, RequestMode};
use super::NormalizeError;

/// One stricter-prompt retry after a malformed response.
const MAX_PARSE_RETRIES: u32 = 1;

/// A named extraction strategy. The list tried for a document depends only
/// on its extraction method and whether image bytes are available.
#[derive(Debug, Clone, Copy)]
struct Strategy {
    name: &'static str,
    mode: RequestMode,
}

const TEXT_STRATEGY: Strategy = Strategy {
    name: "text",
    mode: RequestMode::Text,
};

const VISION_STRATEGY: Strategy = Strategy {
    name: "vision",
    mode: RequestMode::Vision,
};

/// Builds model requests from ingestion output and reconciles responses into
/// the raw extraction payload.
pub struct ContractNormalizer {
    model: Box<dyn ChatModel + Send + Sync>,
    config: NormalizeConfig,
}

impl ContractNormalizer {
    pub fn new(model: Box<dyn ChatModel + Send + Sync>, config: NormalizeConfig) -> Self {
        Self { model, config }
    }

    /// Normalize one ingested document. `images` carries the original bytes
    /// for vision-mode submission; this crate never rasterizes documents
    /// itself, the caller supplies page images.
    pub fn normalize(
        &self,
        ingestion: &IngestionResult,
        images: &[Vec<u8>],
    ) -> Result<RawExtractionPayload, NormalizeError> {
        let encoded: Vec<String> = images.iter().map(|b| encode_image_data_url(b)).collect();
        let strategies = strategy_order(ingestion.extraction_method, !encoded.is_empty());

        let mut last_error: Option<NormalizeError> = None;
        for strategy in &strategies {
            match self.run_strategy(strategy, ingestion, &encoded) {
                Ok(payload) => {
                    tracing::info!(
                        strategy = strategy.name,
                        rates = payload.room_rates.len(),
                        "Normalization complete"
                    );
                    return Ok(payload);
                }
                Err(NormalizeError::MissingApiKey) => return Err(NormalizeError::MissingApiKey),
                Err(e) => {
                    tracing::warn!(strategy = strategy.name, error = %e, "Strategy failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            NormalizeError::MalformedModelOutput("no extraction strategy applicable".into())
        }))
    }

    fn run_strategy(
        &self,
        strategy: &Strategy,
        ingestion: &IngestionResult,
        images: &[String],
    ) -> Result<RawExtractionPayload, NormalizeError> {
        let mut strict = false;
        let mut transport_attempts = 0u32;
        let mut parse_attempts = 0u32;

        loop {
            let request = self.build_request(strategy.mode, ingestion, images, strict);
            match self.model.complete(&request) {
                Ok(raw) => match parse_payload(&raw) {
                    Ok(payload) => return Ok(payload),
                    Err(e) if parse_attempts < MAX_PARSE_RETRIES => {
                        parse_attempts += 1;
                        strict = true;
                        tracing::warn!(
                            strategy = strategy.name,
                            error = %e,
                            "Malformed response, retrying with strict prompt"
                        );
                    }
                    Err(e) => return Err(e),
                },
                Err(e)
                    if e.is_transport()
                        && transport_attempts < self.config.max_transport_retries =>
                {
                    transport_attempts += 1;
                    let delay = std::time::Duration::from_millis(300 * transport_attempts as u64);
                    tracing::warn!(
                        strategy = strategy.name,
                        attempt = transport_attempts,
                        error = %e,
                        "Transport failure, backing off"
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn build_request(
        &self,
        mode: RequestMode,
        ingestion: &IngestionResult,
        images: &[String],
        strict: bool,
    ) -> ModelRequest {
        match mode {
            RequestMode::Text => build_text_request(&ingestion.text, &self.config, strict),
            RequestMode::Vision => build_vision_request(images.to_vec(), &self.config, strict),
        }
    }
}

/// Ordered strategy list for a document. Vision-bound documents lead with
/// vision when image bytes exist; everything else leads with text and keeps
/// vision as the single fallback.
fn strategy_order(method: ExtractionMethod, has_images: bool) -> Vec<Strategy> {
    match (method, has_images) {
        (ExtractionMethod::Vision, true) => vec![VISION_STRATEGY, TEXT_STRATEGY],
        (_, true) => vec![TEXT_STRATEGY, VISION_STRATEGY],
        (_, false) => vec![TEXT_STRATEGY],
    }
}

/// Encode image bytes as a data URL for the chat-completions vision payload.
pub fn encode_image_data_url(bytes: &[u8]) -> String {
    let media_type = sniff_image_type(bytes);
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type};base64,{encoded}")
}

fn sniff_image_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => "image/tiff",
        _ => "image/png",
    }
}
