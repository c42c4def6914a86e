//! Pipeline configuration.
//!
//! The extraction-policy thresholds are deliberate constants-with-knobs: the
//! defaults encode the documented policy, and callers that need different
//! tradeoffs override them instead of editing call sites.

/// Application-level constants
pub const APP_NAME: &str = "Ratebook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "ratebook=info".to_string()
}

/// Thresholds for the ingestion orchestrator's method-selection policy.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Minimum non-whitespace characters for text parsing to be trusted.
    pub min_text_chars: usize,
    /// PDFs below this byte size with no text layer are treated as scanned
    /// and submitted to the vision model; larger ones fail as insufficient.
    pub vision_size_ceiling: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 20,
            vision_size_ceiling: 5 * 1024 * 1024,
        }
    }
}

/// Settings for the external model client and the normalization strategy
/// runner.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// OpenAI-compatible chat-completions endpoint base URL.
    pub base_url: String,
    /// Bearer key; absent means the client refuses to send requests.
    pub api_key: Option<String>,
    pub model: String,
    /// Request timeout. The model call is the only blocking network hop in
    /// the pipeline, so it carries the only explicit timeout.
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Text-mode input is whitespace-collapsed then truncated to this many
    /// characters before being sent.
    pub max_input_chars: usize,
    /// Bounded retries for transport-level failures, per strategy.
    pub max_transport_retries: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.z.ai/api/coding/paas/v4".to_string(),
            api_key: None,
            model: "glm-4.6v".to_string(),
            timeout_secs: 120,
            temperature: 0.1,
            max_tokens: 4000,
            max_input_chars: 48_000,
            max_transport_retries: 2,
        }
    }
}

impl NormalizeConfig {
    /// Read endpoint settings from the environment, falling back to
    /// defaults: RATEBOOK_MODEL_BASE_URL, RATEBOOK_MODEL_API_KEY,
    /// RATEBOOK_MODEL_NAME.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("RATEBOOK_MODEL_BASE_URL") {
            config.base_url = url;
        }
        config.api_key = std::env::var("RATEBOOK_MODEL_API_KEY").ok();
        if let Ok(model) = std::env::var("RATEBOOK_MODEL_NAME") {
            config.model = model;
        }
        config
    }
}

/// Thresholds for the canonical mapper's conflict handling.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// A conflicting value is only promoted into the primary field when the
    /// payload's self-reported confidence reaches this bar; below it, the
    /// suggestion stays inside the uncertain-field entry.
    pub conflict_confidence_threshold: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            conflict_confidence_threshold: 0.6,
        }
    }
}
