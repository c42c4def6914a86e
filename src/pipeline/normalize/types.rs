use serde::{Deserialize, Serialize};

use super::NormalizeError;

/// Untrusted, loosely-typed structure returned by the external model.
/// Created per invocation and discarded once mapped; no invariants are
/// enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExtractionPayload {
    pub hotel_name: Option<String>,
    pub contract_start_date: Option<String>,
    pub contract_end_date: Option<String>,
    pub currency: Option<String>,
    pub cancellation_policy: Option<String>,
    pub payment_terms: Option<String>,
    pub room_rates: Vec<RawRoomRate>,
    /// Self-reported confidence; taken with appropriate suspicion.
    pub confidence: Option<f32>,
}

/// One raw room-rate entry. The rate arrives as whatever JSON the model
/// produced — number or numeric string — and is coerced by the mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRoomRate {
    pub room_type: Option<String>,
    pub season: Option<String>,
    pub rate: Option<serde_json::Value>,
    pub meal_plan: Option<String>,
    pub currency: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}

/// Whether the request carries text or images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Text,
    Vision,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Vision => "vision",
        }
    }
}

/// One request to the external model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub mode: RequestMode,
    pub system: String,
    /// Text-mode user content; ignored in vision mode.
    pub user: String,
    /// Vision-mode payload: data-URL encoded images.
    pub images: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// External model abstraction (allows mocking). The response is raw text
/// expected to contain a JSON object, possibly wrapped in code fences.
pub trait ChatModel {
    fn complete(&self, request: &ModelRequest) -> Result<String, NormalizeError>;
}

impl<T: ChatModel + ?Sized> ChatModel for std::sync::Arc<T> {
    fn complete(&self, request: &ModelRequest) -> Result<String, NormalizeError> {
        (**self).complete(request)
    }
}
