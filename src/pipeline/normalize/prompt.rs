//! Prompt assembly for contract extraction.
//!
//! One fixed instruction describes the exact JSON payload shape; the
//! document arrives either as whitespace-collapsed text or as encoded
//! images. A stricter variant of the instruction is used on retry after a
//! malformed response.

use crate::config::NormalizeConfig;

use super::types::{ModelRequest, RequestMode};

pub const TEXT_SYSTEM_PROMPT: &str = "You are an expert hotel contract analyst. \
    Extract structured information from hotel contracts with high accuracy. \
    Return data ONLY as JSON.";

pub const VISION_SYSTEM_PROMPT: &str = "You are an expert hotel contract data \
    extraction specialist. Extract structured information from the provided \
    contract page images with high accuracy. Return data ONLY as JSON.";

/// The exact payload shape the parser expects back.
const PAYLOAD_SHAPE: &str = r#"Return a single JSON object with exactly this shape:
{
  "hotelName": "string",
  "contractStartDate": "YYYY-MM-DD",
  "contractEndDate": "YYYY-MM-DD",
  "currency": "ISO 4217 code, e.g. EUR",
  "cancellationPolicy": "string or null",
  "paymentTerms": "string or null",
  "roomRates": [
    {
      "roomType": "string as written in the contract",
      "season": "Low | Mid | High | Peak | Year-round or as written",
      "rate": 0.0,
      "mealPlan": "RO | BB | HB | FB | AI or as written",
      "currency": "ISO 4217 code",
      "validFrom": "YYYY-MM-DD or null",
      "validTo": "YYYY-MM-DD or null"
    }
  ],
  "confidence": 0.0
}
Use null for anything the document does not state. Do not invent values."#;

const STRICT_SUFFIX: &str = "\n\nIMPORTANT: Respond with RAW JSON only. \
    No Markdown code fences, no commentary, no text before or after the JSON object.";

/// Build a text-mode request from concatenated document text.
pub fn build_text_request(text: &str, config: &NormalizeConfig, strict: bool) -> ModelRequest {
    let collapsed = collapse_whitespace(text);
    let body = truncate_chars(&collapsed, config.max_input_chars);
    let document = if body.trim().is_empty() {
        "No text could be extracted from this document. If no contract data is \
         present, return the structure with null values and confidence 0."
            .to_string()
    } else {
        body
    };

    let mut user = format!(
        "Extract structured hotel contract data from this text:\n\n{document}\n\n{PAYLOAD_SHAPE}"
    );
    if strict {
        user.push_str(STRICT_SUFFIX);
    }

    ModelRequest {
        mode: RequestMode::Text,
        system: TEXT_SYSTEM_PROMPT.to_string(),
        user,
        images: vec![],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Build a vision-mode request from encoded page images.
pub fn build_vision_request(
    images: Vec<String>,
    config: &NormalizeConfig,
    strict: bool,
) -> ModelRequest {
    let mut user = format!(
        "Extract structured hotel contract data from the attached contract page image(s).\n\n{PAYLOAD_SHAPE}"
    );
    if strict {
        user.push_str(STRICT_SUFFIX);
    }

    ModelRequest {
        mode: RequestMode::Vision,
        system: VISION_SYSTEM_PROMPT.to_string(),
        user,
        images,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Collapse runs of whitespace into single spaces, preserving line breaks as
/// separators so tabular text stays readable.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c == '\n' {
            while out.ends_with(' ') {
                out.pop();
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
            last_was_space = true;
        } else if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim_end().to_string()
}

/// Truncate on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
