//! Response parsing for the extraction model.
//!
//! Models wrap JSON in Markdown code fences despite instructions, so fences
//! are stripped defensively — wrapped, partially wrapped, and unwrapped
//! responses all parse. Anything else is `MalformedModelOutput`; an empty
//! contract is never fabricated from an unparseable response.

use super::types::RawExtractionPayload;
use super::NormalizeError;

/// Policy defaults applied only when a key is entirely absent. A
/// present-but-empty value is passed through untouched so the canonical
/// mapper records it as uncertain instead of silently papering over it.
pub const DEFAULT_HOTEL_NAME: &str = "Unknown Hotel";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Parse a raw model response into the extraction payload.
pub fn parse_payload(raw: &str) -> Result<RawExtractionPayload, NormalizeError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(NormalizeError::MalformedModelOutput(
            "response was empty after cleanup".into(),
        ));
    }

    let mut payload: RawExtractionPayload = serde_json::from_str(cleaned)
        .map_err(|e| NormalizeError::MalformedModelOutput(e.to_string()))?;

    // `room_rates` already defaults to [] via serde; fill the two required
    // identity fields only when the model omitted the keys altogether.
    if payload.hotel_name.is_none() {
        payload.hotel_name = Some(DEFAULT_HOTEL_NAME.to_string());
    }
    if payload.currency.is_none() {
        payload.currency = Some(DEFAULT_CURRENCY.to_string());
    }

    Ok(payload)
}

/// Strip Markdown code-fence markers around a JSON body. Handles leading
/// ```json / ``` fences, a trailing ``` fence, and unfenced input; a fence
/// missing its counterpart is tolerated.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut body = raw.trim();

    for opener in ["```json", "```JSON", "```"] {
        if let Some(rest) = body.strip_prefix(opener) {
            body = rest;
            break;
        }
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_response_and_defaults_room_rates() {
        let raw = "```json\n{\"hotelName\":\"Alpha\"}\n```";
        let payload = parse_payload(raw).unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some("Alpha"));
        assert!(payload.room_rates.is_empty());
    }

    #[test]
    fn parses_unfenced_response() {
        let payload = parse_payload(r#"{"hotelName":"Beta","currency":"EUR"}"#).unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some("Beta"));
        assert_eq!(payload.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn parses_partially_fenced_response() {
        // Opening fence only
        let payload = parse_payload("```json\n{\"hotelName\":\"Gamma\"}").unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some("Gamma"));

        // Closing fence only
        let payload = parse_payload("{\"hotelName\":\"Delta\"}\n```").unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some("Delta"));
    }

    #[test]
    fn bare_fence_without_language_tag() {
        let payload = parse_payload("```\n{\"hotelName\":\"Epsilon\"}\n```").unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some("Epsilon"));
    }

    #[test]
    fn absent_keys_get_policy_defaults() {
        let payload = parse_payload("{}").unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some(DEFAULT_HOTEL_NAME));
        assert_eq!(payload.currency.as_deref(), Some(DEFAULT_CURRENCY));
    }

    #[test]
    fn present_but_empty_values_pass_through() {
        let payload = parse_payload(r#"{"hotelName":"","currency":""}"#).unwrap();
        assert_eq!(payload.hotel_name.as_deref(), Some(""));
        assert_eq!(payload.currency.as_deref(), Some(""));
    }

    #[test]
    fn full_payload_parses() {
        let raw = r#"```json
{
  "hotelName": "Grand Sapphire Resort & Spa",
  "contractStartDate": "2026-03-01",
  "contractEndDate": "2027-02-28",
  "currency": "EUR",
  "cancellationPolicy": "Free cancellation up to 14 days before arrival.",
  "paymentTerms": "Net 30 days from invoice date",
  "roomRates": [
    {
      "roomType": "Superior Double",
      "season": "High",
      "rate": 195,
      "mealPlan": "BB",
      "currency": "EUR",
      "validFrom": "2026-06-01",
      "validTo": "2026-08-31"
    },
    {
      "roomType": "Deluxe Suite",
      "season": "Peak",
      "rate": "450",
      "mealPlan": "HB",
      "currency": "EUR"
    }
  ],
  "confidence": 0.94
}
```"#;
        let payload = parse_payload(raw).unwrap();
        assert_eq!(payload.room_rates.len(), 2);
        assert_eq!(payload.room_rates[0].room_type.as_deref(), Some("Superior Double"));
        assert!(payload.room_rates[1].rate.as_ref().unwrap().is_string());
        assert!((payload.confidence.unwrap() - 0.94).abs() < f32::EPSILON);
    }

    #[test]
    fn prose_response_is_malformed() {
        let err = parse_payload("I could not find any contract data in this document.").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedModelOutput(_)));
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = parse_payload("```json\n{\"hotelName\": \n```").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedModelOutput(_)));
    }

    #[test]
    fn empty_response_is_malformed() {
        assert!(matches!(
            parse_payload("   "),
            Err(NormalizeError::MalformedModelOutput(_))
        ));
        assert!(matches!(
            parse_payload("```json\n```"),
            Err(NormalizeError::MalformedModelOutput(_))
        ));
    }

    #[test]
    fn strip_handles_all_wrappings() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```json\n{\"a\":1}\n```  "), "{\"a\":1}");
    }
}
