//! Reconciliation of the untrusted extraction payload into the canonical
//! contract record.
//!
//! Nothing here throws for bad data: unparseable values coerce to safe
//! defaults and are recorded as uncertain fields, conflicting values retain
//! both alternatives, and required fields filled by placeholders are flagged
//! rather than passed off as extracted. Output is byte-identical across
//! calls with identical inputs — the only clock-dependent value is the
//! `extracted_at` timestamp the caller passes in.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::MapperConfig;
use crate::models::{
    CanonicalContract, ContractMeta, EffectivePeriod, FieldAlternative, LanguageCode, PaymentTerms,
    PaymentTermsKind, PriceType, Rate, RawClause, UncertainField, SCHEMA_VERSION,
};
use crate::pipeline::ingest::IngestionResult;
use crate::pipeline::normalize::{RawExtractionPayload, DEFAULT_HOTEL_NAME, DEFAULT_CURRENCY};

use super::vocab::{
    classify_payment_terms, first_number, normalize_meal_plan, normalize_room_type,
    normalize_season,
};

/// Maps raw extraction payloads onto the canonical schema.
pub struct ContractMapper {
    config: MapperConfig,
}

impl Default for ContractMapper {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}

impl ContractMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Produce the canonical record for one extraction. `extracted_at` is
    /// informational provenance supplied by the caller; everything else is a
    /// pure function of the two inputs.
    pub fn canonicalize(
        &self,
        payload: &RawExtractionPayload,
        ingestion: &IngestionResult,
        extracted_at: DateTime<Utc>,
    ) -> CanonicalContract {
        let mut uncertain: Vec<UncertainField> = Vec::new();
        let overall = payload.confidence.unwrap_or(ingestion.confidence);

        let hotel_name = self.resolve_hotel_name(payload, &mut uncertain);
        let currency = self.resolve_currency(payload, &mut uncertain);
        let effective_period = self.resolve_period(payload, &mut uncertain);
        let rates = self.resolve_rates(payload, &currency, overall, &mut uncertain);
        let (payment, raw_clauses) = self.resolve_clauses(payload);

        tracing::debug!(
            hotel = %hotel_name,
            rates = rates.len(),
            uncertain = uncertain.len(),
            "Canonical mapping complete"
        );

        CanonicalContract {
            meta: ContractMeta {
                hotel_name,
                location: None,
                country: None,
                city: None,
                language: LanguageCode::from_iso(&ingestion.language),
                currency,
                contract_id: None,
                schema_version: SCHEMA_VERSION.to_string(),
                extracted_at,
            },
            effective_period,
            rates,
            allotments: None,
            blackout_dates: None,
            commissions: None,
            charges: None,
            cancellations: None,
            payment,
            restrictions: None,
            raw_clauses: non_empty(raw_clauses),
            uncertain_fields: non_empty(uncertain),
            extras: None,
        }
    }

    fn resolve_hotel_name(
        &self,
        payload: &RawExtractionPayload,
        uncertain: &mut Vec<UncertainField>,
    ) -> String {
        match payload.hotel_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() && name != DEFAULT_HOTEL_NAME => name.to_string(),
            other => {
                uncertain.push(UncertainField {
                    path: "meta.hotelName".into(),
                    reason: if other.is_some() {
                        "Hotel name was empty or a placeholder in the extraction".into()
                    } else {
                        "Hotel name not found in the document".into()
                    },
                    confidence: 0.0,
                    alternatives: None,
                    context_text: None,
                    page_number: None,
                    suggested_value: None,
                });
                DEFAULT_HOTEL_NAME.to_string()
            }
        }
    }

    fn resolve_currency(
        &self,
        payload: &RawExtractionPayload,
        uncertain: &mut Vec<UncertainField>,
    ) -> String {
        match payload.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_uppercase(),
            _ => {
                uncertain.push(UncertainField {
                    path: "meta.currency".into(),
                    reason: "Currency not stated; defaulted".into(),
                    confidence: 0.0,
                    alternatives: None,
                    context_text: None,
                    page_number: None,
                    suggested_value: Some(serde_json::json!(DEFAULT_CURRENCY)),
                });
                DEFAULT_CURRENCY.to_string()
            }
        }
    }

    fn resolve_period(
        &self,
        payload: &RawExtractionPayload,
        uncertain: &mut Vec<UncertainField>,
    ) -> EffectivePeriod {
        let from = resolve_date(
            payload.contract_start_date.as_deref(),
            "effectivePeriod.from",
            uncertain,
        );
        let to = resolve_date(
            payload.contract_end_date.as_deref(),
            "effectivePeriod.to",
            uncertain,
        );
        EffectivePeriod {
            from,
            to,
            signing_date: None,
            renewal_date: None,
        }
    }

    fn resolve_rates(
        &self,
        payload: &RawExtractionPayload,
        contract_currency: &str,
        overall: f32,
        uncertain: &mut Vec<UncertainField>,
    ) -> Vec<Rate> {
        let mut rates: Vec<Rate> = Vec::new();
        // (room code, season, meal plan) → index into `rates`
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        // kept index → every price observed for that key, in input order
        let mut observed: BTreeMap<usize, Vec<f64>> = BTreeMap::new();

        for raw in &payload.room_rates {
            let room_type_raw = raw.room_type.clone().filter(|s| !s.trim().is_empty());
            let meal_plan_raw = raw.meal_plan.clone().filter(|s| !s.trim().is_empty());
            let season_raw = raw.season.as_deref().unwrap_or("");

            let room_type_code = normalize_room_type(room_type_raw.as_deref().unwrap_or(""));
            let season = normalize_season(season_raw);
            let meal_plan = normalize_meal_plan(meal_plan_raw.as_deref().unwrap_or(""));

            let currency = match raw.currency.as_deref().map(str::trim) {
                Some(code) if !code.is_empty() => code.to_uppercase(),
                _ => contract_currency.to_string(),
            };

            let price = coerce_price(raw.rate.as_ref());

            let key = format!(
                "{}|{}|{}",
                room_type_code.as_str(),
                season.as_str(),
                meal_plan.as_str()
            );

            if let Some(&kept) = seen.get(&key) {
                // Same canonical slot seen before: keep one rate, remember
                // the extra observation for conflict reporting.
                match price {
                    Ok(value) => observed.get_mut(&kept).expect("tracked").push(value),
                    Err(raw_value) => uncertain.push(UncertainField {
                        path: format!("rates.{kept}.price"),
                        reason: "Additional entry for this room/season/meal plan had a non-numeric rate".into(),
                        confidence: 0.0,
                        alternatives: None,
                        context_text: Some(raw_value),
                        page_number: None,
                        suggested_value: None,
                    }),
                }
                continue;
            }

            let index = rates.len();
            let price_value = match price {
                Ok(value) => value,
                Err(raw_value) => {
                    uncertain.push(UncertainField {
                        path: format!("rates.{index}.price"),
                        reason: "Rate value missing or not numeric; coerced to 0".into(),
                        confidence: 0.0,
                        alternatives: None,
                        context_text: if raw_value.is_empty() {
                            None
                        } else {
                            Some(raw_value)
                        },
                        page_number: None,
                        suggested_value: None,
                    });
                    0.0
                }
            };

            if currency != contract_currency {
                uncertain.push(UncertainField {
                    path: format!("rates.{index}.currency"),
                    reason: "Rate currency differs from the contract currency".into(),
                    confidence: overall.min(0.5),
                    alternatives: Some(vec![
                        FieldAlternative {
                            value: serde_json::json!(currency),
                            confidence: 0.6,
                        },
                        FieldAlternative {
                            value: serde_json::json!(contract_currency),
                            confidence: 0.4,
                        },
                    ]),
                    context_text: None,
                    page_number: None,
                    // The rate's own currency is the more specific value.
                    suggested_value: Some(serde_json::json!(currency)),
                });
            }

            seen.insert(key, index);
            observed.insert(index, vec![price_value]);

            rates.push(Rate {
                room_type_code,
                room_type_raw,
                season,
                date_range: None,
                price: price_value,
                price_type: PriceType::PerRoom,
                currency,
                occupancy: None,
                max_occupancy: None,
                meal_plan,
                meal_plan_raw,
                valid_from: raw.valid_from.as_deref().and_then(parse_date),
                valid_to: raw.valid_to.as_deref().and_then(parse_date),
                min_stay: None,
                max_stay: None,
                allotment: None,
                release_days: None,
                confidence: payload.confidence,
                notes: None,
            });
        }

        self.report_conflicts(&mut rates, &observed, overall, uncertain);
        rates
    }

    /// When one canonical slot accumulated diverging prices, pick the most
    /// frequent as the suggestion and only promote it into the primary field
    /// when confidence clears the bar; both values survive as alternatives
    /// either way.
    fn report_conflicts(
        &self,
        rates: &mut [Rate],
        observed: &BTreeMap<usize, Vec<f64>>,
        overall: f32,
        uncertain: &mut Vec<UncertainField>,
    ) {
        for (&index, prices) in observed {
            let distinct = distinct_prices(prices);
            if distinct.len() < 2 {
                continue;
            }

            let total = prices.len() as f32;
            let suggested = distinct
                .iter()
                .max_by(|a, b| a.1.cmp(&b.1))
                .map(|(value, _)| *value)
                .unwrap_or(prices[0]);

            let alternatives: Vec<FieldAlternative> = distinct
                .iter()
                .map(|(value, count)| FieldAlternative {
                    value: serde_json::json!(value),
                    confidence: *count as f32 / total,
                })
                .collect();

            if overall >= self.config.conflict_confidence_threshold {
                rates[index].price = suggested;
            }

            uncertain.push(UncertainField {
                path: format!("rates.{index}.price"),
                reason: "Conflicting rate values found for the same room, season and meal plan"
                    .into(),
                confidence: overall.min(0.5),
                alternatives: Some(alternatives),
                context_text: None,
                page_number: None,
                suggested_value: Some(serde_json::json!(suggested)),
            });
        }
    }

    fn resolve_clauses(
        &self,
        payload: &RawExtractionPayload,
    ) -> (Option<PaymentTerms>, Vec<RawClause>) {
        let mut clauses = Vec::new();
        let mut payment = None;

        if let Some(text) = payload
            .cancellation_policy
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            clauses.push(RawClause {
                label: "cancellationPolicy".into(),
                category: Some("cancellation".into()),
                text: text.to_string(),
                page_number: None,
                extracted_data: None,
                importance: Some(0.7),
                tags: None,
            });
        }

        if let Some(text) = payload
            .payment_terms
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            clauses.push(RawClause {
                label: "paymentTerms".into(),
                category: Some("commercial".into()),
                text: text.to_string(),
                page_number: None,
                extracted_data: None,
                importance: Some(0.6),
                tags: None,
            });

            if let Some(kind) = classify_payment_terms(text) {
                payment = Some(PaymentTerms {
                    terms: kind,
                    payment_days: match kind {
                        PaymentTermsKind::NetDays => first_number(text),
                        _ => None,
                    },
                    deposit_required: None,
                    deposit_percentage: None,
                    deposit_deadline_days: match kind {
                        PaymentTermsKind::DepositRequired | PaymentTermsKind::PrePayment => {
                            first_number(text)
                        }
                        _ => None,
                    },
                    payment_methods: None,
                    currency: None,
                    notes: Some(text.to_string()),
                });
            }
        }

        (payment, clauses)
    }
}

/// Coerce a JSON rate value to f64. Numbers pass through; numeric strings
/// (tolerating thousands separators) parse. Anything else is an error
/// carrying the raw rendering for the uncertain-field context.
fn coerce_price(value: Option<&serde_json::Value>) -> Result<f64, String> {
    match value {
        None | Some(serde_json::Value::Null) => Err(String::new()),
        Some(serde_json::Value::Number(n)) => n.as_f64().ok_or_else(|| n.to_string()),
        Some(serde_json::Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse::<f64>().map_err(|_| s.clone())
        }
        Some(other) => Err(other.to_string()),
    }
}

/// Distinct prices with occurrence counts, in first-seen order.
fn distinct_prices(prices: &[f64]) -> Vec<(f64, usize)> {
    let mut out: Vec<(f64, usize)> = Vec::new();
    for &price in prices {
        match out.iter_mut().find(|(v, _)| (*v - price).abs() < f64::EPSILON) {
            Some((_, count)) => *count += 1,
            None => out.push((price, 1)),
        }
    }
    out
}

fn resolve_date(
    raw: Option<&str>,
    path: &str,
    uncertain: &mut Vec<UncertainField>,
) -> Option<NaiveDate> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => match parse_date(text) {
            Some(date) => Some(date),
            None => {
                uncertain.push(UncertainField {
                    path: path.to_string(),
                    reason: "Date string could not be parsed".into(),
                    confidence: 0.0,
                    alternatives: None,
                    context_text: Some(text.to_string()),
                    page_number: None,
                    suggested_value: None,
                });
                None
            }
        },
        _ => {
            uncertain.push(UncertainField {
                path: path.to_string(),
                reason: "Date not stated in the document".into(),
                confidence: 0.0,
                alternatives: None,
                context_text: None,
                page_number: None,
                suggested_value: None,
            });
            None
        }
    }
}

/// Parse a date string: ISO first, then the day-first and US formats hotel
/// contracts commonly use. ISO datetimes are accepted by their date prefix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%d %B %Y",
        "%B %d, %Y",
    ];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // ISO datetime: use the date prefix
    if trimmed.len() > 10 && trimmed.as_bytes().get(10) == Some(&b'T') {
        if let Ok(date) = NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }

    None
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealPlanCode, RoomTypeCode, Season};
    use crate::pipeline::ingest::{
        ExtractionMethod, FileKind, IngestionMetadata, IngestionResult,
    };
    use crate::pipeline::normalize::RawRoomRate;
    use chrono::TimeZone;

    fn ingestion() -> IngestionResult {
        IngestionResult {
            file_type: FileKind::Pdf,
            language: "en".into(),
            page_count: 1,
            pages: vec![],
            text: "contract text".into(),
            tables: vec![],
            extraction_method: ExtractionMethod::TextParsing,
            confidence: 0.9,
            metadata: IngestionMetadata {
                file_name: "contract.pdf".into(),
                file_size: 1000,
                mime_type: "application/pdf".into(),
                extraction_duration_ms: 3,
                extraction_errors: vec![],
            },
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
    }

    fn rate(room: &str, season: &str, price: serde_json::Value, meal: &str) -> RawRoomRate {
        RawRoomRate {
            room_type: Some(room.into()),
            season: Some(season.into()),
            rate: Some(price),
            meal_plan: Some(meal.into()),
            currency: None,
            valid_from: None,
            valid_to: None,
        }
    }

    fn payload() -> RawExtractionPayload {
        RawExtractionPayload {
            hotel_name: Some("Grand Sapphire Resort & Spa".into()),
            contract_start_date: Some("2026-03-01".into()),
            contract_end_date: Some("2027-02-28".into()),
            currency: Some("EUR".into()),
            cancellation_policy: Some("Free cancellation up to 14 days before arrival.".into()),
            payment_terms: Some("Net 30 days from invoice date".into()),
            room_rates: vec![
                rate("Superior Double", "High", serde_json::json!(195), "BB"),
                rate("Deluxe Suite", "Peak", serde_json::json!("450"), "Half Board"),
            ],
            confidence: Some(0.94),
        }
    }

    #[test]
    fn maps_complete_payload() {
        let mapper = ContractMapper::default();
        let contract = mapper.canonicalize(&payload(), &ingestion(), ts());

        assert_eq!(contract.meta.hotel_name, "Grand Sapphire Resort & Spa");
        assert_eq!(contract.meta.currency, "EUR");
        assert_eq!(contract.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(contract.meta.language, LanguageCode::En);
        assert_eq!(
            contract.effective_period.from,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );

        assert_eq!(contract.rates.len(), 2);
        assert_eq!(contract.rates[0].room_type_code, RoomTypeCode::Double);
        assert_eq!(contract.rates[0].season, Season::High);
        assert_eq!(contract.rates[0].meal_plan, MealPlanCode::Bb);
        assert!((contract.rates[0].price - 195.0).abs() < f64::EPSILON);
        // Numeric-string rate coerces
        assert!((contract.rates[1].price - 450.0).abs() < f64::EPSILON);
        assert_eq!(contract.rates[1].meal_plan, MealPlanCode::Hb);
        // Raw originals preserved
        assert_eq!(
            contract.rates[1].room_type_raw.as_deref(),
            Some("Deluxe Suite")
        );
        assert_eq!(
            contract.rates[1].meal_plan_raw.as_deref(),
            Some("Half Board")
        );

        assert!(contract.uncertain_fields.is_none());
        assert_eq!(contract.payment.as_ref().unwrap().terms, PaymentTermsKind::NetDays);
        assert_eq!(contract.payment.as_ref().unwrap().payment_days, Some(30));
        assert_eq!(contract.raw_clauses.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn non_numeric_rate_coerces_to_zero_with_uncertain_field() {
        let mut p = payload();
        p.room_rates = vec![rate(
            "Twin",
            "Low",
            serde_json::json!("not-a-number"),
            "RO",
        )];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        assert!((contract.rates[0].price - 0.0).abs() < f64::EPSILON);
        let uncertain = contract.uncertain_fields.unwrap();
        assert_eq!(uncertain.len(), 1);
        assert_eq!(uncertain[0].path, "rates.0.price");
        assert_eq!(uncertain[0].context_text.as_deref(), Some("not-a-number"));
    }

    #[test]
    fn missing_rate_value_also_flags() {
        let mut p = payload();
        p.room_rates = vec![RawRoomRate {
            room_type: Some("Single".into()),
            season: Some("Low".into()),
            rate: None,
            meal_plan: Some("BB".into()),
            currency: None,
            valid_from: None,
            valid_to: None,
        }];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());
        assert!((contract.rates[0].price - 0.0).abs() < f64::EPSILON);
        assert!(contract.uncertain_fields.is_some());
    }

    #[test]
    fn conflicting_duplicate_rates_keep_both_alternatives() {
        let mut p = payload();
        p.confidence = Some(0.4); // below promotion threshold
        p.room_rates = vec![
            rate("Double", "High", serde_json::json!(150), "BB"),
            rate("Double", "High", serde_json::json!(180), "BB"),
            rate("Double", "High", serde_json::json!(180), "BB"),
        ];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        // One rate survives for the slot
        assert_eq!(contract.rates.len(), 1);
        // Below threshold: first-seen value stays primary
        assert!((contract.rates[0].price - 150.0).abs() < f64::EPSILON);

        let uncertain = contract.uncertain_fields.unwrap();
        let conflict = uncertain
            .iter()
            .find(|u| u.path == "rates.0.price")
            .unwrap();
        let alternatives = conflict.alternatives.as_ref().unwrap();
        assert_eq!(alternatives.len(), 2);
        // Frequency-weighted confidences
        assert!((alternatives[0].confidence - 1.0 / 3.0).abs() < 0.01);
        assert!((alternatives[1].confidence - 2.0 / 3.0).abs() < 0.01);
        // Higher-frequency value suggested, not silently written
        assert_eq!(conflict.suggested_value, Some(serde_json::json!(180.0)));
    }

    #[test]
    fn conflict_promotes_suggestion_when_confident() {
        let mut p = payload();
        p.confidence = Some(0.9); // above threshold
        p.room_rates = vec![
            rate("Double", "High", serde_json::json!(150), "BB"),
            rate("Double", "High", serde_json::json!(180), "BB"),
            rate("Double", "High", serde_json::json!(180), "BB"),
        ];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());
        assert!((contract.rates[0].price - 180.0).abs() < f64::EPSILON);
        // The conflict is still recorded
        assert!(contract.uncertain_fields.is_some());
    }

    #[test]
    fn identical_duplicates_collapse_without_conflict() {
        let mut p = payload();
        p.room_rates = vec![
            rate("Double", "High", serde_json::json!(150), "BB"),
            rate("Double", "High", serde_json::json!(150), "BB"),
        ];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());
        assert_eq!(contract.rates.len(), 1);
        assert!(contract.uncertain_fields.is_none());
    }

    #[test]
    fn empty_hotel_name_defaults_and_flags() {
        let mut p = payload();
        p.hotel_name = Some("".into());
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        assert_eq!(contract.meta.hotel_name, DEFAULT_HOTEL_NAME);
        let uncertain = contract.uncertain_fields.unwrap();
        assert!(uncertain.iter().any(|u| u.path == "meta.hotelName"));
    }

    #[test]
    fn missing_currency_defaults_and_flags() {
        let mut p = payload();
        p.currency = Some("  ".into());
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        assert_eq!(contract.meta.currency, DEFAULT_CURRENCY);
        let uncertain = contract.uncertain_fields.unwrap();
        assert!(uncertain.iter().any(|u| u.path == "meta.currency"));
    }

    #[test]
    fn unparsable_dates_flag_instead_of_failing() {
        let mut p = payload();
        p.contract_start_date = Some("sometime in spring".into());
        p.contract_end_date = None;
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        assert!(contract.effective_period.from.is_none());
        assert!(contract.effective_period.to.is_none());
        let uncertain = contract.uncertain_fields.unwrap();
        assert!(uncertain.iter().any(|u| u.path == "effectivePeriod.from"));
        assert!(uncertain.iter().any(|u| u.path == "effectivePeriod.to"));
    }

    #[test]
    fn rate_currency_divergence_is_recorded() {
        let mut p = payload();
        p.room_rates = vec![RawRoomRate {
            currency: Some("USD".into()),
            ..rate("Double", "High", serde_json::json!(150), "BB")
        }];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());

        assert_eq!(contract.rates[0].currency, "USD");
        let uncertain = contract.uncertain_fields.unwrap();
        let entry = uncertain
            .iter()
            .find(|u| u.path == "rates.0.currency")
            .unwrap();
        assert_eq!(entry.suggested_value, Some(serde_json::json!("USD")));
        assert_eq!(entry.alternatives.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let mapper = ContractMapper::default();
        let p = payload();
        let i = ingestion();
        let when = ts();

        let first = mapper.canonicalize(&p, &i, when);
        let second = mapper.canonicalize(&p, &i, when);
        assert_eq!(first, second);

        let a = serde_json::to_vec(&first).unwrap();
        let b = serde_json::to_vec(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rate_validity_window_parses() {
        let mut p = payload();
        p.room_rates = vec![RawRoomRate {
            valid_from: Some("2026-06-01".into()),
            valid_to: Some("2026-08-31".into()),
            ..rate("Double", "High", serde_json::json!(195), "BB")
        }];
        let contract = ContractMapper::default().canonicalize(&p, &ingestion(), ts());
        assert_eq!(
            contract.rates[0].valid_from,
            NaiveDate::from_ymd_opt(2026, 6, 1)
        );
        assert_eq!(
            contract.rates[0].valid_to,
            NaiveDate::from_ymd_opt(2026, 8, 31)
        );
    }

    #[test]
    fn date_formats_accepted() {
        assert_eq!(parse_date("2026-03-01"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(parse_date("2026/03/01"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(parse_date("01/03/2026"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(parse_date("01.03.2026"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(parse_date("1 March 2026"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(parse_date("March 1, 2026"), NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(
            parse_date("2026-03-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(parse_date("spring"), None);
    }

    #[test]
    fn price_coercion_cases() {
        assert_eq!(coerce_price(Some(&serde_json::json!(150))), Ok(150.0));
        assert_eq!(coerce_price(Some(&serde_json::json!(150.5))), Ok(150.5));
        assert_eq!(coerce_price(Some(&serde_json::json!("150.5"))), Ok(150.5));
        assert_eq!(coerce_price(Some(&serde_json::json!("1,250"))), Ok(1250.0));
        assert_eq!(coerce_price(Some(&serde_json::json!("EUR 90"))), Ok(90.0));
        assert!(coerce_price(Some(&serde_json::json!("free"))).is_err());
        assert!(coerce_price(None).is_err());
        assert!(coerce_price(Some(&serde_json::Value::Null)).is_err());
        assert!(coerce_price(Some(&serde_json::json!(["x"]))).is_err());
    }
}
