use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{
    CancellationPenaltyType, ChargeType, CommissionBase, CommissionSchedule, CommissionType,
    LanguageCode, MealPlanCode, PaymentMethod, PaymentTermsKind, PriceType, RoomTypeCode, Season,
};

/// Schema version stamped into every canonical record. Additive changes bump
/// the minor component so older readers keep working.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// The canonical contract record — the system's output of record.
///
/// Every enum-typed field holds only closed-vocabulary values; the free-text
/// originals are preserved alongside in `*Raw` sibling fields. Serializes to
/// the documented camelCase JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalContract {
    pub meta: ContractMeta,
    pub effective_period: EffectivePeriod,
    pub rates: Vec<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotments: Option<Vec<Allotment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackout_dates: Option<Vec<BlackoutDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commissions: Option<Vec<Commission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<Charge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellations: Option<Vec<CancellationPolicy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentTerms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_clauses: Option<Vec<RawClause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain_fields: Option<Vec<UncertainField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Core contract identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMeta {
    pub hotel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub language: LanguageCode,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    pub schema_version: String,
    pub extracted_at: DateTime<Utc>,
}

/// When the contract applies. `from`/`to` are serialized even when unknown so
/// readers always see the group; unknown dates surface as uncertain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePeriod {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// One room rate with full dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub room_type_code: RoomTypeCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type_raw: Option<String>,
    pub season: Season,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub price: f64,
    pub price_type: PriceType,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_occupancy: Option<u32>,
    pub meal_plan: MealPlanCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotment: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Guaranteed room block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allotment {
    pub room_type_code: RoomTypeCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type_raw: Option<String>,
    pub season: Season,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub allotment: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Period during which bookings are not accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutDate {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_room_types: Option<Vec<RoomTypeCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_seasons: Option<Vec<Season>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Agent / tour-operator commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    #[serde(rename = "type")]
    pub kind: CommissionType,
    pub value: f64,
    pub applies_to: CommissionBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_frequency: Option<CommissionSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Mandatory or optional fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChargeType,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_person: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_night: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_stay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<bool>,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_room_types: Option<Vec<RoomTypeCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_seasons: Option<Vec<Season>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One step of a cancellation penalty structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_before: Option<u32>,
    pub penalty_type: CancellationPenaltyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_room_types: Option<Vec<RoomTypeCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to_seasons: Option<Vec<Season>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_show_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_departure_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_cancellation_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Financial settlement terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    pub terms: PaymentTermsKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_required: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_deadline_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<Vec<PaymentMethod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Booking constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stay_nights: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stay_nights: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_alone_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Free-form contract text kept verbatim for reference and review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClause {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A field the mapper could not fill with high confidence — either two
/// plausible values were found, or a required field was filled by a
/// default/placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncertainField {
    /// Dotted locator into the canonical record, e.g. `rates.0.price`.
    pub path: String,
    pub reason: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<FieldAlternative>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAlternative {
    pub value: serde_json::Value,
    pub confidence: f32,
}
