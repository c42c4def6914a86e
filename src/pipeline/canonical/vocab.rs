//! Declarative free-text → closed-vocabulary mapping tables.
//!
//! One table per enum: (folded source pattern, canonical tag). Matching is
//! case-insensitive and ignores separators; each table carries an explicit
//! fallback so normalization is total over arbitrary input.

use crate::models::{MealPlanCode, PaymentTermsKind, RoomTypeCode, Season};

const SEASON_TABLE: &[(&str, Season)] = &[
    ("low", Season::Low),
    ("mid", Season::Mid),
    ("middle", Season::Mid),
    ("shoulder", Season::Shoulder),
    ("high", Season::High),
    ("peak", Season::Peak),
    ("top", Season::Peak),
    ("yearround", Season::YearRound),
    ("allyear", Season::YearRound),
    ("annual", Season::YearRound),
    ("christmas", Season::Christmas),
    ("festive", Season::Christmas),
    ("newyear", Season::Christmas),
    ("easter", Season::Easter),
];

const MEAL_PLAN_TABLE: &[(&str, MealPlanCode)] = &[
    ("ro", MealPlanCode::Ro),
    ("roomonly", MealPlanCode::Ro),
    ("ep", MealPlanCode::Ro),
    ("europeanplan", MealPlanCode::Ro),
    ("bb", MealPlanCode::Bb),
    ("bedbreakfast", MealPlanCode::Bb),
    ("bedandbreakfast", MealPlanCode::Bb),
    ("breakfast", MealPlanCode::Bb),
    ("hb", MealPlanCode::Hb),
    ("halfboard", MealPlanCode::Hb),
    ("halfpension", MealPlanCode::Hb),
    ("map", MealPlanCode::Hb),
    ("fb", MealPlanCode::Fb),
    ("fullboard", MealPlanCode::Fb),
    ("fullpension", MealPlanCode::Fb),
    ("ai", MealPlanCode::Ai),
    ("allinclusive", MealPlanCode::Ai),
    ("allin", MealPlanCode::Ai),
];

/// Room-type keywords checked by containment, most specific first, so
/// "Superior Double Room" lands on DOUBLE and "Junior Suite" on SUITE.
const ROOM_TYPE_TABLE: &[(&str, RoomTypeCode)] = &[
    ("villa", RoomTypeCode::Villa),
    ("apartment", RoomTypeCode::Apartment),
    ("apt", RoomTypeCode::Apartment),
    ("studio", RoomTypeCode::Apartment),
    ("suite", RoomTypeCode::Suite),
    ("triple", RoomTypeCode::Triple),
    ("trpl", RoomTypeCode::Triple),
    ("twin", RoomTypeCode::Twin),
    ("double", RoomTypeCode::Double),
    ("dbl", RoomTypeCode::Double),
    ("single", RoomTypeCode::Single),
    ("sgl", RoomTypeCode::Single),
];

const PAYMENT_TERMS_TABLE: &[(&str, PaymentTermsKind)] = &[
    ("net", PaymentTermsKind::NetDays),
    ("invoice", PaymentTermsKind::NetDays),
    ("onarrival", PaymentTermsKind::PaymentOnArrival),
    ("atarrival", PaymentTermsKind::PaymentOnArrival),
    ("uponarrival", PaymentTermsKind::PaymentOnArrival),
    ("checkin", PaymentTermsKind::PaymentOnArrival),
    ("deposit", PaymentTermsKind::DepositRequired),
    ("prepayment", PaymentTermsKind::PrePayment),
    ("prepaid", PaymentTermsKind::PrePayment),
    ("inadvance", PaymentTermsKind::PrePayment),
];

/// Lowercase and drop everything that is not a letter or digit, so "Low",
/// "low-season" and "LOW SEASON" fold to the same key.
fn fold(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Fold a season value, additionally dropping the redundant "season" word.
fn fold_season(raw: &str) -> String {
    let folded = fold(raw);
    folded
        .strip_suffix("season")
        .map(str::to_string)
        .unwrap_or(folded)
}

/// Map a free-text season onto the closed vocabulary. Unrecognized input
/// yields `Year_round`.
pub fn normalize_season(raw: &str) -> Season {
    let key = fold_season(raw);
    SEASON_TABLE
        .iter()
        .find(|(pattern, _)| *pattern == key)
        .map(|(_, season)| *season)
        .unwrap_or(Season::YearRound)
}

/// Map a free-text meal plan onto the closed vocabulary. Unrecognized input
/// falls back to room-only.
pub fn normalize_meal_plan(raw: &str) -> MealPlanCode {
    let key = fold(raw);
    MEAL_PLAN_TABLE
        .iter()
        .find(|(pattern, _)| *pattern == key)
        .map(|(_, plan)| *plan)
        .unwrap_or(MealPlanCode::Ro)
}

/// Map a free-text room type onto the closed vocabulary by keyword
/// containment. Unrecognized input yields `OTHER`.
pub fn normalize_room_type(raw: &str) -> RoomTypeCode {
    let key = fold(raw);
    ROOM_TYPE_TABLE
        .iter()
        .find(|(pattern, _)| key.contains(pattern))
        .map(|(_, code)| *code)
        .unwrap_or(RoomTypeCode::Other)
}

/// Classify free-text payment terms. Returns `None` when the text matches no
/// known pattern — payment terms have no safe default, the raw clause is
/// preserved instead.
pub fn classify_payment_terms(raw: &str) -> Option<PaymentTermsKind> {
    let key = fold(raw);
    PAYMENT_TERMS_TABLE
        .iter()
        .find(|(pattern, _)| key.contains(pattern))
        .map(|(_, kind)| *kind)
}

/// First integer appearing in a text, e.g. the 30 of "Net 30 days".
pub fn first_number(text: &str) -> Option<u32> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    digits.parse().ok()
}
