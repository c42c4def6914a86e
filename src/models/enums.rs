use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The literal doubles as the serde wire name, so serialized contracts carry
/// the canonical vocabulary spelling exactly.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Season {
    Low => "Low",
    Mid => "Mid",
    High => "High",
    Peak => "Peak",
    YearRound => "Year_round",
    Christmas => "Christmas",
    Easter => "Easter",
    Shoulder => "Shoulder",
    Custom => "Custom",
});

str_enum!(RoomTypeCode {
    Single => "SINGLE",
    Double => "DOUBLE",
    Twin => "TWIN",
    Triple => "TRIPLE",
    Suite => "SUITE",
    Apartment => "APARTMENT",
    Villa => "VILLA",
    Other => "OTHER",
});

str_enum!(MealPlanCode {
    Ro => "RO",
    Bb => "BB",
    Hb => "HB",
    Fb => "FB",
    Ai => "AI",
    Custom => "CUSTOM",
});

str_enum!(PriceType {
    PerRoom => "PER_ROOM",
    PerPerson => "PER_PERSON",
    PerNight => "PER_NIGHT",
    PerStay => "PER_STAY",
    Custom => "CUSTOM",
});

str_enum!(ChargeType {
    PerPersonPerNight => "PER_PERSON_PER_NIGHT",
    PerRoomPerNight => "PER_ROOM_PER_NIGHT",
    PerStay => "PER_STAY",
    Percentage => "PERCENTAGE",
    Fixed => "FIXED",
    Custom => "CUSTOM",
});

str_enum!(CommissionType {
    Percent => "PERCENT",
    Fixed => "FIXED",
    PerPerson => "PER_PERSON",
    PerNight => "PER_NIGHT",
    Custom => "CUSTOM",
});

str_enum!(CommissionBase {
    Total => "TOTAL",
    RoomRate => "ROOM_RATE",
    NetRate => "NET_RATE",
    Custom => "CUSTOM",
});

str_enum!(CommissionSchedule {
    Monthly => "MONTHLY",
    Quarterly => "QUARTERLY",
    UponBooking => "UPON_BOOKING",
    UponPayment => "UPON_PAYMENT",
});

str_enum!(CancellationPenaltyType {
    Nights => "NIGHTS",
    Percentage => "PERCENTAGE",
    Fixed => "FIXED",
    NoShow => "NO_SHOW",
    Custom => "CUSTOM",
});

str_enum!(PaymentMethod {
    BankTransfer => "BANK_TRANSFER",
    CreditCard => "CREDIT_CARD",
    Cheque => "CHEQUE",
    Cash => "CASH",
    DirectDebit => "DIRECT_DEBIT",
});

str_enum!(PaymentTermsKind {
    NetDays => "NET_DAYS",
    PaymentOnArrival => "PAYMENT_ON_ARRIVAL",
    DepositRequired => "DEPOSIT_REQUIRED",
    PrePayment => "PRE_PAYMENT",
});

str_enum!(LanguageCode {
    En => "EN",
    Es => "ES",
    Fr => "FR",
    De => "DE",
    It => "IT",
    Pt => "PT",
    Ru => "RU",
    Zh => "ZH",
    Ja => "JA",
    Ar => "AR",
    Other => "OTHER",
});

impl LanguageCode {
    /// Map a lowercase ISO-639-1 tag (as produced by the language detector)
    /// onto the canonical vocabulary. Unknown tags become `Other`.
    pub fn from_iso(tag: &str) -> Self {
        match tag {
            "en" => Self::En,
            "es" => Self::Es,
            "fr" => Self::Fr,
            "de" => Self::De,
            "it" => Self::It,
            "pt" => Self::Pt,
            "ru" => Self::Ru,
            "zh" => Self::Zh,
            "ja" => Self::Ja,
            "ar" => Self::Ar,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn season_round_trips_through_str() {
        for season in [
            Season::Low,
            Season::Mid,
            Season::High,
            Season::Peak,
            Season::YearRound,
            Season::Christmas,
            Season::Easter,
            Season::Shoulder,
            Season::Custom,
        ] {
            assert_eq!(Season::from_str(season.as_str()).unwrap(), season);
        }
    }

    #[test]
    fn year_round_wire_spelling() {
        assert_eq!(Season::YearRound.as_str(), "Year_round");
        let json = serde_json::to_string(&Season::YearRound).unwrap();
        assert_eq!(json, "\"Year_round\"");
    }

    #[test]
    fn meal_plan_serializes_as_code() {
        let json = serde_json::to_string(&MealPlanCode::Bb).unwrap();
        assert_eq!(json, "\"BB\"");
        let parsed: MealPlanCode = serde_json::from_str("\"AI\"").unwrap();
        assert_eq!(parsed, MealPlanCode::Ai);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = RoomTypeCode::from_str("PENTHOUSE").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn language_from_iso_known_and_unknown() {
        assert_eq!(LanguageCode::from_iso("en"), LanguageCode::En);
        assert_eq!(LanguageCode::from_iso("ru"), LanguageCode::Ru);
        assert_eq!(LanguageCode::from_iso("nl"), LanguageCode::Other);
        assert_eq!(LanguageCode::from_iso(""), LanguageCode::Other);
    }

    #[test]
    fn payment_terms_wire_names() {
        assert_eq!(PaymentTermsKind::NetDays.as_str(), "NET_DAYS");
        assert_eq!(
            serde_json::to_string(&PaymentTermsKind::PaymentOnArrival).unwrap(),
            "\"PAYMENT_ON_ARRIVAL\""
        );
    }
}
