use crate::db::DatabaseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde goes through the same string form so JSON and SQLite agree.
macro_rules! str_enum {
    ($name:ident { $($(#[$attr:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($(#[$attr])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(MedicationStatus {
    #[default]
    Pending => "pending",
    Taken => "taken",
    Skipped => "skipped",
});

// Display labels only; scheduling never looks at frequency.
str_enum!(Frequency {
    #[default]
    OnceDaily => "Once daily",
    TwiceDaily => "Twice daily",
    ThreeTimesDaily => "Three times daily",
    EveryOtherDay => "Every other day",
    Weekly => "Weekly",
    AsNeeded => "As needed",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn medication_status_round_trip() {
        for (variant, s) in [
            (MedicationStatus::Pending, "pending"),
            (MedicationStatus::Taken, "taken"),
            (MedicationStatus::Skipped, "skipped"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MedicationStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn frequency_labels_parse() {
        for f in Frequency::ALL {
            assert_eq!(Frequency::from_str(f.as_str()).unwrap(), *f);
        }
        assert_eq!(Frequency::ALL.len(), 6);
    }

    #[test]
    fn invalid_enum_value() {
        let err = MedicationStatus::from_str("forgotten").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
        assert!(Frequency::from_str("once daily").is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(MedicationStatus::default(), MedicationStatus::Pending);
        assert_eq!(Frequency::default(), Frequency::OnceDaily);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Frequency::ThreeTimesDaily).unwrap();
        assert_eq!(json, "\"Three times daily\"");
        let status: MedicationStatus = serde_json::from_str("\"skipped\"").unwrap();
        assert_eq!(status, MedicationStatus::Skipped);
        assert!(serde_json::from_str::<MedicationStatus>("\"Skipped\"").is_err());
    }
}
