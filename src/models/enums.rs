use crate::db::DatabaseError;

/// Macro to generate an enum with as_str + FromStr, serialised over the
/// wire (and into SQLite) as its string form.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
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

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// Fixed enumeration shown in the medication form. The strings are the
// user-facing labels and double as the persisted values.
str_enum!(FrequencyType {
    OnceDaily => "Once daily",
    TwiceDaily => "Twice daily",
    ThreeTimesDaily => "Three times daily",
    FourTimesDaily => "Four times daily",
    WithMeals => "With meals",
    BeforeMeals => "Before meals",
});

str_enum!(MedicationForm {
    Tablet => "tablet",
    Capsule => "capsule",
    Liquid => "liquid",
    Injection => "injection",
    Inhaler => "inhaler",
    Topical => "topical",
    Drops => "drops",
    Other => "other",
});

/// What the user did about a scheduled dose.
str_enum!(DoseAction {
    Taken => "taken",
    Snoozed => "snoozed",
    Skipped => "skipped",
    Missed => "missed",
});

/// Derived classification of a dose relative to its schedule.
str_enum!(DoseStatus {
    Pending => "PENDING",
    OnTime => "ON_TIME",
    Late => "LATE",
    Missed => "MISSED",
});

str_enum!(Theme {
    System => "system",
    Light => "light",
    Dark => "dark",
});
