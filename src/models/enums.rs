use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
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

            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
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
    };
}

str_enum!(CrossTabAxis {
    AgeGroup => "age_group",
    Gender => "gender",
});

str_enum!(ViewName {
    Summary => "summary",
    Patients => "patients",
    Appointments => "appointments",
    History => "history",
    AgeHistogram => "age_histogram",
    Upcoming => "upcoming",
    DailyLoad => "daily_load",
    Conditions => "conditions",
    CrossTab => "crosstab",
    TopDoctors => "top_doctors",
    WeeklyTrend => "weekly_trend",
    Heatmap => "heatmap",
    Search => "search",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn crosstab_axis_round_trip() {
        for (variant, s) in [
            (CrossTabAxis::AgeGroup, "age_group"),
            (CrossTabAxis::Gender, "gender"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(CrossTabAxis::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn every_view_name_parses_back() {
        for view in ViewName::all() {
            assert_eq!(ViewName::from_str(view.as_str()).unwrap(), *view);
        }
    }

    #[test]
    fn serializes_as_str_form() {
        assert_eq!(
            serde_json::to_string(&CrossTabAxis::AgeGroup).unwrap(),
            "\"age_group\""
        );
        assert_eq!(serde_json::to_string(&ViewName::CrossTab).unwrap(), "\"crosstab\"");
        let parsed: ViewName = serde_json::from_str("\"top_doctors\"").unwrap();
        assert_eq!(parsed, ViewName::TopDoctors);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(CrossTabAxis::from_str("income").is_err());
        assert!(ViewName::from_str("").is_err());
        match ViewName::from_str("pie_chart") {
            Err(DatabaseError::InvalidEnum { field, value }) => {
                assert_eq!(field, "ViewName");
                assert_eq!(value, "pie_chart");
            }
            other => panic!("Expected InvalidEnum, got {other:?}"),
        }
    }
}
