use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::types::{Money, PeriodIndex};

/// Fixed cost of goods sold: a base amount plus sparse step changes.
///
/// `overrides` maps a trigger period to the amount that applies from that
/// period onward, until a later trigger replaces it. Period 0 always reports
/// `initial_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostSchedule {
    pub initial_value: Money,
    #[serde(
        default,
        alias = "changes",
        deserialize_with = "deserialize_overrides",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub overrides: BTreeMap<u32, Money>,
}

impl FixedCostSchedule {
    /// Fixed cost in force at `period`: the override with the largest trigger
    /// period <= `period`, else the initial value.
    pub fn value_at(&self, period: PeriodIndex) -> Money {
        if period == 0 {
            return self.initial_value;
        }
        let period = u32::try_from(period).unwrap_or(u32::MAX);
        self.overrides
            .range(..=period)
            .next_back()
            .map(|(_, value)| *value)
            .unwrap_or(self.initial_value)
    }
}

/// Override keys may be written as integers (`5`), numeric strings (`"5"`,
/// which is how JSON object keys arrive) or `period_5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TriggerPeriod(u32);

impl<'de> Deserialize<'de> for TriggerPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TriggerVisitor;

        impl Visitor<'_> for TriggerVisitor {
            type Value = TriggerPeriod;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a period index such as 5 or \"period_5\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TriggerPeriod, E> {
                u32::try_from(v)
                    .map(TriggerPeriod)
                    .map_err(|_| E::custom(format!("period index {v} is too large")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TriggerPeriod, E> {
                if v < 0 {
                    return Err(E::custom(format!("period index must be >= 0, got {v}")));
                }
                self.visit_u64(v as u64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TriggerPeriod, E> {
                let digits = v.trim().strip_prefix("period_").unwrap_or(v.trim());
                digits
                    .parse::<u32>()
                    .map(TriggerPeriod)
                    .map_err(|_| E::custom(format!("invalid override period key '{v}'")))
            }
        }

        deserializer.deserialize_any(TriggerVisitor)
    }
}

fn deserialize_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Money>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OverridesVisitor;

    impl<'de> Visitor<'de> for OverridesVisitor {
        type Value = BTreeMap<u32, Money>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of trigger period to fixed cost")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeMap::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut overrides = BTreeMap::new();
            while let Some((TriggerPeriod(period), value)) =
                access.next_entry::<TriggerPeriod, Money>()?
            {
                if overrides.insert(period, value).is_some() {
                    return Err(de::Error::custom(format!(
                        "duplicate override for period {period}"
                    )));
                }
            }
            Ok(overrides)
        }
    }

    deserializer.deserialize_any(OverridesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn schedule(overrides: &[(u32, Money)]) -> FixedCostSchedule {
        FixedCostSchedule {
            initial_value: dec!(30000),
            overrides: overrides.iter().copied().collect(),
        }
    }

    #[test]
    fn test_no_overrides_keeps_initial_value() {
        let s = schedule(&[]);
        for p in 0..12 {
            assert_eq!(s.value_at(p), dec!(30000));
        }
    }

    #[test]
    fn test_latest_trigger_wins() {
        let s = schedule(&[(5, dec!(35000)), (8, dec!(40000))]);
        for p in 0..5 {
            assert_eq!(s.value_at(p), dec!(30000), "period {p}");
        }
        assert_eq!(s.value_at(5), dec!(35000));
        assert_eq!(s.value_at(6), dec!(35000));
        assert_eq!(s.value_at(7), dec!(35000));
        assert_eq!(s.value_at(8), dec!(40000));
        assert_eq!(s.value_at(9), dec!(40000));
    }

    #[test]
    fn test_period_zero_ignores_zero_trigger() {
        let s = schedule(&[(0, dec!(1))]);
        assert_eq!(s.value_at(0), dec!(30000));
        assert_eq!(s.value_at(1), dec!(1));
    }

    #[test]
    fn test_yaml_accepts_integer_and_prefixed_keys() {
        let yaml = "initial_value: 30000\nchanges:\n  period_5: 35000\n  8: 40000\n";
        let s: FixedCostSchedule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.overrides.get(&5), Some(&dec!(35000)));
        assert_eq!(s.overrides.get(&8), Some(&dec!(40000)));
    }

    #[test]
    fn test_json_string_keys() {
        let json = r#"{"initial_value": 30000, "overrides": {"5": 35000}}"#;
        let s: FixedCostSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(s.value_at(6), dec!(35000));
    }

    #[test]
    fn test_missing_overrides_default_to_empty() {
        let s: FixedCostSchedule = serde_json::from_str(r#"{"initial_value": 30000}"#).unwrap();
        assert!(s.overrides.is_empty());
    }

    #[test]
    fn test_bad_override_key_rejected() {
        let json = r#"{"initial_value": 30000, "overrides": {"month_five": 35000}}"#;
        let err = serde_json::from_str::<FixedCostSchedule>(json).unwrap_err();
        assert!(err.to_string().contains("month_five"));
    }
}
