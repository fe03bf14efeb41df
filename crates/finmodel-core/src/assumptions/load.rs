use std::fs;
use std::path::Path;

use crate::assumptions::AssumptionSet;
use crate::error::ModelError;
use crate::ModelResult;

/// Parse an assumption set from YAML text.
pub fn from_yaml_str(contents: &str) -> ModelResult<AssumptionSet> {
    Ok(serde_yaml::from_str(contents)?)
}

/// Parse an assumption set from JSON text.
pub fn from_json_str(contents: &str) -> ModelResult<AssumptionSet> {
    serde_json::from_str(contents).map_err(|e| ModelError::ConfigParse(e.to_string()))
}

/// Read an assumption file. `.yaml` / `.yml` are parsed as YAML, anything
/// else as JSON.
pub fn from_path(path: &Path) -> ModelResult<AssumptionSet> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ModelError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        from_yaml_str(&contents)
    } else {
        from_json_str(&contents)
    };

    parsed.map_err(|e| match e {
        ModelError::ConfigParse(msg) => {
            ModelError::ConfigParse(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FIXTURE: &str = include_str!("../../tests/fixtures/client_config.yaml");

    #[test]
    fn test_fixture_parses() {
        let a = from_yaml_str(FIXTURE).unwrap();
        assert_eq!(a.model_settings.num_periods, 12);
        assert_eq!(a.revenue_streams.len(), 4);
        assert_eq!(a.revenue_streams[0].initial_value, dec!(50000));
        assert_eq!(a.revenue_streams[3].growth_rate, dec!(1.0002));
        assert_eq!(a.cost_structure.fixed_costs.overrides.get(&5), Some(&dec!(35000)));
    }

    #[test]
    fn test_json_round_trip_of_fixture() {
        let a = from_yaml_str(FIXTURE).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        let b = from_json_str(&json).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_key_is_named() {
        let yaml = FIXTURE.replace("  ga_expenses: 27895\n", "");
        let err = from_yaml_str(&yaml).unwrap_err();
        match err {
            ModelError::ConfigParse(msg) => assert!(msg.contains("ga_expenses"), "{msg}"),
            e => panic!("Expected ConfigParse, got {e:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let yaml = FIXTURE.replace("income_taxes: 1500", "income_taxes: lots");
        let err = from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ModelError::ConfigParse(_)));
    }

    #[test]
    fn test_legacy_liabilities_key_accepted() {
        let yaml = FIXTURE.replace("  liabilities:\n", "  liabilities_constants:\n");
        let a = from_yaml_str(&yaml).unwrap();
        assert_eq!(a.balance_sheet_inputs.liabilities.long_term_debt, dec!(100000));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = from_path(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
