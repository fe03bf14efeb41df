use clap::Args;
use serde_json::{json, Value};

use finmodel_core::assumptions::validation::validate_assumptions;
use finmodel_core::calendar::period_end_dates;

use crate::input;

/// Arguments for assumption validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a YAML or JSON assumption file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    let warnings = validate_assumptions(&assumptions)?;
    let dates = period_end_dates(
        assumptions.model_settings.start_date,
        assumptions.num_periods(),
    )?;

    let streams: Vec<&str> = assumptions
        .revenue_streams
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    Ok(json!({
        "result": {
            "valid": true,
            "num_periods": assumptions.num_periods(),
            "first_period_date": dates.first(),
            "last_period_date": dates.last(),
            "revenue_streams": streams,
            "fixed_cost_overrides": assumptions.cost_structure.fixed_costs.overrides.len(),
        },
        "warnings": warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fixture() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../finmodel-core/tests/fixtures/client_config.yaml"
        );
        let value = run_validate(ValidateArgs {
            input: Some(path.to_string()),
        })
        .unwrap();

        let result = &value["result"];
        assert_eq!(result["valid"], true);
        assert_eq!(result["num_periods"], 12);
        assert_eq!(result["first_period_date"], "2021-12-31");
        assert_eq!(result["last_period_date"], "2022-11-30");
        assert_eq!(result["revenue_streams"][0], "Revenue Stream 1");
        assert_eq!(result["fixed_cost_overrides"], 1);
        assert_eq!(value["warnings"], json!([]));
    }

    #[test]
    fn test_validate_reports_config_error() {
        let err = run_validate(ValidateArgs {
            input: Some("no/such/assumptions.yaml".into()),
        })
        .unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
