use clap::Args;
use log::info;
use serde_json::Value;
use std::path::PathBuf;

use finmodel_core::assumptions::AssumptionSet;
use finmodel_core::three_statement::build_projection;

use crate::input;
use crate::output::statements;

const DEFAULT_EXPORT_DIR: &str = "output";

/// Arguments for a three-statement projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a YAML or JSON assumption file
    #[arg(long)]
    pub input: Option<String>,

    /// Write income_statement.csv, balance_sheet.csv and
    /// cash_flow_statement.csv into this directory
    #[arg(long)]
    pub export_dir: Option<String>,

    /// Export the statement CSVs into model_settings.output_directory
    #[arg(long, conflicts_with = "export_dir")]
    pub export: bool,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    let result = build_projection(&assumptions)?;

    if let Some(dir) = export_dir(&args, &assumptions) {
        for path in statements::export_statements(&dir, &result.result)? {
            info!("wrote {}", path.display());
        }
    }

    Ok(serde_json::to_value(result)?)
}

fn export_dir(args: &ProjectArgs, assumptions: &AssumptionSet) -> Option<PathBuf> {
    if let Some(ref dir) = args.export_dir {
        return Some(PathBuf::from(dir));
    }
    args.export.then(|| {
        PathBuf::from(
            assumptions
                .model_settings
                .output_directory
                .as_deref()
                .unwrap_or(DEFAULT_EXPORT_DIR),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use finmodel_core::assumptions::load;

    const FIXTURE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../finmodel-core/tests/fixtures/client_config.yaml"
    );

    fn args(export_dir: Option<&str>, export: bool) -> ProjectArgs {
        ProjectArgs {
            input: Some(FIXTURE.to_string()),
            export_dir: export_dir.map(str::to_string),
            export,
        }
    }

    fn fixture() -> AssumptionSet {
        load::from_path(std::path::Path::new(FIXTURE)).unwrap()
    }

    #[test]
    fn test_explicit_export_dir_wins() {
        let mut a = fixture();
        a.model_settings.output_directory = Some("reports".into());
        assert_eq!(
            export_dir(&args(Some("elsewhere"), false), &a),
            Some(PathBuf::from("elsewhere"))
        );
    }

    #[test]
    fn test_export_flag_uses_output_directory() {
        let mut a = fixture();
        a.model_settings.output_directory = Some("reports/monthly".into());
        assert_eq!(
            export_dir(&args(None, true), &a),
            Some(PathBuf::from("reports/monthly"))
        );
    }

    #[test]
    fn test_export_flag_defaults_to_output() {
        let mut a = fixture();
        a.model_settings.output_directory = None;
        assert_eq!(
            export_dir(&args(None, true), &a),
            Some(PathBuf::from(DEFAULT_EXPORT_DIR))
        );
    }

    #[test]
    fn test_no_export_without_flags() {
        let a = fixture();
        assert!(a.model_settings.output_directory.is_some());
        assert_eq!(export_dir(&args(None, false), &a), None);
    }

    #[test]
    fn test_run_project_writes_statements() {
        let dir = std::env::temp_dir().join(format!("finmodel-project-{}", std::process::id()));
        let value = run_project(args(dir.to_str(), false)).unwrap();

        assert_eq!(value["result"]["summary"]["num_periods"], 12);
        assert_eq!(value["result"]["balance_check"]["passed"], true);
        for name in [
            "income_statement.csv",
            "balance_sheet.csv",
            "cash_flow_statement.csv",
        ] {
            assert!(dir.join(name).is_file(), "{name} missing");
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
