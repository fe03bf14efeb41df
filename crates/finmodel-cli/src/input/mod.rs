pub mod file;
pub mod stdin;

use finmodel_core::assumptions::AssumptionSet;

/// Load assumptions from `--input` if given, else from piped stdin.
pub fn read_assumptions(path: Option<&str>) -> Result<AssumptionSet, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_assumptions(path)
    } else if let Some(assumptions) = stdin::read_stdin()? {
        Ok(assumptions)
    } else {
        Err("--input <file.yaml|file.json> or stdin required".into())
    }
}
