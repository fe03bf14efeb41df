use finmodel_core::assumptions::{load, AssumptionSet};
use std::io::{self, Read};

/// Attempt to read assumptions from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<AssumptionSet>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(parse(trimmed)?))
}

/// JSON documents start with `{`; anything else is read as YAML.
fn parse(text: &str) -> finmodel_core::ModelResult<AssumptionSet> {
    if text.starts_with('{') {
        load::from_json_str(text)
    } else {
        load::from_yaml_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finmodel_core::ModelError;

    #[test]
    fn test_yaml_and_json_detected() {
        let yaml = include_str!("../../../finmodel-core/tests/fixtures/client_config.yaml");
        let from_yaml = parse(yaml.trim()).unwrap();
        let json = serde_json::to_string(&from_yaml).unwrap();
        assert_eq!(parse(&json).unwrap(), from_yaml);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            parse("{\"model_settings\": ").unwrap_err(),
            ModelError::ConfigParse(_)
        ));
    }
}
