use serde_json::Value;

/// Key answers, looked up by JSON pointer into the result object in order of
/// priority.
const PRIORITY_POINTERS: [(&str, &str); 4] = [
    ("/summary/total_net_income", "Total net income"),
    ("/summary/ending_cash", "Ending cash"),
    ("/balance_check/passed", "Balanced"),
    ("/valid", "Valid"),
];

/// Print just the key answers from the output.
///
/// Every priority pointer present in the result is printed on its own line;
/// if none match, falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let lines: Vec<String> = PRIORITY_POINTERS
        .iter()
        .filter_map(|(pointer, label)| {
            result_obj
                .pointer(pointer)
                .filter(|v| !v.is_null())
                .map(|v| format!("{}: {}", label, format_minimal(v)))
        })
        .collect();
    if !lines.is_empty() {
        return lines;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            return vec![format!("{}: {}", key, format_minimal(val))];
        }
    }

    vec![format_minimal(result_obj)]
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_headline() {
        let value = json!({
            "result": {
                "summary": {"total_net_income": "-3200000", "ending_cash": "-3100000"},
                "balance_check": {"passed": true}
            }
        });
        assert_eq!(
            minimal_lines(&value),
            vec![
                "Total net income: -3200000",
                "Ending cash: -3100000",
                "Balanced: true"
            ]
        );
    }

    #[test]
    fn test_validation_headline() {
        let value = json!({"result": {"valid": true, "num_periods": 12}});
        assert_eq!(minimal_lines(&value), vec!["Valid: true"]);
    }

    #[test]
    fn test_fallback_to_first_field() {
        let value = json!({"result": {"num_periods": 12}});
        assert_eq!(minimal_lines(&value), vec!["num_periods: 12"]);
    }
}
