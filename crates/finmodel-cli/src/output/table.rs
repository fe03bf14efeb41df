use finmodel_core::three_statement::lines::ROW_KEYS;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::STATEMENT_KEYS;

/// Format output as tables using the tabled crate.
///
/// Statements are pivoted the way a spreadsheet shows them: one row per line
/// item, one column per period date.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut scalars = Map::new();
        for (key, val) in res_map {
            match (key.as_str(), val) {
                (k, Value::Array(rows)) if is_statement(k) => {
                    println!("{}", statement_title(k));
                    print_statement(rows);
                    println!();
                }
                ("balance_check", Value::Object(check)) => {
                    println!("Balance Check");
                    print_flat_object(&Value::Object(check.clone()));
                    println!();
                }
                ("summary", Value::Object(summary)) => {
                    println!("Summary");
                    print_flat_object(&Value::Object(summary.clone()));
                    println!();
                }
                _ => {
                    scalars.insert(key.clone(), val.clone());
                }
            }
        }
        if !scalars.is_empty() {
            print_flat_object(&Value::Object(scalars));
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn is_statement(key: &str) -> bool {
    STATEMENT_KEYS.iter().any(|(k, _)| *k == key)
}

fn statement_title(key: &str) -> &str {
    STATEMENT_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, title)| *title)
        .unwrap_or(key)
}

fn print_statement(rows: &[Value]) {
    let table = pivot_statement(rows);
    println!("{}", table);
}

/// Line items as rows, periods (by date) as columns.
fn pivot_statement(rows: &[Value]) -> Table {
    let mut builder = Builder::default();

    let mut header = vec!["Line Item".to_string()];
    header.extend(rows.iter().map(|row| format_value(&row[ROW_KEYS[1]])));
    builder.push_record(header);

    if let Some(Value::Object(first)) = rows.first() {
        for name in first.keys().filter(|k| !ROW_KEYS.contains(&k.as_str())) {
            let mut record = vec![name.clone()];
            record.extend(rows.iter().map(|row| {
                row.get(name.as_str()).map(format_value).unwrap_or_default()
            }));
            builder.push_record(record);
        }
    }

    Table::from(builder)
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pivot_puts_dates_in_header() {
        let rows = vec![
            json!({"Period": 0, "Date": "2021-12-31", "Net_Revenue": "100", "EBITDA": "10"}),
            json!({"Period": 1, "Date": "2022-01-31", "Net_Revenue": "110", "EBITDA": "12"}),
        ];
        let rendered = pivot_statement(&rows).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        let header = lines.iter().find(|l| l.contains("Line Item")).unwrap();
        assert!(header.contains("2021-12-31") && header.contains("2022-01-31"));
        assert!(rendered.contains("Net_Revenue"));
        assert!(!rendered.contains("Period"));
    }

    #[test]
    fn test_title_lookup() {
        assert_eq!(statement_title("balance_sheet"), "Balance Sheet");
        assert!(!is_statement("summary"));
    }
}
