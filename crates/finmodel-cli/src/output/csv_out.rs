use finmodel_core::three_statement::lines::ROW_KEYS;
use serde_json::{Map, Value};
use std::io::{self, Write};

use super::STATEMENT_KEYS;

/// Write output as CSV to stdout.
///
/// A projection is written in long form (`statement,period,date,line_item,value`)
/// so all three statements fit one header; any other result is written as
/// field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(stdout.lock(), value);
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if has_statements(result) => {
                write_statements(&mut wtr, result)?;
            }
            Some(Value::Object(result)) => write_fields(&mut wtr, result)?,
            _ => write_fields(&mut wtr, map)?,
        },
        _ => wtr.write_record([format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn has_statements(result: &Map<String, Value>) -> bool {
    STATEMENT_KEYS.iter().any(|(key, _)| result.contains_key(*key))
}

fn write_statements<W: Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["statement", "period", "date", "line_item", "value"])?;

    for (key, _) in STATEMENT_KEYS {
        let Some(Value::Array(rows)) = result.get(key) else {
            continue;
        };
        for row in rows {
            let Value::Object(items) = row else {
                continue;
            };
            let period = format_csv_value(&row[ROW_KEYS[0]]);
            let date = format_csv_value(&row[ROW_KEYS[1]]);
            for (name, val) in items.iter().filter(|(k, _)| !ROW_KEYS.contains(&k.as_str())) {
                wtr.write_record([
                    key,
                    period.as_str(),
                    date.as_str(),
                    name.as_str(),
                    format_csv_value(val).as_str(),
                ])?;
            }
        }
    }
    Ok(())
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), format_csv_value(val).as_str()])?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
