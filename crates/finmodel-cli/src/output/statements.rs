use std::fs;
use std::path::{Path, PathBuf};

use finmodel_core::three_statement::lines::ROW_KEYS;
use finmodel_core::three_statement::{LineItems, ProjectionOutput, Statement};

/// Write the three statements as CSV files into `dir`, creating it if needed.
///
/// Each file has one row per period: `Period`, `Date`, then every line item
/// in statement order. Values are written unrounded.
pub fn export_statements(
    dir: &Path,
    projection: &ProjectionOutput,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;

    let income = dir.join("income_statement.csv");
    write_statement(&income, &projection.income_statement)?;
    let balance = dir.join("balance_sheet.csv");
    write_statement(&balance, &projection.balance_sheet)?;
    let cash_flow = dir.join("cash_flow_statement.csv");
    write_statement(&cash_flow, &projection.cash_flow_statement)?;

    Ok(vec![income, balance, cash_flow])
}

fn write_statement<R: LineItems>(
    path: &Path,
    statement: &Statement<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;

    let mut header: Vec<String> = ROW_KEYS.iter().map(|k| k.to_string()).collect();
    header.extend(statement.line_item_names());
    wtr.write_record(&header)?;

    for row in statement.rows() {
        let mut record = vec![row.period().to_string(), row.date().to_string()];
        record.extend(row.line_items().into_iter().map(|(_, v)| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finmodel_core::assumptions::load;
    use finmodel_core::three_statement::build_projection;

    fn projection() -> ProjectionOutput {
        let yaml = include_str!("../../../finmodel-core/tests/fixtures/client_config.yaml");
        let a = load::from_yaml_str(yaml).unwrap();
        build_projection(&a).unwrap().result
    }

    #[test]
    fn test_exports_three_files_with_headers() {
        let dir = std::env::temp_dir().join(format!("finmodel-export-{}", std::process::id()));
        let paths = export_statements(&dir, &projection()).unwrap();
        assert_eq!(paths.len(), 3);

        let mut reader = csv::Reader::from_path(dir.join("cash_flow_statement.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Period");
        assert_eq!(&headers[1], "Date");
        assert_eq!(&headers[2], "Net_Income");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 12);
        assert_eq!(&records[0][1], "2021-12-31");
        assert_eq!(&records[0][headers.len() - 1], "-238245");

        let income = fs::read_to_string(dir.join("income_statement.csv")).unwrap();
        assert!(income.lines().next().unwrap().contains("Revenue Stream 1"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
