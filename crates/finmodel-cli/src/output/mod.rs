pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod statements;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Statement arrays carried in a projection result, in display order.
pub const STATEMENT_KEYS: [(&str, &str); 3] = [
    ("income_statement", "Income Statement"),
    ("balance_sheet", "Balance Sheet"),
    ("cash_flow_statement", "Cash Flow Statement"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}
