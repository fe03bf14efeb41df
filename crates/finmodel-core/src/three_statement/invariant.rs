use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::balance::BalanceSheetRow;
use super::lines::LineItems;
use crate::assumptions::AssumptionSet;
use crate::types::{Money, PeriodIndex};

/// Largest absolute `Balance_Check` accepted as balanced.
pub const BALANCE_TOLERANCE: Money = dec!(0.01);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodImbalance {
    pub period: PeriodIndex,
    pub date: NaiveDate,
    pub imbalance: Money,
}

/// Outcome of the accounting-identity check over all closed balance sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheckReport {
    pub passed: bool,
    pub tolerance: Money,
    pub max_abs_imbalance: Money,
    /// Period with the largest absolute imbalance (earliest on ties)
    pub max_imbalance_period: Option<PeriodIndex>,
    /// Every period whose imbalance exceeds the tolerance
    pub failing_periods: Vec<PeriodImbalance>,
    /// Imbalance already present in the beginning balances and constants.
    /// Each period's check equals this figure when the statements articulate.
    pub opening_imbalance: Money,
}

impl BalanceCheckReport {
    pub fn summary_line(&self) -> String {
        if self.passed {
            format!(
                "Balance sheet balances in every period (max |imbalance| {})",
                self.max_abs_imbalance
            )
        } else {
            let periods: Vec<String> = self
                .failing_periods
                .iter()
                .map(|f| f.period.to_string())
                .collect();
            let mut line = format!(
                "Balance sheet does not balance in {} period(s) [{}]; max |imbalance| {} exceeds tolerance {}",
                self.failing_periods.len(),
                periods.join(", "),
                self.max_abs_imbalance,
                self.tolerance
            );
            if !self.opening_imbalance.is_zero() {
                line.push_str(&format!(
                    "; beginning balances are already out of balance by {}",
                    self.opening_imbalance
                ));
            }
            line
        }
    }
}

/// Check `Total_Assets == Total_Liabilities + Total_Equity` for every row.
pub fn check_balance(rows: &[BalanceSheetRow], opening_imbalance: Money) -> BalanceCheckReport {
    let mut max_abs_imbalance = Decimal::ZERO;
    let mut max_imbalance_period = None;
    let mut failing_periods = Vec::new();

    for row in rows {
        let abs = row.balance_check.abs();
        if max_imbalance_period.is_none() || abs > max_abs_imbalance {
            max_abs_imbalance = abs;
            max_imbalance_period = Some(row.period());
        }
        if abs > BALANCE_TOLERANCE {
            failing_periods.push(PeriodImbalance {
                period: row.period(),
                date: row.date(),
                imbalance: row.balance_check,
            });
        }
    }

    BalanceCheckReport {
        passed: failing_periods.is_empty(),
        tolerance: BALANCE_TOLERANCE,
        max_abs_imbalance,
        max_imbalance_period,
        failing_periods,
        opening_imbalance,
    }
}

/// Beginning assets plus gross fixed assets, less beginning current
/// liabilities, constant liabilities and contributed equity.
pub fn opening_imbalance(a: &AssumptionSet) -> Money {
    let inputs = &a.balance_sheet_inputs;
    let b = &inputs.beginning_balances;

    let assets = b.cash
        + b.inventory
        + b.accounts_receivable
        + b.total_other_current_assets()
        + inputs.fixed_assets.total_gross();
    let liabilities = b.accounts_payable
        + b.accrued_expenses
        + b.other_current_liabilities
        + inputs.liabilities.current_total()
        + inputs.liabilities.long_term_total();

    assets - liabilities - inputs.equity.total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::sample_assumptions;
    use crate::calendar::period_end_dates;
    use crate::three_statement::balance::{close_balance_sheet, draft_balance_sheet};
    use crate::three_statement::cash_flow::project_cash_flow;
    use crate::three_statement::income::project_income_statement;

    fn closed_for(a: &AssumptionSet) -> Vec<BalanceSheetRow> {
        let dates = period_end_dates(a.model_settings.start_date, a.num_periods()).unwrap();
        let income = project_income_statement(a, &dates).unwrap();
        let drafts = draft_balance_sheet(a, &income).unwrap();
        let cash_flow = project_cash_flow(a, &income, &drafts).unwrap();
        close_balance_sheet(drafts, &cash_flow).unwrap()
    }

    #[test]
    fn test_sample_opening_position_balances() {
        assert_eq!(opening_imbalance(&sample_assumptions()), Decimal::ZERO);
    }

    #[test]
    fn test_sample_passes() {
        let a = sample_assumptions();
        let report = check_balance(&closed_for(&a), opening_imbalance(&a));
        assert!(report.passed);
        assert!(report.failing_periods.is_empty());
        assert_eq!(report.tolerance, dec!(0.01));
        assert!(report.max_abs_imbalance < dec!(0.000001));
        assert!(report.max_imbalance_period.is_some());
    }

    #[test]
    fn test_unbalanced_opening_fails_every_period() {
        let mut a = sample_assumptions();
        a.balance_sheet_inputs.equity.common_stock += dec!(250);
        let rows = closed_for(&a);
        let report = check_balance(&rows, opening_imbalance(&a));

        assert!(!report.passed);
        assert_eq!(report.opening_imbalance, dec!(-250));
        assert_eq!(report.failing_periods.len(), 12);
        assert!((report.max_abs_imbalance - dec!(250)).abs() < dec!(0.000001));
        // every period carries the opening difference forward
        assert!(rows
            .iter()
            .all(|r| (r.balance_check - dec!(-250)).abs() < dec!(0.000001)));
        assert!(report.summary_line().contains("-250"));
    }

    #[test]
    fn test_imbalance_within_tolerance_passes() {
        let mut a = sample_assumptions();
        a.balance_sheet_inputs.beginning_balances.cash += dec!(0.005);
        let report = check_balance(&closed_for(&a), opening_imbalance(&a));
        assert!(report.passed);
        assert!((report.max_abs_imbalance - dec!(0.005)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_empty_rows_pass() {
        let report = check_balance(&[], Decimal::ZERO);
        assert!(report.passed);
        assert_eq!(report.max_imbalance_period, None);
    }
}
