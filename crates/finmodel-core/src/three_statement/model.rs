use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;

use super::balance::{close_balance_sheet, draft_balance_sheet, BalanceSheetRow};
use super::cash_flow::{project_cash_flow, CashFlowRow};
use super::income::{project_income_statement, IncomeStatementRow};
use super::invariant::{check_balance, opening_imbalance, BalanceCheckReport};
use super::lines::Statement;
use crate::assumptions::validation::validate_assumptions;
use crate::assumptions::AssumptionSet;
use crate::calendar::period_end_dates;
use crate::error::ModelError;
use crate::types::{with_metadata, ComputationOutput, Money, PeriodIndex};
use crate::ModelResult;

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

/// The three linked statements plus the balance check and run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionOutput {
    pub income_statement: Statement<IncomeStatementRow>,
    pub balance_sheet: Statement<BalanceSheetRow>,
    pub cash_flow_statement: Statement<CashFlowRow>,
    pub balance_check: BalanceCheckReport,
    pub summary: ProjectionSummary,
}

/// Headline figures across the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub first_period_date: NaiveDate,
    pub last_period_date: NaiveDate,
    pub num_periods: PeriodIndex,
    pub starting_net_revenue: Money,
    pub ending_net_revenue: Money,
    pub total_net_revenue: Money,
    pub starting_net_income: Money,
    pub ending_net_income: Money,
    pub total_net_income: Money,
    pub ending_cash: Money,
    pub ending_total_assets: Money,
    pub final_balance_check: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the income statement, balance sheet and cash flow statement for
/// every month of the horizon.
///
/// Stages run in a fixed order: income statement, draft balance sheet,
/// cash flow, closed balance sheet. Cash only enters the balance sheet in the
/// final stage, so there is no circular reference to iterate on. A failing
/// balance check is reported, never fatal.
pub fn build_projection(
    a: &AssumptionSet,
) -> ModelResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings = validate_assumptions(a)?;

    let n = a.num_periods();
    let dates = period_end_dates(a.model_settings.start_date, n)?;
    debug!(
        "projecting {} periods from {} ({} revenue streams)",
        n,
        a.model_settings.start_date,
        a.revenue_streams.len()
    );

    let income = project_income_statement(a, &dates)?;
    debug!("income statement projected");
    for row in income.iter().filter(|r| r.net_revenue < Decimal::ZERO) {
        warnings.push(format!(
            "Period {} ({}): net revenue is negative ({})",
            row.period, row.date, row.net_revenue
        ));
    }

    let drafts = draft_balance_sheet(a, &income)?;
    debug!("balance sheet drafted");

    let cash_flow = project_cash_flow(a, &income, &drafts)?;
    debug!("cash flow projected");

    let balance_sheet = close_balance_sheet(drafts, &cash_flow)?;
    debug!("balance sheet closed");

    let balance_check = check_balance(&balance_sheet, opening_imbalance(a));
    if balance_check.passed {
        debug!("{}", balance_check.summary_line());
    } else {
        warn!("{}", balance_check.summary_line());
        warnings.push(balance_check.summary_line());
    }

    let summary = build_summary(&income, &balance_sheet, &cash_flow)?;

    let output = ProjectionOutput {
        income_statement: Statement::new(income),
        balance_sheet: Statement::new(balance_sheet),
        cash_flow_statement: Statement::new(cash_flow),
        balance_check,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    debug!("projection finished in {elapsed}us");

    Ok(with_metadata(
        "Monthly three-statement projection (income statement, staged balance sheet, indirect cash flow)",
        a,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_summary(
    income: &[IncomeStatementRow],
    balance_sheet: &[BalanceSheetRow],
    cash_flow: &[CashFlowRow],
) -> ModelResult<ProjectionSummary> {
    let empty = || ModelError::invalid("model_settings.num_periods", "No periods were projected");
    let first_is = income.first().ok_or_else(empty)?;
    let last_is = income.last().ok_or_else(empty)?;
    let last_bs = balance_sheet.last().ok_or_else(empty)?;
    let last_cf = cash_flow.last().ok_or_else(empty)?;

    Ok(ProjectionSummary {
        first_period_date: first_is.date,
        last_period_date: last_is.date,
        num_periods: income.len(),
        starting_net_revenue: first_is.net_revenue,
        ending_net_revenue: last_is.net_revenue,
        total_net_revenue: income.iter().map(|r| r.net_revenue).sum(),
        starting_net_income: first_is.net_income,
        ending_net_income: last_is.net_income,
        total_net_income: income.iter().map(|r| r.net_income).sum(),
        ending_cash: last_cf.ending_cash,
        ending_total_assets: last_bs.total_assets,
        final_balance_check: last_bs.balance_check,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
