use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assumptions::AssumptionSet;
use crate::error::ModelError;
use crate::three_statement::balance::BALANCE_SHEET_LINES;
use crate::three_statement::income::INCOME_STATEMENT_LINES;
use crate::three_statement::lines::ROW_KEYS;
use crate::types::{Money, Rate};
use crate::ModelResult;

/// Upper bound on the projection horizon (100 years of months).
pub const MAX_PERIODS: usize = 1200;

/// Upper bound on the number of revenue streams.
pub const MAX_REVENUE_STREAMS: usize = 1000;

/// Largest absolute amount accepted as an input or produced by compounding
/// growth. Sums of such amounts over every line and period stay well inside
/// the `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000000);

/// Check an assumption set before projecting it.
///
/// Returns non-fatal warnings; any structural problem is a configuration
/// error naming the offending key.
pub fn validate_assumptions(a: &AssumptionSet) -> ModelResult<Vec<String>> {
    let mut warnings = Vec::new();
    let n = a.model_settings.num_periods;

    if n == 0 || n > MAX_PERIODS {
        return Err(ModelError::invalid(
            "model_settings.num_periods",
            format!("Must be between 1 and {MAX_PERIODS}, got {n}"),
        ));
    }

    validate_revenue_streams(a)?;
    validate_magnitudes(a)?;

    validate_non_negative(
        "cost_structure.variable_costs.growth_rate",
        a.cost_structure.variable_costs.growth_rate,
    )?;
    validate_rate("sales_returns.rate", a.sales_returns.rate)?;
    validate_non_negative(
        "operating_items.depreciation",
        a.operating_items.depreciation,
    )?;
    validate_non_negative(
        "operating_items.amortization",
        a.operating_items.amortization,
    )?;

    for (field, values) in a.balance_sheet_inputs.period_values.series() {
        if values.len() != n {
            return Err(ModelError::invalid(
                format!("balance_sheet_inputs.period_values.{field}"),
                format!("Expected {n} values (one per period), got {}", values.len()),
            ));
        }
    }

    for name in a.balance_sheet_inputs.fixed_assets.additional_assets.keys() {
        let field = "balance_sheet_inputs.fixed_assets.additional_assets";
        if name.trim().is_empty() {
            return Err(ModelError::invalid(field, "Asset names must not be empty"));
        }
        if is_reserved(name, &BALANCE_SHEET_LINES) {
            return Err(ModelError::invalid(
                field,
                format!("'{name}' collides with a standard balance sheet line"),
            ));
        }
    }

    for &trigger in a.cost_structure.fixed_costs.overrides.keys() {
        if trigger == 0 {
            warnings.push(
                "Fixed cost override at period 0 only takes effect from period 1; \
                 period 0 always uses the initial value"
                    .to_string(),
            );
        } else if trigger as usize >= n {
            warnings.push(format!(
                "Fixed cost override at period {trigger} is beyond the {n}-period horizon and never applies"
            ));
        }
    }

    Ok(warnings)
}

fn validate_revenue_streams(a: &AssumptionSet) -> ModelResult<()> {
    if a.revenue_streams.is_empty() {
        return Err(ModelError::invalid(
            "revenue_streams",
            "Must contain at least one revenue stream",
        ));
    }
    if a.revenue_streams.len() > MAX_REVENUE_STREAMS {
        return Err(ModelError::invalid(
            "revenue_streams",
            format!(
                "At most {MAX_REVENUE_STREAMS} revenue streams are supported, got {}",
                a.revenue_streams.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for (i, stream) in a.revenue_streams.iter().enumerate() {
        let field = format!("revenue_streams[{i}].name");
        if stream.name.trim().is_empty() {
            return Err(ModelError::invalid(field, "Stream name must not be empty"));
        }
        if is_reserved(&stream.name, &INCOME_STATEMENT_LINES) {
            return Err(ModelError::invalid(
                field,
                format!("'{}' collides with a standard income statement line", stream.name),
            ));
        }
        if !seen.insert(stream.name.as_str()) {
            return Err(ModelError::invalid(
                field,
                format!("Duplicate stream name '{}'", stream.name),
            ));
        }
        validate_non_negative(
            &format!("revenue_streams[{i}].growth_rate"),
            stream.growth_rate,
        )?;
    }
    Ok(())
}

/// Every monetary input must lie within `MAX_AMOUNT`.
fn validate_magnitudes(a: &AssumptionSet) -> ModelResult<()> {
    let ops = &a.operating_items;
    let sal = &ops.salaries;
    let inputs = &a.balance_sheet_inputs;
    let b = &inputs.beginning_balances;
    let fa = &inputs.fixed_assets;
    let l = &inputs.liabilities;
    let e = &inputs.equity;

    let scalars = [
        ("sales_returns.initial_value", a.sales_returns.initial_value),
        (
            "cost_structure.variable_costs.initial_value",
            a.cost_structure.variable_costs.initial_value,
        ),
        (
            "cost_structure.fixed_costs.initial_value",
            a.cost_structure.fixed_costs.initial_value,
        ),
        ("operating_items.ga_expenses", ops.ga_expenses),
        ("operating_items.salaries.total_salaries", sal.total_salaries),
        ("operating_items.salaries.benefits", sal.benefits),
        ("operating_items.salaries.payroll_taxes", sal.payroll_taxes),
        ("operating_items.salaries.processing_fees", sal.processing_fees),
        ("operating_items.salaries.bonuses", sal.bonuses),
        ("operating_items.salaries.commissions", sal.commissions),
        ("operating_items.interest_income", ops.interest_income),
        ("operating_items.other_income", ops.other_income),
        ("operating_items.interest_expense", ops.interest_expense),
        ("operating_items.bad_debt", ops.bad_debt),
        ("operating_items.depreciation", ops.depreciation),
        ("operating_items.amortization", ops.amortization),
        ("operating_items.income_taxes", ops.income_taxes),
        ("balance_sheet_inputs.beginning_balances.cash", b.cash),
        ("balance_sheet_inputs.beginning_balances.inventory", b.inventory),
        (
            "balance_sheet_inputs.beginning_balances.accounts_receivable",
            b.accounts_receivable,
        ),
        (
            "balance_sheet_inputs.beginning_balances.other_receivable",
            b.other_receivable,
        ),
        (
            "balance_sheet_inputs.beginning_balances.prepaid_expenses",
            b.prepaid_expenses,
        ),
        (
            "balance_sheet_inputs.beginning_balances.prepaid_insurance",
            b.prepaid_insurance,
        ),
        (
            "balance_sheet_inputs.beginning_balances.unbilled_revenue",
            b.unbilled_revenue,
        ),
        (
            "balance_sheet_inputs.beginning_balances.other_current_assets",
            b.other_current_assets,
        ),
        (
            "balance_sheet_inputs.beginning_balances.accounts_payable",
            b.accounts_payable,
        ),
        (
            "balance_sheet_inputs.beginning_balances.accrued_expenses",
            b.accrued_expenses,
        ),
        (
            "balance_sheet_inputs.beginning_balances.other_current_liabilities",
            b.other_current_liabilities,
        ),
        ("balance_sheet_inputs.fixed_assets.ppe_gross", fa.ppe_gross),
        (
            "balance_sheet_inputs.fixed_assets.intangibles_gross",
            fa.intangibles_gross,
        ),
        ("balance_sheet_inputs.liabilities.credit_cards", l.credit_cards),
        ("balance_sheet_inputs.liabilities.notes_payable", l.notes_payable),
        ("balance_sheet_inputs.liabilities.deferred_income", l.deferred_income),
        ("balance_sheet_inputs.liabilities.accrued_taxes", l.accrued_taxes),
        ("balance_sheet_inputs.liabilities.long_term_debt", l.long_term_debt),
        (
            "balance_sheet_inputs.liabilities.deferred_tax_liabilities",
            l.deferred_tax_liabilities,
        ),
        (
            "balance_sheet_inputs.liabilities.other_liabilities",
            l.other_liabilities,
        ),
        ("balance_sheet_inputs.equity.paid_in_capital", e.paid_in_capital),
        ("balance_sheet_inputs.equity.common_stock", e.common_stock),
        ("balance_sheet_inputs.equity.preferred_stock", e.preferred_stock),
        ("balance_sheet_inputs.equity.capital_round_1", e.capital_round_1),
        ("balance_sheet_inputs.equity.capital_round_2", e.capital_round_2),
        ("balance_sheet_inputs.equity.capital_round_3", e.capital_round_3),
    ];
    for (field, value) in scalars {
        validate_magnitude(field, value)?;
    }

    for (i, stream) in a.revenue_streams.iter().enumerate() {
        validate_magnitude(
            &format!("revenue_streams[{i}].initial_value"),
            stream.initial_value,
        )?;
    }
    for (trigger, &value) in &a.cost_structure.fixed_costs.overrides {
        validate_magnitude(
            &format!("cost_structure.fixed_costs.overrides.{trigger}"),
            value,
        )?;
    }
    for (name, &value) in &fa.additional_assets {
        validate_magnitude(
            &format!("balance_sheet_inputs.fixed_assets.additional_assets.{name}"),
            value,
        )?;
    }
    for (field, values) in inputs.period_values.series() {
        for (p, &value) in values.iter().enumerate() {
            validate_magnitude(
                &format!("balance_sheet_inputs.period_values.{field}[{p}]"),
                value,
            )?;
        }
    }
    Ok(())
}

fn is_reserved(name: &str, statement_lines: &[&str]) -> bool {
    ROW_KEYS.contains(&name) || statement_lines.contains(&name)
}

fn validate_rate(field: &str, value: Rate) -> ModelResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ModelError::invalid(
            field,
            format!("Rate must be between 0 and 1, got {value}"),
        ));
    }
    Ok(())
}

fn validate_magnitude(field: &str, value: Money) -> ModelResult<()> {
    if value.abs() > MAX_AMOUNT {
        return Err(ModelError::invalid(
            field,
            format!("Absolute value must not exceed {MAX_AMOUNT}, got {value}"),
        ));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: Money) -> ModelResult<()> {
    if value < Decimal::ZERO {
        return Err(ModelError::invalid(
            field,
            format!("Value must be non-negative, got {value}"),
        ));
    }
    Ok(())
}
