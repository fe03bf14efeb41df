use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::lines::{serialize_row, LineItems, NamedAmount};
use crate::assumptions::validation::MAX_AMOUNT;
use crate::assumptions::AssumptionSet;
use crate::error::ModelError;
use crate::types::{GrowthFactor, Money, PeriodIndex, Rate};
use crate::ModelResult;

/// Income statement lines following the revenue streams, in statement order.
pub const INCOME_STATEMENT_LINES: [&str; 27] = [
    "Sales_Returns",
    "Net_Revenue",
    "Variable_Costs",
    "Fixed_Costs",
    "Total_COGS",
    "Gross_Profit",
    "Gross_Margin_Pct",
    "GA_Expenses",
    "Total_Salaries",
    "Benefits",
    "Payroll_Taxes",
    "Processing_Fees",
    "Bonuses",
    "Commissions",
    "Total_Salaries_Commissions",
    "Total_Operating_Expenses",
    "EBITDA",
    "Interest_Income",
    "Other_Income",
    "Interest_Expense",
    "Bad_Debt",
    "Depreciation",
    "Amortization",
    "Total_Other_Income_Expense",
    "Net_Income_Before_Taxes",
    "Income_Taxes",
    "Net_Income",
];

/// Income statement for one month.
///
/// Interest expense, bad debt, depreciation and amortization are stored
/// negative; income taxes are stored positive and subtracted.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeStatementRow {
    pub period: PeriodIndex,
    pub date: NaiveDate,
    pub revenue_streams: Vec<NamedAmount>,
    pub sales_returns: Money,
    pub net_revenue: Money,
    pub variable_costs: Money,
    pub fixed_costs: Money,
    pub total_cogs: Money,
    pub gross_profit: Money,
    pub gross_margin_pct: Rate,
    pub ga_expenses: Money,
    pub total_salaries: Money,
    pub benefits: Money,
    pub payroll_taxes: Money,
    pub processing_fees: Money,
    pub bonuses: Money,
    pub commissions: Money,
    pub total_salaries_commissions: Money,
    pub total_operating_expenses: Money,
    pub ebitda: Money,
    pub interest_income: Money,
    pub other_income: Money,
    pub interest_expense: Money,
    pub bad_debt: Money,
    pub depreciation: Money,
    pub amortization: Money,
    pub total_other_income_expense: Money,
    pub net_income_before_taxes: Money,
    pub income_taxes: Money,
    pub net_income: Money,
}

impl IncomeStatementRow {
    /// Sum of all revenue streams before sales returns.
    pub fn gross_revenue(&self) -> Money {
        self.revenue_streams.iter().map(|s| s.amount).sum()
    }

    fn fixed_lines(&self) -> [Money; 27] {
        [
            self.sales_returns,
            self.net_revenue,
            self.variable_costs,
            self.fixed_costs,
            self.total_cogs,
            self.gross_profit,
            self.gross_margin_pct,
            self.ga_expenses,
            self.total_salaries,
            self.benefits,
            self.payroll_taxes,
            self.processing_fees,
            self.bonuses,
            self.commissions,
            self.total_salaries_commissions,
            self.total_operating_expenses,
            self.ebitda,
            self.interest_income,
            self.other_income,
            self.interest_expense,
            self.bad_debt,
            self.depreciation,
            self.amortization,
            self.total_other_income_expense,
            self.net_income_before_taxes,
            self.income_taxes,
            self.net_income,
        ]
    }
}

impl LineItems for IncomeStatementRow {
    fn period(&self) -> PeriodIndex {
        self.period
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn line_items(&self) -> Vec<(&str, Money)> {
        let streams = self
            .revenue_streams
            .iter()
            .map(|s| (s.name.as_str(), s.amount));
        let fixed = INCOME_STATEMENT_LINES.into_iter().zip(self.fixed_lines());
        streams.chain(fixed).collect()
    }
}

impl Serialize for IncomeStatementRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_row(self, serializer)
    }
}

/// Project the income statement for every period in `dates`.
///
/// Growth-based lines depend on the previous period, so rows are built
/// strictly in period order.
pub fn project_income_statement(
    a: &AssumptionSet,
    dates: &[NaiveDate],
) -> ModelResult<Vec<IncomeStatementRow>> {
    let ops = &a.operating_items;
    let salaries = &ops.salaries;
    let mut rows: Vec<IncomeStatementRow> = Vec::with_capacity(dates.len());

    for (p, &date) in dates.iter().enumerate() {
        let prior = rows.last();

        // Revenue
        let revenue_streams = a
            .revenue_streams
            .iter()
            .enumerate()
            .map(|(i, stream)| {
                let previous = prior.map(|row| row.revenue_streams[i].amount);
                let amount = grow(stream.initial_value, previous, stream.growth_rate)
                    .ok_or_else(|| overflow(&format!("revenue_streams[{i}].growth_rate"), p))?;
                Ok(NamedAmount {
                    name: stream.name.clone(),
                    amount,
                })
            })
            .collect::<ModelResult<Vec<NamedAmount>>>()?;
        let gross_revenue: Money = revenue_streams.iter().map(|s| s.amount).sum();

        let sales_returns = if p == 0 {
            a.sales_returns.initial_value
        } else {
            -(a.sales_returns.rate * gross_revenue)
        };
        let net_revenue = gross_revenue + sales_returns;

        // Cost of goods sold
        let variable_costs = grow(
            a.cost_structure.variable_costs.initial_value,
            prior.map(|row| row.variable_costs),
            a.cost_structure.variable_costs.growth_rate,
        )
        .ok_or_else(|| overflow("cost_structure.variable_costs.growth_rate", p))?;
        let fixed_costs = a.cost_structure.fixed_costs.value_at(p);
        let total_cogs = variable_costs + fixed_costs;
        let gross_profit = net_revenue - total_cogs;
        let gross_margin_pct = safe_divide(gross_profit, net_revenue);

        // Operating expenses
        let total_salaries_commissions = salaries.total();
        let total_operating_expenses = ops.ga_expenses + total_salaries_commissions;
        let ebitda = gross_profit - total_operating_expenses;

        // Other income and expense
        let interest_expense = -ops.interest_expense;
        let bad_debt = -ops.bad_debt;
        let depreciation = -ops.depreciation;
        let amortization = -ops.amortization;
        let total_other_income_expense = ops.interest_income
            + ops.other_income
            + interest_expense
            + bad_debt
            + depreciation
            + amortization;

        let net_income_before_taxes = ebitda + total_other_income_expense;
        let net_income = net_income_before_taxes - ops.income_taxes;

        rows.push(IncomeStatementRow {
            period: p,
            date,
            revenue_streams,
            sales_returns,
            net_revenue,
            variable_costs,
            fixed_costs,
            total_cogs,
            gross_profit,
            gross_margin_pct,
            ga_expenses: ops.ga_expenses,
            total_salaries: salaries.total_salaries,
            benefits: salaries.benefits,
            payroll_taxes: salaries.payroll_taxes,
            processing_fees: salaries.processing_fees,
            bonuses: salaries.bonuses,
            commissions: salaries.commissions,
            total_salaries_commissions,
            total_operating_expenses,
            ebitda,
            interest_income: ops.interest_income,
            other_income: ops.other_income,
            interest_expense,
            bad_debt,
            depreciation,
            amortization,
            total_other_income_expense,
            net_income_before_taxes,
            income_taxes: ops.income_taxes,
            net_income,
        });
    }

    Ok(rows)
}

/// Period 0 takes the initial value; later periods compound the prior value.
/// `None` once the compounded value exceeds `MAX_AMOUNT`.
fn grow(initial: Money, prior: Option<Money>, factor: GrowthFactor) -> Option<Money> {
    match prior {
        Some(previous) => previous
            .checked_mul(factor)
            .filter(|value| value.abs() <= MAX_AMOUNT),
        None => Some(initial),
    }
}

fn overflow(field: &str, period: PeriodIndex) -> ModelError {
    ModelError::invalid(
        field,
        format!("Compounded value exceeds {MAX_AMOUNT} at period {period}"),
    )
}

/// Zero when the denominator is zero or the quotient is not representable.
pub(crate) fn safe_divide(numerator: Money, denominator: Money) -> Decimal {
    numerator
        .checked_div(denominator)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::sample_assumptions;
    use crate::calendar::period_end_dates;
    use rust_decimal_macros::dec;

    fn project(a: &AssumptionSet) -> Vec<IncomeStatementRow> {
        let dates = period_end_dates(a.model_settings.start_date, a.num_periods()).unwrap();
        project_income_statement(a, &dates).unwrap()
    }

    #[test]
    fn test_period_zero_lines() {
        let rows = project(&sample_assumptions());
        let r = &rows[0];

        assert_eq!(r.gross_revenue(), dec!(100000));
        assert_eq!(r.sales_returns, dec!(-450));
        assert_eq!(r.net_revenue, dec!(99550));
        assert_eq!(r.total_cogs, dec!(50000));
        assert_eq!(r.gross_profit, dec!(49550));
        assert_eq!(r.gross_margin_pct, dec!(49550) / dec!(99550));
        assert_eq!(r.total_salaries_commissions, dec!(288250));
        assert_eq!(r.total_operating_expenses, dec!(316145));
        assert_eq!(r.ebitda, dec!(-266595));
        assert_eq!(r.total_other_income_expense, dec!(230));
        assert_eq!(r.net_income_before_taxes, dec!(-266365));
        assert_eq!(r.net_income, dec!(-267865));
    }

    #[test]
    fn test_period_one_growth_and_returns() {
        let rows = project(&sample_assumptions());
        let r = &rows[1];

        let streams: Vec<Money> = r.revenue_streams.iter().map(|s| s.amount).collect();
        assert_eq!(streams, vec![dec!(50500), dec!(30240), dec!(15045), dec!(5001)]);
        assert_eq!(r.sales_returns, dec!(-503.93));
        assert_eq!(r.net_revenue, dec!(100282.07));
        assert_eq!(r.variable_costs, dec!(20180));
    }

    #[test]
    fn test_growth_recurrence() {
        let a = sample_assumptions();
        let rows = project(&a);
        for (i, stream) in a.revenue_streams.iter().enumerate() {
            assert_eq!(rows[0].revenue_streams[i].amount, stream.initial_value);
            for p in 1..rows.len() {
                assert_eq!(
                    rows[p].revenue_streams[i].amount,
                    rows[p - 1].revenue_streams[i].amount * stream.growth_rate,
                    "stream {} period {p}",
                    stream.name
                );
            }
        }
    }

    #[test]
    fn test_fixed_cost_override_applies_from_trigger() {
        let mut a = sample_assumptions();
        a.cost_structure.fixed_costs.overrides.insert(8, dec!(40000));
        let rows = project(&a);
        for row in &rows[..5] {
            assert_eq!(row.fixed_costs, dec!(30000), "period {}", row.period);
        }
        assert_eq!(rows[5].fixed_costs, dec!(35000));
        assert_eq!(rows[6].fixed_costs, dec!(35000));
        assert_eq!(rows[8].fixed_costs, dec!(40000));
        assert_eq!(rows[9].fixed_costs, dec!(40000));
    }

    #[test]
    fn test_zero_net_revenue_margin_is_zero() {
        let mut a = sample_assumptions();
        for stream in &mut a.revenue_streams {
            stream.initial_value = Decimal::ZERO;
        }
        a.sales_returns.initial_value = Decimal::ZERO;
        let rows = project(&a);
        assert!(rows.iter().all(|r| r.net_revenue.is_zero()));
        assert!(rows.iter().all(|r| r.gross_margin_pct.is_zero()));
    }

    #[test]
    fn test_signed_other_expense_lines() {
        let rows = project(&sample_assumptions());
        let r = &rows[3];
        assert_eq!(r.interest_expense, dec!(-430));
        assert_eq!(r.bad_debt, dec!(-350));
        assert_eq!(r.depreciation, dec!(-120));
        assert_eq!(r.amortization, dec!(-100));
        assert_eq!(r.income_taxes, dec!(1500));
        assert_eq!(r.net_income, r.net_income_before_taxes - dec!(1500));
    }

    #[test]
    fn test_runaway_growth_is_an_error() {
        let mut a = sample_assumptions();
        a.model_settings.num_periods = 1200;
        a.revenue_streams[0].growth_rate = dec!(2);
        let dates = period_end_dates(a.model_settings.start_date, 1200).unwrap();
        match project_income_statement(&a, &dates).unwrap_err() {
            ModelError::InvalidInput { field, reason } => {
                assert_eq!(field, "revenue_streams[0].growth_rate");
                // 50000 * 2^p first exceeds 1e18 at p = 45
                assert!(reason.ends_with("at period 45"), "{reason}");
            }
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
    }

    #[test]
    fn test_safe_divide_edges() {
        assert_eq!(safe_divide(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_divide(dec!(10), dec!(4)), dec!(2.5));
        assert_eq!(safe_divide(MAX_AMOUNT, dec!(0.0000000000000000000001)), Decimal::ZERO);
    }

    #[test]
    fn test_line_items_order() {
        let rows = project(&sample_assumptions());
        let names: Vec<&str> = rows[0].line_items().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names.len(), 4 + INCOME_STATEMENT_LINES.len());
        assert_eq!(names[0], "Revenue Stream 1");
        assert_eq!(names[4], "Sales_Returns");
        assert_eq!(names.last(), Some(&"Net_Income"));
        assert_eq!(rows[0].line_item("EBITDA"), Some(dec!(-266595)));
    }
}
