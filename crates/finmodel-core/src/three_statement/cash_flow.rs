use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::balance::BalanceSheetDraft;
use super::income::IncomeStatementRow;
use super::lines::{serialize_row, LineItems};
use crate::assumptions::{AssumptionSet, BeginningBalances};
use crate::error::ModelError;
use crate::types::{Money, PeriodIndex};
use crate::ModelResult;

/// Indirect-method cash flow for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowRow {
    pub period: PeriodIndex,
    pub date: NaiveDate,
    pub net_income: Money,
    /// Positive add-back
    pub depreciation: Money,
    /// Positive add-back
    pub amortization: Money,
    pub change_ar: Money,
    pub change_inventory: Money,
    pub change_other_current_assets: Money,
    pub change_ap: Money,
    pub change_accrued_expenses: Money,
    pub change_other_current_liab: Money,
    pub cash_from_operations: Money,
    pub cash_from_investing: Money,
    pub cash_from_financing: Money,
    pub net_change_cash: Money,
    pub beginning_cash: Money,
    pub ending_cash: Money,
}

impl LineItems for CashFlowRow {
    fn period(&self) -> PeriodIndex {
        self.period
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn line_items(&self) -> Vec<(&str, Money)> {
        vec![
            ("Net_Income", self.net_income),
            ("Depreciation", self.depreciation),
            ("Amortization", self.amortization),
            ("Change_AR", self.change_ar),
            ("Change_Inventory", self.change_inventory),
            ("Change_Other_Current_Assets", self.change_other_current_assets),
            ("Change_AP", self.change_ap),
            ("Change_Accrued_Expenses", self.change_accrued_expenses),
            ("Change_Other_Current_Liab", self.change_other_current_liab),
            ("Cash_from_Operations", self.cash_from_operations),
            ("Cash_from_Investing", self.cash_from_investing),
            ("Cash_from_Financing", self.cash_from_financing),
            ("Net_Change_Cash", self.net_change_cash),
            ("Beginning_Cash", self.beginning_cash),
            ("Ending_Cash", self.ending_cash),
        ]
    }
}

impl Serialize for CashFlowRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_row(self, serializer)
    }
}

/// Cash impact of a working-capital asset moving from `prior` to `current`.
/// An increase in the asset consumes cash.
pub fn asset_change(prior: Money, current: Money) -> Money {
    prior - current
}

/// Cash impact of a working-capital liability moving from `prior` to
/// `current`. An increase in the liability provides cash.
pub fn liability_change(prior: Money, current: Money) -> Money {
    current - prior
}

/// The six balances whose movement drives operating cash flow.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorkingCapital {
    accounts_receivable: Money,
    inventory: Money,
    other_current_assets: Money,
    accounts_payable: Money,
    accrued_expenses: Money,
    other_current_liabilities: Money,
}

impl WorkingCapital {
    fn opening(b: &BeginningBalances) -> Self {
        WorkingCapital {
            accounts_receivable: b.accounts_receivable,
            inventory: b.inventory,
            other_current_assets: b.total_other_current_assets(),
            accounts_payable: b.accounts_payable,
            accrued_expenses: b.accrued_expenses,
            other_current_liabilities: b.other_current_liabilities,
        }
    }

    fn from_draft(d: &BalanceSheetDraft) -> Self {
        WorkingCapital {
            accounts_receivable: d.accounts_receivable,
            inventory: d.inventory,
            other_current_assets: d.total_other_current_assets,
            accounts_payable: d.accounts_payable,
            accrued_expenses: d.accrued_expenses,
            other_current_liabilities: d.other_current_liabilities,
        }
    }
}

/// Project the cash flow statement from the income statement and the draft
/// balance sheet. Beginning cash of each period is the prior ending cash.
pub fn project_cash_flow(
    a: &AssumptionSet,
    income: &[IncomeStatementRow],
    drafts: &[BalanceSheetDraft],
) -> ModelResult<Vec<CashFlowRow>> {
    if income.len() != drafts.len() {
        return Err(ModelError::invalid(
            "balance_sheet",
            format!(
                "Expected {} draft balance sheet periods, got {}",
                income.len(),
                drafts.len()
            ),
        ));
    }

    let beginning = &a.balance_sheet_inputs.beginning_balances;
    let mut prior = WorkingCapital::opening(beginning);
    let mut cash = beginning.cash;
    let mut rows = Vec::with_capacity(income.len());

    for (is, draft) in income.iter().zip(drafts) {
        let current = WorkingCapital::from_draft(draft);

        let depreciation = -is.depreciation;
        let amortization = -is.amortization;

        let change_ar = asset_change(prior.accounts_receivable, current.accounts_receivable);
        let change_inventory = asset_change(prior.inventory, current.inventory);
        let change_other_current_assets =
            asset_change(prior.other_current_assets, current.other_current_assets);
        let change_ap = liability_change(prior.accounts_payable, current.accounts_payable);
        let change_accrued_expenses =
            liability_change(prior.accrued_expenses, current.accrued_expenses);
        let change_other_current_liab = liability_change(
            prior.other_current_liabilities,
            current.other_current_liabilities,
        );

        let cash_from_operations = is.net_income
            + depreciation
            + amortization
            + change_ar
            + change_inventory
            + change_other_current_assets
            + change_ap
            + change_accrued_expenses
            + change_other_current_liab;
        let cash_from_investing = Decimal::ZERO;
        let cash_from_financing = Decimal::ZERO;
        let net_change_cash = cash_from_operations + cash_from_investing + cash_from_financing;

        let beginning_cash = cash;
        let ending_cash = beginning_cash + net_change_cash;

        rows.push(CashFlowRow {
            period: is.period,
            date: is.date,
            net_income: is.net_income,
            depreciation,
            amortization,
            change_ar,
            change_inventory,
            change_other_current_assets,
            change_ap,
            change_accrued_expenses,
            change_other_current_liab,
            cash_from_operations,
            cash_from_investing,
            cash_from_financing,
            net_change_cash,
            beginning_cash,
            ending_cash,
        });

        prior = current;
        cash = ending_cash;
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::sample_assumptions;
    use crate::calendar::period_end_dates;
    use crate::three_statement::balance::draft_balance_sheet;
    use crate::three_statement::income::project_income_statement;
    use rust_decimal_macros::dec;

    fn cash_flow_for(a: &AssumptionSet) -> Vec<CashFlowRow> {
        let dates = period_end_dates(a.model_settings.start_date, a.num_periods()).unwrap();
        let income = project_income_statement(a, &dates).unwrap();
        let drafts = draft_balance_sheet(a, &income).unwrap();
        project_cash_flow(a, &income, &drafts).unwrap()
    }

    #[test]
    fn test_working_capital_sign_convention() {
        assert_eq!(asset_change(dec!(10000), dec!(8000)), dec!(2000));
        assert_eq!(asset_change(dec!(8000), dec!(10000)), dec!(-2000));
        assert_eq!(liability_change(dec!(5000), dec!(6000)), dec!(1000));
        assert_eq!(liability_change(dec!(6000), dec!(5000)), dec!(-1000));
    }

    #[test]
    fn test_period_zero_against_beginning_balances() {
        let rows = cash_flow_for(&sample_assumptions());
        let r = &rows[0];
        assert_eq!(r.net_income, dec!(-267865));
        assert_eq!(r.depreciation, dec!(120));
        assert_eq!(r.amortization, dec!(100));
        assert_eq!(r.change_ar, dec!(-400));
        assert_eq!(r.change_inventory, dec!(-500));
        assert_eq!(r.change_other_current_assets, Decimal::ZERO);
        assert_eq!(r.change_ap, dec!(200));
        assert_eq!(r.change_accrued_expenses, dec!(100));
        assert_eq!(r.change_other_current_liab, Decimal::ZERO);
        assert_eq!(r.cash_from_operations, dec!(-268245));
        assert_eq!(r.beginning_cash, dec!(30000));
        assert_eq!(r.ending_cash, dec!(-238245));
    }

    #[test]
    fn test_later_periods_use_prior_draft() {
        let rows = cash_flow_for(&sample_assumptions());
        // AR 18400 -> 18900, inventory 12500 -> 12800
        assert_eq!(rows[1].change_ar, dec!(-500));
        assert_eq!(rows[1].change_inventory, dec!(-300));
        // AR 19300 -> 19100 releases cash
        assert_eq!(rows[3].change_ar, dec!(200));
    }

    #[test]
    fn test_cash_recurrence() {
        let rows = cash_flow_for(&sample_assumptions());
        for p in 1..rows.len() {
            assert_eq!(rows[p].beginning_cash, rows[p - 1].ending_cash, "period {p}");
        }
        for r in &rows {
            assert_eq!(r.ending_cash, r.beginning_cash + r.net_change_cash);
            assert_eq!(r.cash_from_investing, Decimal::ZERO);
            assert_eq!(r.cash_from_financing, Decimal::ZERO);
            assert_eq!(r.net_change_cash, r.cash_from_operations);
        }
    }

    #[test]
    fn test_mismatched_stage_lengths_rejected() {
        let a = sample_assumptions();
        let dates = period_end_dates(a.model_settings.start_date, 12).unwrap();
        let income = project_income_statement(&a, &dates).unwrap();
        let drafts = draft_balance_sheet(&a, &income).unwrap();
        assert!(project_cash_flow(&a, &income, &drafts[..11]).is_err());
    }
}
