use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::cash_flow::CashFlowRow;
use super::income::IncomeStatementRow;
use super::lines::{serialize_row, LineItems, NamedAmount};
use crate::assumptions::AssumptionSet;
use crate::error::ModelError;
use crate::types::{Money, PeriodIndex};
use crate::ModelResult;

/// Standard balance sheet lines. Additional fixed assets are inserted after
/// `Intangibles_Net` under their own names.
pub const BALANCE_SHEET_LINES: [&str; 41] = [
    "Cash",
    "Accounts_Receivable",
    "Inventory",
    "Other_Receivable",
    "Prepaid_Expenses",
    "Prepaid_Insurance",
    "Unbilled_Revenue",
    "Other_Current_Assets",
    "Total_Other_Current_Assets",
    "Total_Current_Assets",
    "PPE_Gross",
    "Accumulated_Depreciation",
    "PPE_Net",
    "Intangibles_Gross",
    "Accumulated_Amortization",
    "Intangibles_Net",
    "Total_Fixed_Assets",
    "Total_Assets",
    "Accounts_Payable",
    "Credit_Cards",
    "Notes_Payable",
    "Deferred_Income",
    "Accrued_Expenses",
    "Accrued_Taxes",
    "Other_Current_Liabilities",
    "Total_Current_Liabilities",
    "Long_Term_Debt",
    "Deferred_Tax_Liabilities",
    "Other_Liabilities",
    "Total_Long_Term_Liabilities",
    "Total_Liabilities",
    "Paid_In_Capital",
    "Common_Stock",
    "Preferred_Stock",
    "Capital_Round_1",
    "Capital_Round_2",
    "Capital_Round_3",
    "Retained_Earnings",
    "Total_Equity",
    "Total_Liabilities_Equity",
    "Balance_Check",
];

// ---------------------------------------------------------------------------
// First pass
// ---------------------------------------------------------------------------

/// Every balance sheet line that can be known before the cash flow runs.
///
/// Has no cash field; the cash flow stage reads working capital from drafts
/// and cash only exists once that stage has produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheetDraft {
    pub period: PeriodIndex,
    pub date: NaiveDate,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub other_receivable: Money,
    pub prepaid_expenses: Money,
    pub prepaid_insurance: Money,
    pub unbilled_revenue: Money,
    pub other_current_assets: Money,
    pub total_other_current_assets: Money,
    pub ppe_gross: Money,
    pub accumulated_depreciation: Money,
    pub ppe_net: Money,
    pub intangibles_gross: Money,
    pub accumulated_amortization: Money,
    pub intangibles_net: Money,
    pub additional_assets: Vec<NamedAmount>,
    pub total_fixed_assets: Money,
    pub accounts_payable: Money,
    pub credit_cards: Money,
    pub notes_payable: Money,
    pub deferred_income: Money,
    pub accrued_expenses: Money,
    pub accrued_taxes: Money,
    pub other_current_liabilities: Money,
    pub long_term_debt: Money,
    pub deferred_tax_liabilities: Money,
    pub other_liabilities: Money,
    pub paid_in_capital: Money,
    pub common_stock: Money,
    pub preferred_stock: Money,
    pub capital_round_1: Money,
    pub capital_round_2: Money,
    pub capital_round_3: Money,
    pub retained_earnings: Money,
}

/// Build the cash-less balance sheet for every income statement period.
pub fn draft_balance_sheet(
    a: &AssumptionSet,
    income: &[IncomeStatementRow],
) -> ModelResult<Vec<BalanceSheetDraft>> {
    let inputs = &a.balance_sheet_inputs;
    let values = &inputs.period_values;
    let oca = &values.other_current_assets_components;
    let fixed = &inputs.fixed_assets;
    let liabilities = &inputs.liabilities;
    let equity = &inputs.equity;
    let ops = &a.operating_items;

    let additional_assets: Vec<NamedAmount> = fixed
        .additional_assets
        .iter()
        .map(|(name, amount)| NamedAmount {
            name: name.clone(),
            amount: *amount,
        })
        .collect();
    let additional_total: Money = additional_assets.iter().map(|asset| asset.amount).sum();

    let mut retained_earnings = Decimal::ZERO;
    let mut drafts = Vec::with_capacity(income.len());

    for row in income {
        let p = row.period;
        retained_earnings += row.net_income;

        let other_receivable = component_at(&oca.other_receivable, p, "other_receivable")?;
        let prepaid_expenses = component_at(&oca.prepaid_expenses, p, "prepaid_expenses")?;
        let prepaid_insurance = component_at(&oca.prepaid_insurance, p, "prepaid_insurance")?;
        let unbilled_revenue = component_at(&oca.unbilled_revenue, p, "unbilled_revenue")?;
        let other_current_assets =
            component_at(&oca.other_current_assets, p, "other_current_assets")?;
        let total_other_current_assets = other_receivable
            + prepaid_expenses
            + prepaid_insurance
            + unbilled_revenue
            + other_current_assets;

        let elapsed = Decimal::from(p + 1);
        let accumulated_depreciation = -(ops.depreciation * elapsed);
        let accumulated_amortization = -(ops.amortization * elapsed);
        let ppe_net = fixed.ppe_gross + accumulated_depreciation;
        let intangibles_net = fixed.intangibles_gross + accumulated_amortization;

        drafts.push(BalanceSheetDraft {
            period: p,
            date: row.date,
            accounts_receivable: at(&values.accounts_receivable, p, "accounts_receivable")?,
            inventory: at(&values.inventory, p, "inventory")?,
            other_receivable,
            prepaid_expenses,
            prepaid_insurance,
            unbilled_revenue,
            other_current_assets,
            total_other_current_assets,
            ppe_gross: fixed.ppe_gross,
            accumulated_depreciation,
            ppe_net,
            intangibles_gross: fixed.intangibles_gross,
            accumulated_amortization,
            intangibles_net,
            additional_assets: additional_assets.clone(),
            total_fixed_assets: ppe_net + intangibles_net + additional_total,
            accounts_payable: at(&values.accounts_payable, p, "accounts_payable")?,
            credit_cards: liabilities.credit_cards,
            notes_payable: liabilities.notes_payable,
            deferred_income: liabilities.deferred_income,
            accrued_expenses: at(&values.accrued_expenses, p, "accrued_expenses")?,
            accrued_taxes: liabilities.accrued_taxes,
            other_current_liabilities: at(
                &values.other_current_liabilities,
                p,
                "other_current_liabilities",
            )?,
            long_term_debt: liabilities.long_term_debt,
            deferred_tax_liabilities: liabilities.deferred_tax_liabilities,
            other_liabilities: liabilities.other_liabilities,
            paid_in_capital: equity.paid_in_capital,
            common_stock: equity.common_stock,
            preferred_stock: equity.preferred_stock,
            capital_round_1: equity.capital_round_1,
            capital_round_2: equity.capital_round_2,
            capital_round_3: equity.capital_round_3,
            retained_earnings,
        });
    }

    Ok(drafts)
}

fn component_at(series: &[Money], period: PeriodIndex, field: &str) -> ModelResult<Money> {
    at(series, period, &format!("other_current_assets_components.{field}"))
}

fn at(series: &[Money], period: PeriodIndex, field: &str) -> ModelResult<Money> {
    series.get(period).copied().ok_or_else(|| {
        ModelError::invalid(
            format!("balance_sheet_inputs.period_values.{field}"),
            format!("No value for period {period}"),
        )
    })
}

// ---------------------------------------------------------------------------
// Second pass
// ---------------------------------------------------------------------------

/// Balance sheet with cash and every total filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheetRow {
    pub cash: Money,
    pub lines: BalanceSheetDraft,
    pub total_current_assets: Money,
    pub total_assets: Money,
    pub total_current_liabilities: Money,
    pub total_long_term_liabilities: Money,
    pub total_liabilities: Money,
    pub total_equity: Money,
    pub total_liabilities_equity: Money,
    /// Total assets minus total liabilities and equity
    pub balance_check: Money,
}

impl BalanceSheetRow {
    fn close(draft: BalanceSheetDraft, cash: Money) -> Self {
        let d = &draft;
        let total_current_assets =
            cash + d.accounts_receivable + d.inventory + d.total_other_current_assets;
        let total_assets = total_current_assets + d.total_fixed_assets;

        let total_current_liabilities = d.accounts_payable
            + d.credit_cards
            + d.notes_payable
            + d.deferred_income
            + d.accrued_expenses
            + d.accrued_taxes
            + d.other_current_liabilities;
        let total_long_term_liabilities =
            d.long_term_debt + d.deferred_tax_liabilities + d.other_liabilities;
        let total_liabilities = total_current_liabilities + total_long_term_liabilities;

        let total_equity = d.paid_in_capital
            + d.common_stock
            + d.preferred_stock
            + d.capital_round_1
            + d.capital_round_2
            + d.capital_round_3
            + d.retained_earnings;
        let total_liabilities_equity = total_liabilities + total_equity;

        BalanceSheetRow {
            cash,
            lines: draft,
            total_current_assets,
            total_assets,
            total_current_liabilities,
            total_long_term_liabilities,
            total_liabilities,
            total_equity,
            total_liabilities_equity,
            balance_check: total_assets - total_liabilities_equity,
        }
    }
}

impl LineItems for BalanceSheetRow {
    fn period(&self) -> PeriodIndex {
        self.lines.period
    }

    fn date(&self) -> NaiveDate {
        self.lines.date
    }

    fn line_items(&self) -> Vec<(&str, Money)> {
        let d = &self.lines;
        let mut items = vec![
            ("Cash", self.cash),
            ("Accounts_Receivable", d.accounts_receivable),
            ("Inventory", d.inventory),
            ("Other_Receivable", d.other_receivable),
            ("Prepaid_Expenses", d.prepaid_expenses),
            ("Prepaid_Insurance", d.prepaid_insurance),
            ("Unbilled_Revenue", d.unbilled_revenue),
            ("Other_Current_Assets", d.other_current_assets),
            ("Total_Other_Current_Assets", d.total_other_current_assets),
            ("Total_Current_Assets", self.total_current_assets),
            ("PPE_Gross", d.ppe_gross),
            ("Accumulated_Depreciation", d.accumulated_depreciation),
            ("PPE_Net", d.ppe_net),
            ("Intangibles_Gross", d.intangibles_gross),
            ("Accumulated_Amortization", d.accumulated_amortization),
            ("Intangibles_Net", d.intangibles_net),
        ];
        items.extend(
            d.additional_assets
                .iter()
                .map(|asset| (asset.name.as_str(), asset.amount)),
        );
        items.extend([
            ("Total_Fixed_Assets", d.total_fixed_assets),
            ("Total_Assets", self.total_assets),
            ("Accounts_Payable", d.accounts_payable),
            ("Credit_Cards", d.credit_cards),
            ("Notes_Payable", d.notes_payable),
            ("Deferred_Income", d.deferred_income),
            ("Accrued_Expenses", d.accrued_expenses),
            ("Accrued_Taxes", d.accrued_taxes),
            ("Other_Current_Liabilities", d.other_current_liabilities),
            ("Total_Current_Liabilities", self.total_current_liabilities),
            ("Long_Term_Debt", d.long_term_debt),
            ("Deferred_Tax_Liabilities", d.deferred_tax_liabilities),
            ("Other_Liabilities", d.other_liabilities),
            ("Total_Long_Term_Liabilities", self.total_long_term_liabilities),
            ("Total_Liabilities", self.total_liabilities),
            ("Paid_In_Capital", d.paid_in_capital),
            ("Common_Stock", d.common_stock),
            ("Preferred_Stock", d.preferred_stock),
            ("Capital_Round_1", d.capital_round_1),
            ("Capital_Round_2", d.capital_round_2),
            ("Capital_Round_3", d.capital_round_3),
            ("Retained_Earnings", d.retained_earnings),
            ("Total_Equity", self.total_equity),
            ("Total_Liabilities_Equity", self.total_liabilities_equity),
            ("Balance_Check", self.balance_check),
        ]);
        items
    }
}

impl Serialize for BalanceSheetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_row(self, serializer)
    }
}

/// Fill in cash from the cash flow ending balance and compute every total.
pub fn close_balance_sheet(
    drafts: Vec<BalanceSheetDraft>,
    cash_flow: &[CashFlowRow],
) -> ModelResult<Vec<BalanceSheetRow>> {
    if drafts.len() != cash_flow.len() {
        return Err(ModelError::invalid(
            "cash_flow",
            format!(
                "Expected {} cash flow periods, got {}",
                drafts.len(),
                cash_flow.len()
            ),
        ));
    }

    Ok(drafts
        .into_iter()
        .zip(cash_flow)
        .map(|(draft, cf)| BalanceSheetRow::close(draft, cf.ending_cash))
        .collect())
}
