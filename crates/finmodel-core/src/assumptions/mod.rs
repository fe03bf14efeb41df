//! Client-editable assumption set driving the projection.
//!
//! The set is deserialized from YAML or JSON (see [`load`]) and checked by
//! [`validation::validate_assumptions`] before any statement row is computed.
//! Every monetary field is required; the only optional inputs are the
//! fixed-cost override map, additional fixed assets and the export directory.

pub mod load;
pub mod overrides;
pub mod validation;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{GrowthFactor, Money, PeriodIndex, Rate};

pub use overrides::FixedCostSchedule;

/// Complete, immutable input for one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    pub model_settings: ModelSettings,
    /// Ordered revenue streams; statement order follows this list
    pub revenue_streams: Vec<RevenueStream>,
    pub sales_returns: SalesReturns,
    pub cost_structure: CostStructure,
    pub operating_items: OperatingItems,
    pub balance_sheet_inputs: BalanceSheetInputs,
}

impl AssumptionSet {
    pub fn num_periods(&self) -> PeriodIndex {
        self.model_settings.num_periods
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Any day in the first projected month
    pub start_date: NaiveDate,
    /// Number of monthly periods to project (N >= 1)
    pub num_periods: PeriodIndex,
    /// Directory the CLI exports statement CSVs into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

/// A named revenue line growing geometrically from its period-0 value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStream {
    pub name: String,
    pub initial_value: Money,
    /// Multiplicative factor applied from period 1 onward (1.01 = +1%)
    pub growth_rate: GrowthFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReturns {
    /// Period-0 actual, already signed (normally negative)
    pub initial_value: Money,
    /// Fraction of gross revenue returned in periods 1..N
    pub rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    pub variable_costs: GrowthLine,
    pub fixed_costs: FixedCostSchedule,
}

/// Initial value plus per-period growth factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthLine {
    pub initial_value: Money,
    pub growth_rate: GrowthFactor,
}

/// Flat per-period amounts. All are positive magnitudes; the income
/// statement applies the sign of each line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingItems {
    pub ga_expenses: Money,
    pub salaries: SalaryComponents,
    pub interest_income: Money,
    pub other_income: Money,
    pub interest_expense: Money,
    pub bad_debt: Money,
    pub depreciation: Money,
    pub amortization: Money,
    pub income_taxes: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponents {
    pub total_salaries: Money,
    pub benefits: Money,
    pub payroll_taxes: Money,
    pub processing_fees: Money,
    pub bonuses: Money,
    pub commissions: Money,
}

impl SalaryComponents {
    pub fn total(&self) -> Money {
        self.total_salaries
            + self.benefits
            + self.payroll_taxes
            + self.processing_fees
            + self.bonuses
            + self.commissions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetInputs {
    pub beginning_balances: BeginningBalances,
    pub period_values: PeriodValues,
    pub fixed_assets: FixedAssets,
    #[serde(alias = "liabilities_constants")]
    pub liabilities: LiabilityConstants,
    pub equity: EquityConstants,
}

/// Balances as of the instant before period 0 ("period -1").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginningBalances {
    pub cash: Money,
    pub inventory: Money,
    pub accounts_receivable: Money,
    pub other_receivable: Money,
    pub prepaid_expenses: Money,
    pub prepaid_insurance: Money,
    pub unbilled_revenue: Money,
    pub other_current_assets: Money,
    pub accounts_payable: Money,
    pub accrued_expenses: Money,
    pub other_current_liabilities: Money,
}

impl BeginningBalances {
    /// Sum of the five other-current-asset components.
    pub fn total_other_current_assets(&self) -> Money {
        self.other_receivable
            + self.prepaid_expenses
            + self.prepaid_insurance
            + self.unbilled_revenue
            + self.other_current_assets
    }
}

/// Externally supplied working-capital balances, one value per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValues {
    pub inventory: Vec<Money>,
    pub accounts_receivable: Vec<Money>,
    pub accounts_payable: Vec<Money>,
    pub accrued_expenses: Vec<Money>,
    pub other_current_liabilities: Vec<Money>,
    pub other_current_assets_components: OtherCurrentAssetSeries,
}

impl PeriodValues {
    /// Every period-indexed series with its config path, for length checks.
    pub fn series(&self) -> Vec<(&'static str, &[Money])> {
        let oca = &self.other_current_assets_components;
        vec![
            ("inventory", self.inventory.as_slice()),
            ("accounts_receivable", self.accounts_receivable.as_slice()),
            ("accounts_payable", self.accounts_payable.as_slice()),
            ("accrued_expenses", self.accrued_expenses.as_slice()),
            (
                "other_current_liabilities",
                self.other_current_liabilities.as_slice(),
            ),
            (
                "other_current_assets_components.other_receivable",
                oca.other_receivable.as_slice(),
            ),
            (
                "other_current_assets_components.prepaid_expenses",
                oca.prepaid_expenses.as_slice(),
            ),
            (
                "other_current_assets_components.prepaid_insurance",
                oca.prepaid_insurance.as_slice(),
            ),
            (
                "other_current_assets_components.unbilled_revenue",
                oca.unbilled_revenue.as_slice(),
            ),
            (
                "other_current_assets_components.other_current_assets",
                oca.other_current_assets.as_slice(),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherCurrentAssetSeries {
    pub other_receivable: Vec<Money>,
    pub prepaid_expenses: Vec<Money>,
    pub prepaid_insurance: Vec<Money>,
    pub unbilled_revenue: Vec<Money>,
    pub other_current_assets: Vec<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssets {
    pub ppe_gross: Money,
    pub intangibles_gross: Money,
    /// Further non-depreciating fixed assets carried at a constant amount
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_assets: BTreeMap<String, Money>,
}

impl FixedAssets {
    pub fn total_gross(&self) -> Money {
        self.ppe_gross + self.intangibles_gross + self.additional_assets.values().sum::<Money>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityConstants {
    pub credit_cards: Money,
    pub notes_payable: Money,
    pub deferred_income: Money,
    pub accrued_taxes: Money,
    pub long_term_debt: Money,
    pub deferred_tax_liabilities: Money,
    pub other_liabilities: Money,
}

impl LiabilityConstants {
    /// Constant lines reported under current liabilities.
    pub fn current_total(&self) -> Money {
        self.credit_cards + self.notes_payable + self.deferred_income + self.accrued_taxes
    }

    pub fn long_term_total(&self) -> Money {
        self.long_term_debt + self.deferred_tax_liabilities + self.other_liabilities
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityConstants {
    pub paid_in_capital: Money,
    pub common_stock: Money,
    pub preferred_stock: Money,
    pub capital_round_1: Money,
    pub capital_round_2: Money,
    pub capital_round_3: Money,
}

impl EquityConstants {
    /// Contributed capital, i.e. every equity line except retained earnings.
    pub fn total(&self) -> Money {
        self.paid_in_capital
            + self.common_stock
            + self.preferred_stock
            + self.capital_round_1
            + self.capital_round_2
            + self.capital_round_3
    }
}

#[cfg(test)]
pub(crate) fn sample_assumptions() -> AssumptionSet {
    load::from_yaml_str(include_str!("../../tests/fixtures/client_config.yaml"))
        .expect("fixture config must parse")
}
