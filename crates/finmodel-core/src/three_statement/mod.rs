pub mod balance;
pub mod cash_flow;
pub mod income;
pub mod invariant;
pub mod lines;
pub mod model;

pub use balance::{BalanceSheetDraft, BalanceSheetRow};
pub use cash_flow::CashFlowRow;
pub use income::IncomeStatementRow;
pub use invariant::{BalanceCheckReport, BALANCE_TOLERANCE};
pub use lines::{LineItems, NamedAmount, Statement};
pub use model::{build_projection, ProjectionOutput, ProjectionSummary};
