pub mod assumptions;
pub mod calendar;
pub mod error;
pub mod three_statement;
pub mod types;

pub use error::ModelError;
pub use types::*;

/// Standard result type for the projection engine
pub type ModelResult<T> = Result<T, ModelError>;
