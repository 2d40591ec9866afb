use thiserror::Error;

/// Error types for the engine module
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),

    /// A closing/due day outside the 1-31 range reached the calculator.
    #[error("Invalid day of month: {0}")]
    InvalidDay(u32),

    /// An installment series must have at least one installment.
    #[error("Invalid installment count: {0}")]
    InvalidInstallmentCount(u32),

    /// Occurrence generation was asked to expand a row that is not a fixed
    /// definition.
    #[error("Transaction {0} is not a fixed definition")]
    NotADefinition(i32),
}

/// Type alias for Result with EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
