//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Errors that can occur during formula parsing or evaluation
///
/// All variants are recoverable and carry enough context to be shown to the
/// user verbatim. Evaluation is deterministic, so none of these are worth
/// retrying.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// Malformed expression text
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Identifier not found in bindings or the constant library
    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    /// Call to a function not in the library
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// The computed result is NaN or infinite
    #[error("Result is not a finite number")]
    NonFiniteResult,
}

impl EvalError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        EvalError::Syntax {
            position,
            message: message.into(),
        }
    }
}
