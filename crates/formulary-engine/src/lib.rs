//! # formulary-engine
//!
//! Formula parser and evaluator for formulary.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → number) against named variable bindings
//! - A fixed library of math constants and functions
//! - Free-variable extraction from formula text
//!
//! Formulas are untrusted user input, so evaluation never touches a
//! general-purpose interpreter: the grammar is restricted to arithmetic and
//! every failure is a typed, recoverable [`EvalError`].
//!
//! ## Example
//!
//! ```rust
//! use formulary_engine::{evaluate, extract_variables, Bindings};
//!
//! assert_eq!(extract_variables("PI * r^2"), vec!["r"]);
//!
//! let bindings: Bindings = [("r".to_string(), 1.0)].into_iter().collect();
//! let area = evaluate("PI * r^2", &bindings).unwrap();
//! assert!((area - std::f64::consts::PI).abs() < 1e-12);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod variables;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, Bindings};
pub use parser::parse;
pub use variables::extract_variables;
