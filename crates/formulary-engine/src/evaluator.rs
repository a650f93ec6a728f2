//! Formula evaluator
//!
//! Evaluates formula text against a set of variable bindings by walking the
//! parsed expression tree. Stateless: the result is a pure function of
//! `(formula, bindings)`, so concurrent callers need no coordination.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{EvalError, EvalResult};
use crate::functions::library;
use crate::parser::parse;
use std::collections::HashMap;

/// Variable name → value bindings for one evaluation call
///
/// Entries for variables the formula does not use are ignored.
pub type Bindings = HashMap<String, f64>;

/// Parse and evaluate a formula against the given bindings
///
/// # Example
/// ```rust
/// use formulary_engine::{evaluate, Bindings};
///
/// let mut bindings = Bindings::new();
/// bindings.insert("r".to_string(), 2.0);
/// let area = evaluate("PI * r^2", &bindings).unwrap();
/// assert!((area - 4.0 * std::f64::consts::PI).abs() < 1e-12);
/// ```
pub fn evaluate(formula: &str, bindings: &Bindings) -> EvalResult<f64> {
    let expr = parse(formula)?;
    let result = evaluate_expr(&expr, bindings)?;

    // A NaN or infinity produced anywhere in the walk surfaces here
    if !result.is_finite() {
        return Err(EvalError::NonFiniteResult);
    }

    Ok(result)
}

/// Evaluate an expression tree
pub fn evaluate_expr(expr: &Expr, bindings: &Bindings) -> EvalResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::Variable(name) => {
            // Library constants shadow bindings
            if let Some(value) = library().constant(name) {
                return Ok(value);
            }
            bindings
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone()))
        }

        Expr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, bindings),

        Expr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, bindings),

        Expr::Function { name, args } => evaluate_function(name, args, bindings),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    bindings: &Bindings,
) -> EvalResult<f64> {
    let l = evaluate_expr(left, bindings)?;
    let r = evaluate_expr(right, bindings)?;

    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Subtract => Ok(l - r),
        BinaryOperator::Multiply => Ok(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(l / r)
            }
        }
        BinaryOperator::Modulo => {
            if r == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                // Floor modulo: the result takes the divisor's sign
                Ok(l - r * (l / r).floor())
            }
        }
        // A NaN here (negative base, fractional exponent) is reported by the
        // final guard, not mid-walk
        BinaryOperator::Power => Ok(l.powf(r)),
    }
}

/// Evaluate a unary operation
fn evaluate_unary_op(op: UnaryOperator, operand: &Expr, bindings: &Bindings) -> EvalResult<f64> {
    let value = evaluate_expr(operand, bindings)?;

    match op {
        UnaryOperator::Negate => Ok(-value),
    }
}

/// Evaluate a function call
fn evaluate_function(name: &str, args: &[Expr], bindings: &Bindings) -> EvalResult<f64> {
    let func = library()
        .function(name)
        .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

    let exact = func.max_args == Some(func.min_args);

    // Check argument count before evaluating anything
    if args.len() < func.min_args {
        return Err(EvalError::ArityMismatch {
            function: name.to_string(),
            expected: if exact {
                func.min_args.to_string()
            } else {
                format!("at least {}", func.min_args)
            },
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(EvalError::ArityMismatch {
                function: name.to_string(),
                expected: if exact {
                    max.to_string()
                } else {
                    format!("at most {}", max)
                },
                actual: args.len(),
            });
        }
    }

    // Evaluate arguments left-to-right
    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(evaluate_expr(arg, bindings)?);
    }

    Ok((func.implementation)(&evaluated_args))
}
