//! # formulary-store
//!
//! In-memory store of named formulas. The store owns formula records and
//! their lifecycle (create/list/delete); it never evaluates anything — the
//! engine treats a stored `formula_string` as immutable input text.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when mutating the store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A formula with the requested name already exists
    #[error("A formula named '{0}' already exists.")]
    DuplicateName(String),

    /// No formula with the requested id
    #[error("Formula not found")]
    NotFound,
}

/// A stored formula
///
/// Serialized with snake_case keys, which is what API consumers read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub id: Uuid,
    pub name: String,
    pub formula_string: String,
    pub result_label: String,
}

/// In-memory formula store
///
/// Not internally synchronized; callers that share a store across threads
/// wrap it in a lock.
#[derive(Debug, Default)]
pub struct FormulaStore {
    formulas: Vec<Formula>,
}

impl FormulaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a few example formulas
    pub fn with_examples() -> Self {
        let mut store = Self::new();
        for (name, formula_string, result_label) in [
            ("Area of Rectangle", "length * width", "Area"),
            (
                "Simple Interest",
                "(principal * rate * time) / 100",
                "Interest",
            ),
            ("Pythagorean Theorem", "sqrt(a^2 + b^2)", "Hypotenuse (c)"),
        ] {
            // Fresh store, fixed distinct names: cannot collide
            let _ = store.create(name, formula_string, result_label);
        }
        store
    }

    /// All stored formulas, in insertion order
    pub fn list(&self) -> &[Formula] {
        &self.formulas
    }

    /// Add a formula, rejecting duplicate names
    pub fn create(
        &mut self,
        name: impl Into<String>,
        formula_string: impl Into<String>,
        result_label: impl Into<String>,
    ) -> StoreResult<Formula> {
        let name = name.into();

        if self.formulas.iter().any(|f| f.name == name) {
            return Err(StoreError::DuplicateName(name));
        }

        let formula = Formula {
            id: Uuid::new_v4(),
            name,
            formula_string: formula_string.into(),
            result_label: result_label.into(),
        };
        self.formulas.push(formula.clone());
        Ok(formula)
    }

    /// Remove a formula by id
    pub fn delete(&mut self, id: Uuid) -> StoreResult<()> {
        let initial_count = self.formulas.len();
        self.formulas.retain(|f| f.id != id);

        if self.formulas.len() == initial_count {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Number of stored formulas
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list() {
        let mut store = FormulaStore::new();
        assert!(store.is_empty());

        let formula = store.create("Area", "length * width", "Area").unwrap();
        assert_eq!(formula.name, "Area");
        assert_eq!(formula.formula_string, "length * width");

        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0], formula);
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let mut store = FormulaStore::new();
        store.create("Area", "length * width", "Area").unwrap();

        let err = store.create("Area", "pi * r^2", "Area").unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("Area".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut store = FormulaStore::new();
        let formula = store.create("Area", "length * width", "Area").unwrap();

        store.delete(formula.id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = FormulaStore::new();
        assert_eq!(store.delete(Uuid::new_v4()).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn test_examples_seeded() {
        let store = FormulaStore::with_examples();
        assert_eq!(store.len(), 3);

        let names: Vec<_> = store.list().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Area of Rectangle", "Simple Interest", "Pythagorean Theorem"]
        );
    }

    #[test]
    fn test_formula_serializes_snake_case() {
        let formula = Formula {
            id: Uuid::nil(),
            name: "Area".into(),
            formula_string: "length * width".into(),
            result_label: "Area".into(),
        };

        let json = serde_json::to_value(&formula).unwrap();
        assert_eq!(json["formula_string"], "length * width");
        assert_eq!(json["result_label"], "Area");
    }
}
