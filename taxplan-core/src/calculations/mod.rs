//! Pure tax computations: progressive brackets, standard expenses and
//! plan summaries.
//!
//! Every function here is deterministic and side-effect free. The only
//! failure is a [`CalculationError`], which means the configured tables do
//! not cover an income category.

pub mod brackets;
pub mod common;
pub mod expenses;
pub mod summary;

use thiserror::Error;

pub use brackets::{BracketEngine, BracketTax, progressive_tax};
pub use expenses::{derive_expenses_from_incomes, reconcile_expenses, standard_expense};
pub use summary::summarize;

/// Configuration errors surfaced by the calculations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// An income category code outside 1–8.
    #[error("unknown income category code {0}")]
    UnknownCategoryCode(u8),

    /// The schedule for the tax year has no expense rate for the category.
    #[error("no standard expense rate for income category {category_code} in tax year {tax_year}")]
    MissingExpenseRate { category_code: u8, tax_year: i32 },
}
