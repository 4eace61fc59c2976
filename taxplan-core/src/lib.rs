//! Core of the Thai personal income tax planner: the data model, the pure
//! tax computations, validated plan edits and the storage seam.

pub mod calculations;
pub mod db;
pub mod editor;
pub mod models;

pub use calculations::{
    BracketEngine, BracketTax, CalculationError, derive_expenses_from_incomes, progressive_tax,
    reconcile_expenses, standard_expense, summarize,
};
pub use db::{DbConfig, PlanRepository, RepositoryError, RepositoryFactory, RepositoryRegistry};
pub use editor::{DeductionUpdate, IncomeDraft, PlanEditError, PlanEditor};
pub use models::*;
