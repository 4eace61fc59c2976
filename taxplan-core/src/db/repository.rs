use async_trait::async_trait;
use thiserror::Error;

use crate::models::{StandardDeduction, TaxPlan};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RepositoryError {
    pub fn plan_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "plan",
            id: id.to_string(),
        }
    }
}

/// Storage for tax plans and the deduction template catalogue.
///
/// Plans are stored whole: a save replaces every income, expense and
/// deduction of the plan.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    // Plans
    /// All plans, oldest first.
    async fn list_plans(&self) -> Result<Vec<TaxPlan>, RepositoryError>;

    async fn get_plan(&self, id: &str) -> Result<TaxPlan, RepositoryError>;

    /// Inserts or replaces the plan with `plan.id`, stamping `updated_at`
    /// with the current time. Returns the plan as stored.
    async fn save_plan(&self, plan: &TaxPlan) -> Result<TaxPlan, RepositoryError>;

    async fn delete_plan(&self, id: &str) -> Result<(), RepositoryError>;

    // Standard deduction templates
    /// The stored templates. When none have been stored, the built-in
    /// defaults are stored and returned.
    async fn list_standard_deductions(&self) -> Result<Vec<StandardDeduction>, RepositoryError>;

    /// Replaces the whole template catalogue.
    async fn save_standard_deductions(
        &self,
        templates: &[StandardDeduction],
    ) -> Result<(), RepositoryError>;
}
