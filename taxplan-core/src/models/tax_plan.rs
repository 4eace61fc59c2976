use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DeductionItem, ExpenseItem, IncomeItem};

/// A named tax plan for one tax year. Owns its income, expense and
/// deduction lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPlan {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    /// Refreshed by the repository on every save.
    pub updated_at: DateTime<Utc>,
    pub incomes: Vec<IncomeItem>,
    pub expenses: Vec<ExpenseItem>,
    pub deductions: Vec<DeductionItem>,
}

impl TaxPlan {
    /// An empty plan with a fresh id. Name validation happens in
    /// [`crate::editor::PlanEditor::create_plan`].
    pub fn new(
        name: impl Into<String>,
        year: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: name.into(),
            year,
            created_at: now,
            updated_at: now,
            incomes: Vec::new(),
            expenses: Vec::new(),
            deductions: Vec::new(),
        }
    }

    pub fn income(
        &self,
        id: &str,
    ) -> Option<&IncomeItem> {
        self.incomes.iter().find(|i| i.id == id)
    }

    pub fn expense(
        &self,
        id: &str,
    ) -> Option<&ExpenseItem> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn deduction(
        &self,
        id: &str,
    ) -> Option<&DeductionItem> {
        self.deductions.iter().find(|d| d.id == id)
    }
}

/// Opaque identifier for plans and their line items.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
