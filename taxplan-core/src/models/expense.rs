use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::IncomeCategory;

/// Prefix of the expense id derived from an income id.
pub const EXPENSE_ID_PREFIX: &str = "expense-";

/// A deductible expense tied to an income category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    pub category: IncomeCategory,
    pub description: String,
    pub amount: Decimal,
    /// Set when the user replaced the statutory amount. Overridden items
    /// survive expense regeneration.
    pub is_manual_override: bool,
    /// Statutory rate that applies absent an override (e.g. `0.60`).
    pub default_percentage: Decimal,
}

impl ExpenseItem {
    /// Id of the expense derived from the income with `income_id`.
    pub fn derived_id(income_id: &str) -> String {
        format!("{EXPENSE_ID_PREFIX}{income_id}")
    }
}
