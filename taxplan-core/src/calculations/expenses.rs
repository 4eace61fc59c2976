//! Standard-expense derivation and override-preserving regeneration.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::calculations::CalculationError;
use crate::calculations::common::round_to_whole;
use crate::models::{ExpenseItem, IncomeCategory, IncomeItem, TaxSchedule};

/// Statutory expense for `gross_amount` of income in category
/// `category_code`, under the built-in schedule.
///
/// # Errors
///
/// [`CalculationError::UnknownCategoryCode`] when the code is not 1–8.
pub fn standard_expense(
    category_code: u8,
    gross_amount: Decimal,
) -> Result<Decimal, CalculationError> {
    let category = IncomeCategory::try_from(category_code)?;
    TaxSchedule::default().standard_expense(category, gross_amount)
}

/// Fresh expenses for `incomes`, keeping the manual overrides already present
/// in `existing_expenses`. See [`reconcile_expenses`] for how they are matched.
pub fn derive_expenses_from_incomes(
    incomes: &[IncomeItem],
    existing_expenses: &[ExpenseItem],
) -> Result<Vec<ExpenseItem>, CalculationError> {
    TaxSchedule::default().derive_expenses(incomes, existing_expenses)
}

impl TaxSchedule {
    /// `round(gross_amount × rate)` for the category's rate in this schedule.
    pub fn standard_expense(
        &self,
        category: IncomeCategory,
        gross_amount: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let rate = self.expense_rate(category)?;
        Ok(round_to_whole(gross_amount * rate))
    }

    /// The expense this schedule derives for a single income, with no
    /// override applied.
    pub fn default_expense(
        &self,
        income: &IncomeItem,
    ) -> Result<ExpenseItem, CalculationError> {
        let rate = self.expense_rate(income.category)?;
        Ok(ExpenseItem {
            id: ExpenseItem::derived_id(&income.id),
            category: income.category,
            description: format!("Expenses for {}", income.description),
            amount: round_to_whole(income.amount * rate),
            is_manual_override: false,
            default_percentage: rate,
        })
    }

    /// One expense per income, in income order.
    ///
    /// # Errors
    ///
    /// [`CalculationError::MissingExpenseRate`] if an income's category has
    /// no rate in this schedule.
    pub fn derive_expenses(
        &self,
        incomes: &[IncomeItem],
        existing_expenses: &[ExpenseItem],
    ) -> Result<Vec<ExpenseItem>, CalculationError> {
        let fresh = incomes
            .iter()
            .map(|income| self.default_expense(income))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reconcile_expenses(fresh, existing_expenses))
    }
}

/// Replaces freshly derived expenses with the manual overrides in `existing`.
///
/// An override first claims the fresh expense with the same id and
/// category. An override whose id matches no fresh expense falls back to
/// the first unclaimed fresh expense of its category, so each override is
/// used at most once and ids stay unique. Overrides whose id now belongs to
/// an expense of another category are dropped, as are non-overridden
/// entries in `existing`.
///
/// Only overrides are considered. An earlier non-overridden expense of the
/// same category does not shadow a later override.
pub fn reconcile_expenses(
    fresh: Vec<ExpenseItem>,
    existing: &[ExpenseItem],
) -> Vec<ExpenseItem> {
    let (by_id, mut by_category) = {
        let fresh_categories: HashMap<&str, IncomeCategory> = fresh
            .iter()
            .map(|e| (e.id.as_str(), e.category))
            .collect();

        let mut by_id: HashMap<&str, &ExpenseItem> = HashMap::new();
        let mut by_category: HashMap<IncomeCategory, &ExpenseItem> = HashMap::new();
        for expense in existing.iter().filter(|e| e.is_manual_override) {
            match fresh_categories.get(expense.id.as_str()) {
                Some(&category) if category == expense.category => {
                    by_id.entry(expense.id.as_str()).or_insert(expense);
                }
                Some(_) => {
                    trace!(id = %expense.id, "dropping override for a re-categorized income");
                }
                None => {
                    by_category.entry(expense.category).or_insert(expense);
                }
            }
        }
        (by_id, by_category)
    };

    let merged: Vec<ExpenseItem> = fresh
        .into_iter()
        .map(|expense| {
            let kept = by_id
                .get(expense.id.as_str())
                .copied()
                .or_else(|| by_category.remove(&expense.category));
            match kept {
                Some(kept) => {
                    trace!(category = expense.category.code(), id = %kept.id, "keeping manual override");
                    kept.clone()
                }
                None => expense,
            }
        })
        .collect();

    debug!(
        expenses = merged.len(),
        overrides = merged.iter().filter(|e| e.is_manual_override).count(),
        "reconciled expenses"
    );
    merged
}
