//! Validated edits to a [`TaxPlan`].
//!
//! Every operation takes the current plan by reference and returns the
//! edited copy; the input plan is never modified. After each edit the
//! expense list is regenerated from the incomes, keeping manual overrides.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxplan_core::editor::{IncomeDraft, PlanEditor};
//! use taxplan_core::{IncomeCategory, summarize};
//!
//! let editor = PlanEditor::default();
//! let plan = editor.create_plan("Freelance 2024", 2024).unwrap();
//! let plan = editor
//!     .add_income(
//!         &plan,
//!         IncomeDraft {
//!             category: IncomeCategory::ProfessionalFees,
//!             description: "Consulting".to_string(),
//!             amount: dec!(400000),
//!             withholding_tax: dec!(12000),
//!         },
//!     )
//!     .unwrap();
//!
//! assert_eq!(plan.expenses[0].amount, dec!(240000));
//! assert_eq!(summarize(&plan).refund_due, Some(dec!(11500)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::CalculationError;
use crate::models::{
    DeductionCategory, DeductionItem, IncomeCategory, IncomeItem, StandardDeduction, TaxPlan,
    TaxSchedule, generate_id,
};

/// Reasons an edit is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanEditError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("deduction '{0}' has already been added")]
    DuplicateDeduction(String),

    #[error("deduction '{0}' is a standard deduction; only its amount can change")]
    NotCustom(String),

    #[error("no income of category {0} to derive a default expense from")]
    NoMatchingIncome(u8),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

/// User input for a new or replaced income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeDraft {
    pub category: IncomeCategory,
    pub description: String,
    pub amount: Decimal,
    pub withholding_tax: Decimal,
}

/// Changes to an existing deduction. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionUpdate {
    pub name: Option<String>,
    pub amount: Decimal,
    pub category: Option<DeductionCategory>,
}

impl DeductionUpdate {
    pub fn amount(amount: Decimal) -> Self {
        Self {
            name: None,
            amount,
            category: None,
        }
    }
}

/// Applies edits under one tax schedule.
#[derive(Debug, Clone, Default)]
pub struct PlanEditor {
    schedule: TaxSchedule,
}

impl PlanEditor {
    pub fn new(schedule: TaxSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }

    /// An empty plan named `name` (trimmed).
    pub fn create_plan(
        &self,
        name: &str,
        year: i32,
    ) -> Result<TaxPlan, PlanEditError> {
        let name = required_text("plan name", name)?;
        Ok(TaxPlan::new(name, year))
    }

    pub fn rename_plan(
        &self,
        plan: &TaxPlan,
        name: &str,
    ) -> Result<TaxPlan, PlanEditError> {
        let name = required_text("plan name", name)?;
        Ok(TaxPlan {
            name,
            ..plan.clone()
        })
    }

    pub fn add_income(
        &self,
        plan: &TaxPlan,
        draft: IncomeDraft,
    ) -> Result<TaxPlan, PlanEditError> {
        let income = validate_income(generate_id(), draft)?;
        let mut edited = plan.clone();
        edited.incomes.push(income);
        self.reconcile(edited)
    }

    /// Replaces the income with `income_id`, keeping its id and position.
    pub fn update_income(
        &self,
        plan: &TaxPlan,
        income_id: &str,
        draft: IncomeDraft,
    ) -> Result<TaxPlan, PlanEditError> {
        let position = plan
            .incomes
            .iter()
            .position(|i| i.id == income_id)
            .ok_or_else(|| not_found("income", income_id))?;

        let income = validate_income(income_id.to_string(), draft)?;
        let mut edited = plan.clone();
        edited.incomes[position] = income;
        self.reconcile(edited)
    }

    pub fn remove_income(
        &self,
        plan: &TaxPlan,
        income_id: &str,
    ) -> Result<TaxPlan, PlanEditError> {
        if plan.income(income_id).is_none() {
            return Err(not_found("income", income_id));
        }

        let mut edited = plan.clone();
        edited.incomes.retain(|i| i.id != income_id);
        self.reconcile(edited)
    }

    /// Sets a user-chosen amount on an expense. The expense then survives
    /// regeneration until reset. Other expenses of the same category keep
    /// their own amounts.
    pub fn override_expense(
        &self,
        plan: &TaxPlan,
        expense_id: &str,
        amount: Decimal,
    ) -> Result<TaxPlan, PlanEditError> {
        if amount < Decimal::ZERO {
            return Err(rejected(PlanEditError::NegativeAmount {
                field: "expense amount",
                value: amount,
            }));
        }

        if plan.expense(expense_id).is_none() {
            return Err(not_found("expense", expense_id));
        }

        let mut edited = plan.clone();
        for expense in edited.expenses.iter_mut().filter(|e| e.id == expense_id) {
            expense.amount = amount;
            expense.is_manual_override = true;
        }

        self.reconcile(edited)
    }

    /// Drops a manual override so the statutory amount applies again.
    ///
    /// Fails with [`PlanEditError::NoMatchingIncome`] when no income of the
    /// expense's category remains.
    pub fn reset_expense(
        &self,
        plan: &TaxPlan,
        expense_id: &str,
    ) -> Result<TaxPlan, PlanEditError> {
        let category = plan
            .expense(expense_id)
            .map(|e| e.category)
            .ok_or_else(|| not_found("expense", expense_id))?;

        if !plan.incomes.iter().any(|i| i.category == category) {
            return Err(rejected(PlanEditError::NoMatchingIncome(category.code())));
        }

        // Plans saved with a duplicated override id carry several copies.
        let mut edited = plan.clone();
        for expense in edited.expenses.iter_mut().filter(|e| e.id == expense_id) {
            expense.is_manual_override = false;
        }

        self.reconcile(edited)
    }

    /// Adds a deduction from a template. A plan holds at most one
    /// standard deduction per name.
    pub fn add_standard_deduction(
        &self,
        plan: &TaxPlan,
        template: &StandardDeduction,
        amount: Decimal,
    ) -> Result<TaxPlan, PlanEditError> {
        positive_amount("deduction amount", amount)?;

        if plan
            .deductions
            .iter()
            .any(|d| !d.is_custom && d.name == template.name)
        {
            return Err(rejected(PlanEditError::DuplicateDeduction(
                template.name.clone(),
            )));
        }

        if let Some(max) = template.max_amount {
            if amount > max {
                // The ceiling is informational; the amount is kept as entered.
                warn!(deduction = %template.name, %amount, %max, "deduction exceeds statutory maximum");
            }
        }

        let mut edited = plan.clone();
        edited.deductions.push(DeductionItem {
            id: generate_id(),
            name: template.name.clone(),
            amount,
            is_custom: false,
            category: template.category,
        });
        self.reconcile(edited)
    }

    pub fn add_custom_deduction(
        &self,
        plan: &TaxPlan,
        name: &str,
        amount: Decimal,
        category: DeductionCategory,
    ) -> Result<TaxPlan, PlanEditError> {
        let name = required_text("deduction name", name)?;
        positive_amount("deduction amount", amount)?;

        let mut edited = plan.clone();
        edited.deductions.push(DeductionItem {
            id: generate_id(),
            name,
            amount,
            is_custom: true,
            category,
        });
        self.reconcile(edited)
    }

    /// Applies `update` to the deduction with `deduction_id`. A standard
    /// deduction only accepts a new amount.
    pub fn update_deduction(
        &self,
        plan: &TaxPlan,
        deduction_id: &str,
        update: DeductionUpdate,
    ) -> Result<TaxPlan, PlanEditError> {
        positive_amount("deduction amount", update.amount)?;
        let name = update
            .name
            .as_deref()
            .map(|n| required_text("deduction name", n))
            .transpose()?;

        let mut edited = plan.clone();
        let deduction = edited
            .deductions
            .iter_mut()
            .find(|d| d.id == deduction_id)
            .ok_or_else(|| not_found("deduction", deduction_id))?;

        if !deduction.is_custom && (name.is_some() || update.category.is_some()) {
            return Err(rejected(PlanEditError::NotCustom(deduction_id.to_string())));
        }
        if let Some(name) = name {
            deduction.name = name;
        }
        if let Some(category) = update.category {
            deduction.category = category;
        }
        deduction.amount = update.amount;

        self.reconcile(edited)
    }

    pub fn remove_deduction(
        &self,
        plan: &TaxPlan,
        deduction_id: &str,
    ) -> Result<TaxPlan, PlanEditError> {
        if plan.deduction(deduction_id).is_none() {
            return Err(not_found("deduction", deduction_id));
        }

        let mut edited = plan.clone();
        edited.deductions.retain(|d| d.id != deduction_id);
        self.reconcile(edited)
    }

    /// Regenerates the plan's expenses from its incomes.
    pub fn reconcile(
        &self,
        mut plan: TaxPlan,
    ) -> Result<TaxPlan, PlanEditError> {
        plan.expenses = self
            .schedule
            .derive_expenses(&plan.incomes, &plan.expenses)
            .inspect_err(|error| warn!(%error, plan = %plan.id, "expense derivation failed"))?;
        debug!(plan = %plan.id, incomes = plan.incomes.len(), "plan edited");
        Ok(plan)
    }
}

fn validate_income(
    id: String,
    draft: IncomeDraft,
) -> Result<IncomeItem, PlanEditError> {
    let description = required_text("income description", &draft.description)?;
    positive_amount("income amount", draft.amount)?;
    if draft.withholding_tax < Decimal::ZERO {
        return Err(rejected(PlanEditError::NegativeAmount {
            field: "withholding tax",
            value: draft.withholding_tax,
        }));
    }

    Ok(IncomeItem {
        id,
        category: draft.category,
        description,
        amount: draft.amount,
        withholding_tax: draft.withholding_tax,
    })
}

fn required_text(
    field: &'static str,
    value: &str,
) -> Result<String, PlanEditError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(rejected(PlanEditError::EmptyField { field }));
    }
    Ok(trimmed.to_string())
}

fn positive_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), PlanEditError> {
    if value <= Decimal::ZERO {
        return Err(rejected(PlanEditError::NonPositiveAmount { field, value }));
    }
    Ok(())
}

fn not_found(
    kind: &'static str,
    id: &str,
) -> PlanEditError {
    rejected(PlanEditError::NotFound {
        kind,
        id: id.to_string(),
    })
}

fn rejected(error: PlanEditError) -> PlanEditError {
    warn!(%error, "plan edit rejected");
    error
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::summarize;
    use crate::models::{THAI_BRACKETS_2024, default_standard_deductions};

    fn editor() -> PlanEditor {
        PlanEditor::default()
    }

    fn draft(
        category: IncomeCategory,
        amount: Decimal,
    ) -> IncomeDraft {
        IncomeDraft {
            category,
            description: "  Consulting  ".to_string(),
            amount,
            withholding_tax: dec!(0),
        }
    }

    fn personal_template() -> StandardDeduction {
        default_standard_deductions()
            .into_iter()
            .find(|d| d.id == "personal-deduction")
            .unwrap()
    }

    fn plan_with_income(
        category: IncomeCategory,
        amount: Decimal,
    ) -> TaxPlan {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        editor().add_income(&plan, draft(category, amount)).unwrap()
    }

    // =========================================================================
    // plan tests
    // =========================================================================

    #[test]
    fn create_plan_trims_name() {
        let plan = editor().create_plan("  My plan ", 2024).unwrap();

        assert_eq!(plan.name, "My plan");
        assert_eq!(plan.year, 2024);
    }

    #[test]
    fn create_plan_rejects_blank_name() {
        assert_eq!(
            editor().create_plan("   ", 2024),
            Err(PlanEditError::EmptyField { field: "plan name" })
        );
    }

    #[test]
    fn rename_plan_keeps_contents() {
        let plan = plan_with_income(IncomeCategory::Employment, dec!(100));

        let renamed = editor().rename_plan(&plan, "Renamed").unwrap();

        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.id, plan.id);
        assert_eq!(renamed.incomes, plan.incomes);
    }

    // =========================================================================
    // income tests
    // =========================================================================

    #[test]
    fn add_income_derives_matching_expense() {
        let plan = plan_with_income(IncomeCategory::RentalProperty, dec!(100000));

        assert_eq!(plan.incomes.len(), 1);
        assert_eq!(plan.incomes[0].description, "Consulting");
        assert_eq!(plan.expenses.len(), 1);
        assert_eq!(plan.expenses[0].id, format!("expense-{}", plan.incomes[0].id));
        assert_eq!(plan.expenses[0].amount, dec!(30000));
    }

    #[test]
    fn add_income_does_not_touch_the_original_plan() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        let _ = editor()
            .add_income(&plan, draft(IncomeCategory::Employment, dec!(1)))
            .unwrap();

        assert!(plan.incomes.is_empty());
    }

    #[test]
    fn add_income_rejects_non_positive_amount() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        let result = editor().add_income(&plan, draft(IncomeCategory::Employment, dec!(0)));

        assert_eq!(
            result,
            Err(PlanEditError::NonPositiveAmount {
                field: "income amount",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn add_income_rejects_blank_description() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let mut input = draft(IncomeCategory::Employment, dec!(10));
        input.description = " ".to_string();

        assert_eq!(
            editor().add_income(&plan, input),
            Err(PlanEditError::EmptyField {
                field: "income description"
            })
        );
    }

    #[test]
    fn add_income_rejects_negative_withholding() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let mut input = draft(IncomeCategory::Employment, dec!(10));
        input.withholding_tax = dec!(-1);

        assert!(matches!(
            editor().add_income(&plan, input),
            Err(PlanEditError::NegativeAmount { field: "withholding tax", .. })
        ));
    }

    #[test]
    fn update_income_replaces_in_place() {
        let plan = plan_with_income(IncomeCategory::Employment, dec!(100000));
        let plan = editor()
            .add_income(&plan, draft(IncomeCategory::Goodwill, dec!(5000)))
            .unwrap();
        let first_id = plan.incomes[0].id.clone();

        let updated = editor()
            .update_income(&plan, &first_id, draft(IncomeCategory::OtherIncome, dec!(20000)))
            .unwrap();

        assert_eq!(updated.incomes[0].id, first_id);
        assert_eq!(updated.incomes[0].category, IncomeCategory::OtherIncome);
        assert_eq!(updated.expenses[0].amount, dec!(12000));
        assert_eq!(updated.incomes[1], plan.incomes[1]);
    }

    #[test]
    fn update_unknown_income_is_not_found() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        let result =
            editor().update_income(&plan, "missing", draft(IncomeCategory::Employment, dec!(1)));

        assert_eq!(
            result,
            Err(PlanEditError::NotFound {
                kind: "income",
                id: "missing".to_string(),
            })
        );
    }

    #[test]
    fn remove_income_drops_its_expense() {
        let plan = plan_with_income(IncomeCategory::Goodwill, dec!(1000));
        let id = plan.incomes[0].id.clone();

        let edited = editor().remove_income(&plan, &id).unwrap();

        assert!(edited.incomes.is_empty());
        assert!(edited.expenses.is_empty());
    }

    // =========================================================================
    // expense tests
    // =========================================================================

    #[test]
    fn override_expense_survives_income_edits() {
        let plan = plan_with_income(IncomeCategory::ProfessionalFees, dec!(100000));
        let expense_id = plan.expenses[0].id.clone();
        let income_id = plan.incomes[0].id.clone();

        let plan = editor()
            .override_expense(&plan, &expense_id, dec!(15000))
            .unwrap();
        let plan = editor()
            .update_income(
                &plan,
                &income_id,
                draft(IncomeCategory::ProfessionalFees, dec!(900000)),
            )
            .unwrap();

        assert_eq!(plan.expenses[0].amount, dec!(15000));
        assert!(plan.expenses[0].is_manual_override);
    }

    #[test]
    fn override_expense_accepts_zero_but_not_negative() {
        let plan = plan_with_income(IncomeCategory::ProfessionalFees, dec!(100000));
        let expense_id = plan.expenses[0].id.clone();

        assert!(editor().override_expense(&plan, &expense_id, dec!(0)).is_ok());
        assert!(matches!(
            editor().override_expense(&plan, &expense_id, dec!(-1)),
            Err(PlanEditError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn reset_expense_restores_statutory_amount() {
        let plan = plan_with_income(IncomeCategory::ProfessionalFees, dec!(100000));
        let expense_id = plan.expenses[0].id.clone();
        let plan = editor()
            .override_expense(&plan, &expense_id, dec!(1))
            .unwrap();

        let reset = editor().reset_expense(&plan, &expense_id).unwrap();

        assert_eq!(reset.expenses[0].amount, dec!(60000));
        assert!(!reset.expenses[0].is_manual_override);
    }

    #[test]
    fn reset_expense_requires_income_of_same_category() {
        let mut plan = plan_with_income(IncomeCategory::Goodwill, dec!(100000));
        plan.incomes.clear();

        let expense_id = plan.expenses[0].id.clone();
        let result = editor().reset_expense(&plan, &expense_id);

        assert_eq!(result, Err(PlanEditError::NoMatchingIncome(3)));
    }

    fn plan_with_two_fee_incomes() -> TaxPlan {
        let plan = plan_with_income(IncomeCategory::ProfessionalFees, dec!(100000));
        editor()
            .add_income(&plan, draft(IncomeCategory::ProfessionalFees, dec!(200000)))
            .unwrap()
    }

    fn expense_rows(plan: &TaxPlan) -> Vec<(String, Decimal, bool)> {
        plan.expenses
            .iter()
            .map(|e| (e.id.clone(), e.amount, e.is_manual_override))
            .collect()
    }

    #[test]
    fn override_in_shared_category_touches_one_expense() {
        let plan = plan_with_two_fee_incomes();
        let first_id = plan.expenses[0].id.clone();
        let second_id = plan.expenses[1].id.clone();

        let plan = editor()
            .override_expense(&plan, &second_id, dec!(5))
            .unwrap();

        assert_eq!(
            expense_rows(&plan),
            vec![(first_id, dec!(60000), false), (second_id, dec!(5), true)]
        );
        assert_eq!(summarize(&plan).total_expenses, dec!(60005));
    }

    #[test]
    fn reset_in_shared_category_restores_standard_amounts() {
        let plan = plan_with_two_fee_incomes();
        let second_id = plan.expenses[1].id.clone();
        let plan = editor()
            .override_expense(&plan, &second_id, dec!(5))
            .unwrap();

        let reset = editor().reset_expense(&plan, &second_id).unwrap();

        assert_eq!(
            reset
                .expenses
                .iter()
                .map(|e| (e.amount, e.is_manual_override))
                .collect::<Vec<_>>(),
            vec![(dec!(60000), false), (dec!(120000), false)]
        );
        assert_eq!(summarize(&reset).total_expenses, dec!(180000));

        let again = editor().reconcile(reset.clone()).unwrap();
        assert_eq!(again.expenses, reset.expenses);
    }

    #[test]
    fn both_overrides_in_shared_category_are_kept() {
        let plan = plan_with_two_fee_incomes();
        let first_id = plan.expenses[0].id.clone();
        let second_id = plan.expenses[1].id.clone();

        let plan = editor().override_expense(&plan, &first_id, dec!(1)).unwrap();
        let plan = editor().override_expense(&plan, &second_id, dec!(2)).unwrap();
        let plan = editor().reset_expense(&plan, &first_id).unwrap();

        assert_eq!(
            expense_rows(&plan),
            vec![(first_id, dec!(60000), false), (second_id, dec!(2), true)]
        );
    }

    #[test]
    fn reset_clears_duplicated_override_copies() {
        let mut plan = plan_with_two_fee_incomes();
        let shared_id = plan.expenses[1].id.clone();
        for expense in plan.expenses.iter_mut() {
            expense.id = shared_id.clone();
            expense.amount = dec!(5);
            expense.is_manual_override = true;
        }

        let reset = editor().reset_expense(&plan, &shared_id).unwrap();

        assert!(reset.expenses.iter().all(|e| !e.is_manual_override));
        assert_eq!(summarize(&reset).total_expenses, dec!(180000));
    }

    #[test]
    fn override_unknown_expense_is_not_found() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        assert!(matches!(
            editor().override_expense(&plan, "nope", dec!(1)),
            Err(PlanEditError::NotFound { kind: "expense", .. })
        ));
    }

    #[test]
    fn missing_expense_rate_is_surfaced() {
        let schedule = TaxSchedule::new(
            2032,
            THAI_BRACKETS_2024.to_vec(),
            vec![(IncomeCategory::Employment, dec!(0))],
        )
        .unwrap();
        let editor = PlanEditor::new(schedule);
        let plan = editor.create_plan("Plan", 2032).unwrap();

        let result = editor.add_income(&plan, draft(IncomeCategory::Goodwill, dec!(10)));

        assert_eq!(
            result,
            Err(PlanEditError::Calculation(
                CalculationError::MissingExpenseRate {
                    category_code: 3,
                    tax_year: 2032,
                }
            ))
        );
    }

    // =========================================================================
    // deduction tests
    // =========================================================================

    #[test]
    fn add_standard_deduction_copies_template() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        let plan = editor()
            .add_standard_deduction(&plan, &personal_template(), dec!(60000))
            .unwrap();

        let deduction = &plan.deductions[0];
        assert_eq!(deduction.name, personal_template().name);
        assert_eq!(deduction.amount, dec!(60000));
        assert!(!deduction.is_custom);
        assert_eq!(deduction.category, DeductionCategory::Personal);
    }

    #[test]
    fn duplicate_standard_deduction_is_rejected() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_standard_deduction(&plan, &personal_template(), dec!(60000))
            .unwrap();

        let result = editor().add_standard_deduction(&plan, &personal_template(), dec!(100));

        assert_eq!(
            result,
            Err(PlanEditError::DuplicateDeduction(personal_template().name))
        );
    }

    #[test]
    fn custom_deduction_may_share_a_standard_name() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let template = personal_template();
        let plan = editor()
            .add_custom_deduction(&plan, &template.name, dec!(10), DeductionCategory::Other)
            .unwrap();

        let plan = editor()
            .add_standard_deduction(&plan, &template, dec!(60000))
            .unwrap();

        assert_eq!(plan.deductions.len(), 2);
    }

    #[test]
    fn standard_deduction_above_maximum_is_kept_as_entered() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        let plan = editor()
            .add_standard_deduction(&plan, &personal_template(), dec!(75000))
            .unwrap();

        assert_eq!(plan.deductions[0].amount, dec!(75000));
    }

    #[test]
    fn custom_deduction_requires_name_and_positive_amount() {
        let plan = editor().create_plan("Plan", 2024).unwrap();

        assert!(matches!(
            editor().add_custom_deduction(&plan, "", dec!(10), DeductionCategory::Other),
            Err(PlanEditError::EmptyField { .. })
        ));
        assert!(matches!(
            editor().add_custom_deduction(&plan, "Gym", dec!(-10), DeductionCategory::Other),
            Err(PlanEditError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn update_custom_deduction_changes_all_fields() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_custom_deduction(&plan, "Gym", dec!(10), DeductionCategory::Other)
            .unwrap();
        let id = plan.deductions[0].id.clone();

        let plan = editor()
            .update_deduction(
                &plan,
                &id,
                DeductionUpdate {
                    name: Some(" Charity ".to_string()),
                    amount: dec!(500),
                    category: Some(DeductionCategory::Donation),
                },
            )
            .unwrap();

        assert_eq!(plan.deductions[0].name, "Charity");
        assert_eq!(plan.deductions[0].amount, dec!(500));
        assert_eq!(plan.deductions[0].category, DeductionCategory::Donation);
    }

    #[test]
    fn update_keeps_fields_left_as_none() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_custom_deduction(&plan, "Gym", dec!(10), DeductionCategory::Other)
            .unwrap();
        let id = plan.deductions[0].id.clone();

        let plan = editor()
            .update_deduction(&plan, &id, DeductionUpdate::amount(dec!(20)))
            .unwrap();

        assert_eq!(plan.deductions[0].name, "Gym");
        assert_eq!(plan.deductions[0].category, DeductionCategory::Other);
        assert_eq!(plan.deductions[0].amount, dec!(20));
    }

    #[test]
    fn standard_deduction_only_changes_amount() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_standard_deduction(&plan, &personal_template(), dec!(60000))
            .unwrap();
        let id = plan.deductions[0].id.clone();

        let renamed = editor().update_deduction(
            &plan,
            &id,
            DeductionUpdate {
                name: Some("Other".to_string()),
                amount: dec!(1),
                category: None,
            },
        );
        let updated = editor()
            .update_deduction(&plan, &id, DeductionUpdate::amount(dec!(30000)))
            .unwrap();

        assert_eq!(renamed, Err(PlanEditError::NotCustom(id)));
        assert_eq!(updated.deductions[0].amount, dec!(30000));
    }

    #[test]
    fn update_deduction_rejects_non_positive_amount() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_custom_deduction(&plan, "Gym", dec!(10), DeductionCategory::Other)
            .unwrap();
        let id = plan.deductions[0].id.clone();

        assert!(matches!(
            editor().update_deduction(&plan, &id, DeductionUpdate::amount(dec!(0))),
            Err(PlanEditError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn remove_deduction_filters_by_id() {
        let plan = editor().create_plan("Plan", 2024).unwrap();
        let plan = editor()
            .add_custom_deduction(&plan, "Gym", dec!(10), DeductionCategory::Other)
            .unwrap();
        let id = plan.deductions[0].id.clone();

        let plan = editor().remove_deduction(&plan, &id).unwrap();

        assert!(plan.deductions.is_empty());
        assert!(matches!(
            editor().remove_deduction(&plan, &id),
            Err(PlanEditError::NotFound { kind: "deduction", .. })
        ));
    }
}
