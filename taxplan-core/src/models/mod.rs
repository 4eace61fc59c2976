mod deduction;
mod expense;
mod income;
mod standard_deduction;
mod tax_bracket;
mod tax_plan;
mod tax_schedule;
mod tax_summary;

pub use deduction::{DeductionCategory, DeductionItem};
pub use expense::{EXPENSE_ID_PREFIX, ExpenseItem};
pub use income::{IncomeCategory, IncomeItem};
pub use standard_deduction::{StandardDeduction, default_standard_deductions};
pub use tax_bracket::TaxBracket;
pub use tax_plan::{TaxPlan, generate_id};
pub use tax_schedule::{
    ScheduleError, THAI_BRACKETS_2024, THAI_EXPENSE_RATES_2024, THAI_TAX_YEAR_2024, TaxSchedule,
};
pub use tax_summary::TaxSummary;
