//! Year-keyed tax configuration: the progressive bracket table and the
//! standard-expense rate for each income category.
//!
//! Only the 2024 Thai schedule ships, but callers always go through a
//! [`TaxSchedule`] so another year can be added as plain data.

use rust_decimal::Decimal;
use thiserror::Error;

use super::{IncomeCategory, TaxBracket};
use crate::calculations::CalculationError;

pub const THAI_TAX_YEAR_2024: i32 = 2024;

/// Thai personal income tax brackets for 2024, in baht.
pub const THAI_BRACKETS_2024: [TaxBracket; 8] = [
    TaxBracket::new(
        Decimal::ZERO,
        Some(Decimal::from_parts(150_000, 0, 0, false, 0)),
        Decimal::ZERO,
    ),
    TaxBracket::new(
        Decimal::from_parts(150_001, 0, 0, false, 0),
        Some(Decimal::from_parts(300_000, 0, 0, false, 0)),
        Decimal::from_parts(5, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(300_001, 0, 0, false, 0),
        Some(Decimal::from_parts(500_000, 0, 0, false, 0)),
        Decimal::from_parts(10, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(500_001, 0, 0, false, 0),
        Some(Decimal::from_parts(750_000, 0, 0, false, 0)),
        Decimal::from_parts(15, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(750_001, 0, 0, false, 0),
        Some(Decimal::from_parts(1_000_000, 0, 0, false, 0)),
        Decimal::from_parts(20, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(1_000_001, 0, 0, false, 0),
        Some(Decimal::from_parts(2_000_000, 0, 0, false, 0)),
        Decimal::from_parts(25, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(2_000_001, 0, 0, false, 0),
        Some(Decimal::from_parts(5_000_000, 0, 0, false, 0)),
        Decimal::from_parts(30, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(5_000_001, 0, 0, false, 0),
        None,
        Decimal::from_parts(35, 0, 0, false, 2),
    ),
];

/// Standard-expense rates by income category for 2024.
pub const THAI_EXPENSE_RATES_2024: [(IncomeCategory, Decimal); 8] = [
    (IncomeCategory::Employment, Decimal::ZERO),
    (IncomeCategory::ProfessionalFees, Decimal::from_parts(60, 0, 0, false, 2)),
    (IncomeCategory::Goodwill, Decimal::from_parts(60, 0, 0, false, 2)),
    (IncomeCategory::InterestDividend, Decimal::ZERO),
    (IncomeCategory::RentalProperty, Decimal::from_parts(30, 0, 0, false, 2)),
    (IncomeCategory::LiberalProfession, Decimal::from_parts(60, 0, 0, false, 2)),
    (IncomeCategory::ContractsAdvertising, Decimal::from_parts(60, 0, 0, false, 2)),
    (IncomeCategory::OtherIncome, Decimal::from_parts(60, 0, 0, false, 2)),
];

/// Reasons a bracket table or rate table is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("first bracket must start at 0, found {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} ends at {max} before it starts at {min}")]
    InvertedBracket {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} starts at {found}, expected {expected}")]
    Discontinuous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} has a lower rate than the bracket before it")]
    DecreasingRate { index: usize },

    #[error("only the last bracket may be unbounded (bracket {index} is not last)")]
    UnboundedNotLast { index: usize },

    #[error("the last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("expense rate for category {0} is listed more than once")]
    DuplicateExpenseRate(u8),
}

/// Bracket and expense-rate tables for one tax year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxSchedule {
    tax_year: i32,
    brackets: Vec<TaxBracket>,
    expense_rates: Vec<(IncomeCategory, Decimal)>,
}

impl TaxSchedule {
    /// Builds a schedule after checking that the brackets cover every
    /// non-negative income exactly once with non-decreasing rates.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] describing the first violated rule.
    pub fn new(
        tax_year: i32,
        brackets: Vec<TaxBracket>,
        expense_rates: Vec<(IncomeCategory, Decimal)>,
    ) -> Result<Self, ScheduleError> {
        validate_brackets(&brackets)?;

        for (i, (category, _)) in expense_rates.iter().enumerate() {
            if expense_rates[..i].iter().any(|(c, _)| c == category) {
                return Err(ScheduleError::DuplicateExpenseRate(category.code()));
            }
        }

        Ok(Self {
            tax_year,
            brackets,
            expense_rates,
        })
    }

    /// The built-in 2024 Thai schedule.
    pub fn thai_2024() -> Self {
        Self {
            tax_year: THAI_TAX_YEAR_2024,
            brackets: THAI_BRACKETS_2024.to_vec(),
            expense_rates: THAI_EXPENSE_RATES_2024.to_vec(),
        }
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn expense_rates(&self) -> &[(IncomeCategory, Decimal)] {
        &self.expense_rates
    }

    /// Standard-expense rate for `category`.
    ///
    /// # Errors
    ///
    /// [`CalculationError::MissingExpenseRate`] when this year's table has
    /// no entry for the category.
    pub fn expense_rate(
        &self,
        category: IncomeCategory,
    ) -> Result<Decimal, CalculationError> {
        self.expense_rates
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rate)| *rate)
            .ok_or(CalculationError::MissingExpenseRate {
                category_code: category.code(),
                tax_year: self.tax_year,
            })
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::thai_2024()
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    let first = brackets.first().ok_or(ScheduleError::NoTaxBrackets)?;
    if !first.min_income.is_zero() {
        return Err(ScheduleError::FirstBracketNotAtZero(first.min_income));
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        match bracket.max_income {
            Some(max) if max < bracket.min_income => {
                return Err(ScheduleError::InvertedBracket {
                    index,
                    min: bracket.min_income,
                    max,
                });
            }
            None if index != last_index => {
                return Err(ScheduleError::UnboundedNotLast { index });
            }
            _ => {}
        }

        if index == 0 {
            continue;
        }

        let previous = &brackets[index - 1];
        if let Some(previous_max) = previous.max_income {
            let expected = previous_max + Decimal::ONE;
            if bracket.min_income != expected {
                return Err(ScheduleError::Discontinuous {
                    index,
                    expected,
                    found: bracket.min_income,
                });
            }
        }
        if bracket.tax_rate < previous.tax_rate {
            return Err(ScheduleError::DecreasingRate { index });
        }
    }

    if brackets[last_index].max_income.is_some() {
        return Err(ScheduleError::MissingUnboundedBracket);
    }

    Ok(())
}
