use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate band of a progressive schedule.
///
/// Bounds are whole baht and inclusive: a bracket starting at `150001`
/// follows one ending at `150000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` for the top, unbounded bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub const fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }

    /// Whether any part of `net_income` falls into this bracket.
    pub fn applies_to(
        &self,
        net_income: Decimal,
    ) -> bool {
        net_income > self.min_income
    }
}
