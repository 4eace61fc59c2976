use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals derived from a [`super::TaxPlan`]. Never persisted; recompute with
/// [`crate::calculations::summarize`] whenever the plan changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_deductions: Decimal,
    /// Income less expenses and deductions. May be negative.
    pub net_income: Decimal,
    pub tax_due: Decimal,
    pub total_withholding_tax: Decimal,
    /// Positive when tax is owed, negative when withholding exceeds tax due.
    pub final_tax: Decimal,
    /// Present only when `final_tax` is negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_due: Option<Decimal>,
}

impl TaxSummary {
    /// Amount still owed, zero when a refund applies.
    pub fn amount_owed(&self) -> Decimal {
        self.final_tax.max(Decimal::ZERO)
    }
}
