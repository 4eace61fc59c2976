//! Plan totals, net income, tax due and final balance.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::sum;
use crate::models::{TaxPlan, TaxSchedule, TaxSummary};

/// Summarizes `plan` under the built-in schedule.
pub fn summarize(plan: &TaxPlan) -> TaxSummary {
    TaxSchedule::default().summarize(plan)
}

impl TaxSchedule {
    /// Computes the plan's totals and tax position.
    ///
    /// Net income is reported unclamped; only the tax computation sees it
    /// floored at zero.
    pub fn summarize(
        &self,
        plan: &TaxPlan,
    ) -> TaxSummary {
        let total_income = sum(plan.incomes.iter().map(|i| i.amount));
        let total_expenses = sum(plan.expenses.iter().map(|e| e.amount));
        let total_deductions = sum(plan.deductions.iter().map(|d| d.amount));
        let total_withholding_tax = sum(plan.incomes.iter().map(|i| i.withholding_tax));

        let net_income = total_income - total_expenses - total_deductions;
        let tax_due = self.progressive_tax(net_income.max(Decimal::ZERO));
        let final_tax = tax_due - total_withholding_tax;
        let refund_due = (final_tax < Decimal::ZERO).then(|| -final_tax);

        debug!(plan = %plan.id, %net_income, %tax_due, %final_tax, "summarized plan");

        TaxSummary {
            total_income,
            total_expenses,
            total_deductions,
            net_income,
            tax_due,
            total_withholding_tax,
            final_tax,
            refund_due,
        }
    }
}
