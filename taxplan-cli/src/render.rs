//! Plain-text rendering of plans, summaries and tables.

use chrono::Local;
use rust_decimal::Decimal;
use taxplan_core::{BracketTax, StandardDeduction, TaxBracket, TaxPlan, TaxSummary};

use crate::utils::{format_baht, format_rate};

/// Leading characters of an id shown in tables. Commands accept any
/// unique prefix.
const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub fn plan_list(plans: &[TaxPlan]) -> String {
    if plans.is_empty() {
        return "No plans yet. Create one with `taxplan plan new <NAME>`.".to_string();
    }

    let mut lines = vec![format!(
        "{:<10} {:<28} {:>6} {:>8} {:>14}  {}",
        "ID", "NAME", "YEAR", "INCOMES", "TAX DUE", "UPDATED"
    )];
    for plan in plans {
        let summary = taxplan_core::summarize(plan);
        lines.push(format!(
            "{:<10} {:<28} {:>6} {:>8} {:>14}  {}",
            short_id(&plan.id),
            plan.name,
            plan.year,
            plan.incomes.len(),
            format_baht(summary.tax_due),
            plan.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        ));
    }
    lines.join("\n")
}

pub fn plan_detail(
    plan: &TaxPlan,
    summary: &TaxSummary,
) -> String {
    let mut lines = vec![
        format!("{} ({}) [{}]", plan.name, plan.year, plan.id),
        String::new(),
        "Incomes".to_string(),
    ];

    if plan.incomes.is_empty() {
        lines.push("  (none)".to_string());
    }
    for income in &plan.incomes {
        lines.push(format!(
            "  {:<10} {} {:<40} {:>14}  withheld {}",
            short_id(&income.id),
            income.category.code(),
            income.description,
            format_baht(income.amount),
            format_baht(income.withholding_tax),
        ));
    }

    lines.push(String::new());
    lines.push("Expenses".to_string());
    if plan.expenses.is_empty() {
        lines.push("  (none)".to_string());
    }
    for expense in &plan.expenses {
        let basis = if expense.is_manual_override {
            "manual".to_string()
        } else {
            format!("standard {}", format_rate(expense.default_percentage))
        };
        lines.push(format!(
            "  {:<18} {:<40} {:>14}  {}",
            expense.id.get(..("expense-".len() + SHORT_ID_LEN)).unwrap_or(&expense.id),
            expense.description,
            format_baht(expense.amount),
            basis,
        ));
    }

    lines.push(String::new());
    lines.push("Deductions".to_string());
    if plan.deductions.is_empty() {
        lines.push("  (none)".to_string());
    }
    for deduction in &plan.deductions {
        lines.push(format!(
            "  {:<10} {:<40} {:>14}  {}{}",
            short_id(&deduction.id),
            deduction.name,
            format_baht(deduction.amount),
            deduction.category.as_str(),
            if deduction.is_custom { ", custom" } else { "" },
        ));
    }

    lines.push(String::new());
    lines.push(summary_text(summary));
    lines.join("\n")
}

pub fn summary_text(summary: &TaxSummary) -> String {
    let mut lines = vec![
        row("Total income", summary.total_income),
        row("Total expenses", summary.total_expenses),
        row("Total deductions", summary.total_deductions),
        row("Net income", summary.net_income),
        row("Tax due", summary.tax_due),
        row("Withholding tax", summary.total_withholding_tax),
    ];
    match summary.refund_due {
        Some(refund) => lines.push(row("Refund due", refund)),
        None => lines.push(row("Tax to pay", summary.final_tax)),
    }
    lines.join("\n")
}

fn row(
    label: &str,
    amount: Decimal,
) -> String {
    format!("{:<20} {:>14}", label, format_baht(amount))
}

fn bracket_range(bracket: &TaxBracket) -> String {
    match bracket.max_income {
        Some(max) => format!("{} – {}", format_baht(bracket.min_income), format_baht(max)),
        None => format!("{} and above", format_baht(bracket.min_income)),
    }
}

/// The bracket table. With a net income, each row also shows the tax
/// attributed to it and marks the brackets the income reaches.
pub fn bracket_table(
    rows: &[BracketTax],
    net_income: Option<Decimal>,
    total_tax: Option<Decimal>,
) -> String {
    let mut lines = Vec::new();
    if let Some(net) = net_income {
        lines.push(format!("Net income {}", format_baht(net)));
        lines.push(String::new());
    }

    for row in rows {
        let marker = if row.is_applicable { "*" } else { " " };
        let tax = if net_income.is_some() {
            format!("{:>14}", format_baht(row.tax))
        } else {
            String::new()
        };
        lines.push(format!(
            "{} {:<32} {:>5} {}",
            marker,
            bracket_range(&row.bracket),
            format_rate(row.bracket.tax_rate),
            tax
        ).trim_end().to_string());
    }

    if let Some(total) = total_tax {
        lines.push(String::new());
        lines.push(format!("Total tax {}", format_baht(total)));
    }
    lines.join("\n")
}

pub fn template_list(templates: &[StandardDeduction]) -> String {
    let mut lines = vec![format!("{:<20} {:>12}  {}", "ID", "MAX", "NAME")];
    for template in templates {
        let max = template
            .max_amount
            .map(format_baht)
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("{:<20} {:>12}  {}", template.id, max, template.name));
    }
    lines.join("\n")
}
