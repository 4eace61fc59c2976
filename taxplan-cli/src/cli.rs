//! Command-line definition for `taxplan`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use taxplan_core::{DeductionCategory, IncomeCategory};

use crate::utils::parse_decimal;

/// Thai personal income tax planner.
///
/// Keeps named plans of incomes, expenses and deductions, and computes the
/// progressive tax, withholding credit and refund for each.
#[derive(Debug, Parser)]
#[command(name = "taxplan", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override values from the config file.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Config file. Defaults to `taxplan.toml` in the working directory.
    #[arg(long, global = true, env = "TAXPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend connection string. For SQLite a file path or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log filter, e.g. `debug` or `taxplan_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, list, inspect and delete plans.
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Manage a plan's incomes.
    #[command(subcommand)]
    Income(IncomeCommand),

    /// Override or reset derived expenses.
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Manage a plan's deductions.
    #[command(subcommand)]
    Deduction(DeductionCommand),

    /// Print the tax summary of a plan.
    Summary {
        /// Plan id, id prefix or name.
        plan: String,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the bracket table, optionally with the tax per bracket.
    Brackets {
        /// Net income to apply to the table.
        #[arg(long, value_parser = parse_decimal, conflicts_with = "plan")]
        net_income: Option<Decimal>,

        /// Use the net income of this plan.
        #[arg(long)]
        plan: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Create an empty plan.
    New {
        name: String,

        /// Tax year. Defaults to `default_year` from the config.
        #[arg(long)]
        year: Option<i32>,
    },

    /// List all plans.
    List,

    /// Show a plan with its line items and summary.
    Show { plan: String },

    /// Rename a plan.
    Rename { plan: String, name: String },

    /// Delete a plan.
    Delete { plan: String },
}

/// Income fields as entered on the command line.
#[derive(Debug, Args)]
pub struct IncomeArgs {
    /// Income category number (1–8).
    #[arg(long, value_parser = parse_income_category)]
    pub category: IncomeCategory,

    #[arg(long)]
    pub description: String,

    /// Gross amount in baht.
    #[arg(long, value_parser = parse_decimal)]
    pub amount: Decimal,

    /// Tax withheld at source.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub withholding: Decimal,
}

#[derive(Debug, Subcommand)]
pub enum IncomeCommand {
    /// Add an income; its standard expense is derived automatically.
    Add {
        plan: String,
        #[command(flatten)]
        income: IncomeArgs,
    },

    /// Replace an income, keeping its id.
    Update {
        plan: String,
        income_id: String,
        #[command(flatten)]
        income: IncomeArgs,
    },

    Remove { plan: String, income_id: String },

    /// Add every row of a CSV file (`category,description,amount,withholding_tax`).
    Import { plan: String, file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Set a manual amount that survives income edits.
    Override {
        plan: String,
        expense_id: String,
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,
    },

    /// Return to the statutory amount.
    Reset { plan: String, expense_id: String },
}

#[derive(Debug, Subcommand)]
pub enum DeductionCommand {
    /// List the standard deduction templates.
    Templates,

    /// Add a deduction from a template.
    AddStandard {
        plan: String,
        template_id: String,

        /// Defaults to the template's maximum.
        #[arg(long, value_parser = parse_decimal)]
        amount: Option<Decimal>,
    },

    /// Add a free-form deduction.
    AddCustom {
        plan: String,
        name: String,
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,
        #[arg(long, value_parser = parse_deduction_category, default_value = "other")]
        category: DeductionCategory,
    },

    /// Change a deduction. Standard deductions only accept a new amount.
    Update {
        plan: String,
        deduction_id: String,
        #[arg(value_parser = parse_decimal)]
        amount: Decimal,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_deduction_category)]
        category: Option<DeductionCategory>,
    },

    Remove { plan: String, deduction_id: String },
}

fn parse_income_category(s: &str) -> Result<IncomeCategory, String> {
    let code: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a category number (1-8)"))?;
    IncomeCategory::try_from(code).map_err(|e| e.to_string())
}

fn parse_deduction_category(s: &str) -> Result<DeductionCategory, String> {
    DeductionCategory::parse(s.trim()).ok_or_else(|| {
        let known: Vec<&str> = DeductionCategory::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown deduction category '{s}'; expected one of {}", known.join(", "))
    })
}
