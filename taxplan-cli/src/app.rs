//! Command handlers. Each command loads what it needs from the repository,
//! applies a [`PlanEditor`] operation and saves the result.

use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use taxplan_core::db::MemoryRepositoryFactory;
use taxplan_core::{
    DeductionUpdate, IncomeDraft, PlanEditor, PlanRepository, RepositoryRegistry, TaxPlan,
};
use taxplan_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::cli::{
    Command, DeductionCommand, ExpenseCommand, IncomeArgs, IncomeCommand, PlanCommand,
};
use crate::{csv_loader, render};

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(MemoryRepositoryFactory));
    registry
}

pub struct App<'a> {
    repo: &'a dyn PlanRepository,
    editor: PlanEditor,
    default_year: i32,
}

impl From<IncomeArgs> for IncomeDraft {
    fn from(args: IncomeArgs) -> Self {
        IncomeDraft {
            category: args.category,
            description: args.description,
            amount: args.amount,
            withholding_tax: args.withholding,
        }
    }
}

impl<'a> App<'a> {
    pub fn new(
        repo: &'a dyn PlanRepository,
        editor: PlanEditor,
        default_year: i32,
    ) -> Self {
        Self {
            repo,
            editor,
            default_year,
        }
    }

    /// Runs `command` and returns the text to print.
    pub async fn run(
        &self,
        command: Command,
    ) -> Result<String> {
        match command {
            Command::Plan(cmd) => self.run_plan(cmd).await,
            Command::Income(cmd) => self.run_income(cmd).await,
            Command::Expense(cmd) => self.run_expense(cmd).await,
            Command::Deduction(cmd) => self.run_deduction(cmd).await,
            Command::Summary { plan, json } => {
                let plan = self.resolve_plan(&plan).await?;
                let summary = self.editor.schedule().summarize(&plan);
                if json {
                    serde_json::to_string_pretty(&summary).context("serializing summary")
                } else {
                    Ok(format!(
                        "{} ({})\n\n{}",
                        plan.name,
                        plan.year,
                        render::summary_text(&summary)
                    ))
                }
            }
            Command::Brackets { net_income, plan } => {
                let net_income = match plan {
                    Some(reference) => {
                        let plan = self.resolve_plan(&reference).await?;
                        Some(self.editor.schedule().summarize(&plan).net_income)
                    }
                    None => net_income,
                };
                Ok(self.brackets(net_income))
            }
        }
    }

    fn brackets(
        &self,
        net_income: Option<Decimal>,
    ) -> String {
        let schedule = self.editor.schedule();
        let taxable = net_income.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        let rows = schedule.bracket_breakdown(taxable);
        let total = net_income.map(|_| schedule.progressive_tax(taxable));
        render::bracket_table(&rows, net_income, total)
    }

    async fn run_plan(
        &self,
        command: PlanCommand,
    ) -> Result<String> {
        match command {
            PlanCommand::New { name, year } => {
                let plan = self
                    .editor
                    .create_plan(&name, year.unwrap_or(self.default_year))?;
                let saved = self.repo.save_plan(&plan).await?;
                info!(plan = %saved.id, "created plan");
                Ok(format!("Created plan '{}' ({})", saved.name, saved.id))
            }
            PlanCommand::List => {
                let plans = self.repo.list_plans().await?;
                Ok(render::plan_list(&plans))
            }
            PlanCommand::Show { plan } => {
                let plan = self.resolve_plan(&plan).await?;
                let summary = self.editor.schedule().summarize(&plan);
                Ok(render::plan_detail(&plan, &summary))
            }
            PlanCommand::Rename { plan, name } => {
                let plan = self.resolve_plan(&plan).await?;
                let renamed = self.editor.rename_plan(&plan, &name)?;
                self.save(&renamed, format!("Renamed plan to '{}'", renamed.name))
                    .await
            }
            PlanCommand::Delete { plan } => {
                let plan = self.resolve_plan(&plan).await?;
                self.repo.delete_plan(&plan.id).await?;
                info!(plan = %plan.id, "deleted plan");
                Ok(format!("Deleted plan '{}'", plan.name))
            }
        }
    }

    async fn run_income(
        &self,
        command: IncomeCommand,
    ) -> Result<String> {
        match command {
            IncomeCommand::Add { plan, income } => {
                let plan = self.resolve_plan(&plan).await?;
                let edited = self.editor.add_income(&plan, income.into())?;
                let added = edited
                    .incomes
                    .last()
                    .map(|i| i.id.clone())
                    .unwrap_or_default();
                self.save(&edited, format!("Added income {added}")).await
            }
            IncomeCommand::Update {
                plan,
                income_id,
                income,
            } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.incomes.iter().map(|i| i.id.as_str()),
                    &income_id,
                    "income",
                )?;
                let edited = self.editor.update_income(&plan, &id, income.into())?;
                self.save(&edited, format!("Updated income {id}")).await
            }
            IncomeCommand::Remove { plan, income_id } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.incomes.iter().map(|i| i.id.as_str()),
                    &income_id,
                    "income",
                )?;
                let edited = self.editor.remove_income(&plan, &id)?;
                self.save(&edited, format!("Removed income {id}")).await
            }
            IncomeCommand::Import { plan, file } => {
                let plan = self.resolve_plan(&plan).await?;
                let drafts = csv_loader::load_from_file(&file)?;
                let count = drafts.len();

                let mut edited = plan;
                for (idx, draft) in drafts.into_iter().enumerate() {
                    edited = self
                        .editor
                        .add_income(&edited, draft)
                        .with_context(|| format!("{}: row {}", file.display(), idx + 1))?;
                }
                self.save(&edited, format!("Imported {count} incomes from {}", file.display()))
                    .await
            }
        }
    }

    async fn run_expense(
        &self,
        command: ExpenseCommand,
    ) -> Result<String> {
        match command {
            ExpenseCommand::Override {
                plan,
                expense_id,
                amount,
            } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.expenses.iter().map(|e| e.id.as_str()),
                    &expense_id,
                    "expense",
                )?;
                let edited = self.editor.override_expense(&plan, &id, amount)?;
                self.save(&edited, format!("Expense {id} set manually")).await
            }
            ExpenseCommand::Reset { plan, expense_id } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.expenses.iter().map(|e| e.id.as_str()),
                    &expense_id,
                    "expense",
                )?;
                let edited = self.editor.reset_expense(&plan, &id)?;
                self.save(&edited, format!("Expense {id} reset to the standard rate"))
                    .await
            }
        }
    }

    async fn run_deduction(
        &self,
        command: DeductionCommand,
    ) -> Result<String> {
        match command {
            DeductionCommand::Templates => {
                let templates = self.repo.list_standard_deductions().await?;
                Ok(render::template_list(&templates))
            }
            DeductionCommand::AddStandard {
                plan,
                template_id,
                amount,
            } => {
                let plan = self.resolve_plan(&plan).await?;
                let templates = self.repo.list_standard_deductions().await?;
                let template = templates
                    .iter()
                    .find(|t| t.id == template_id)
                    .ok_or_else(|| anyhow!("no deduction template '{template_id}'"))?;
                let amount = amount.or(template.max_amount).ok_or_else(|| {
                    anyhow!("template '{template_id}' has no maximum; pass --amount")
                })?;

                let edited = self.editor.add_standard_deduction(&plan, template, amount)?;
                self.save(&edited, format!("Added deduction '{}'", template.name))
                    .await
            }
            DeductionCommand::AddCustom {
                plan,
                name,
                amount,
                category,
            } => {
                let plan = self.resolve_plan(&plan).await?;
                let edited = self
                    .editor
                    .add_custom_deduction(&plan, &name, amount, category)?;
                self.save(&edited, format!("Added deduction '{}'", name.trim()))
                    .await
            }
            DeductionCommand::Update {
                plan,
                deduction_id,
                amount,
                name,
                category,
            } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.deductions.iter().map(|d| d.id.as_str()),
                    &deduction_id,
                    "deduction",
                )?;
                let update = DeductionUpdate {
                    name,
                    amount,
                    category,
                };
                let edited = self.editor.update_deduction(&plan, &id, update)?;
                self.save(&edited, format!("Updated deduction {id}")).await
            }
            DeductionCommand::Remove { plan, deduction_id } => {
                let plan = self.resolve_plan(&plan).await?;
                let id = resolve_item(
                    plan.deductions.iter().map(|d| d.id.as_str()),
                    &deduction_id,
                    "deduction",
                )?;
                let edited = self.editor.remove_deduction(&plan, &id)?;
                self.save(&edited, format!("Removed deduction {id}")).await
            }
        }
    }

    async fn save(
        &self,
        plan: &TaxPlan,
        message: String,
    ) -> Result<String> {
        let saved = self.repo.save_plan(plan).await?;
        debug!(plan = %saved.id, "plan saved");
        Ok(message)
    }

    /// Finds a plan by exact id, then exact name, then unique id prefix.
    pub async fn resolve_plan(
        &self,
        reference: &str,
    ) -> Result<TaxPlan> {
        let plans = self.repo.list_plans().await?;

        if let Some(plan) = plans.iter().find(|p| p.id == reference) {
            return Ok(plan.clone());
        }

        let by_name: Vec<&TaxPlan> = plans.iter().filter(|p| p.name == reference).collect();
        match by_name.as_slice() {
            [plan] => return Ok((*plan).clone()),
            [] => {}
            _ => bail!("several plans are named '{reference}'; use the plan id"),
        }

        let by_prefix: Vec<&TaxPlan> = plans
            .iter()
            .filter(|p| p.id.starts_with(reference))
            .collect();
        match by_prefix.as_slice() {
            [plan] => Ok((*plan).clone()),
            [] => bail!("no plan matches '{reference}'"),
            _ => bail!("'{reference}' matches several plans; use more of the id"),
        }
    }
}

/// Resolves an item id from an exact id or a unique prefix.
fn resolve_item<'i>(
    ids: impl Iterator<Item = &'i str>,
    reference: &str,
    kind: &str,
) -> Result<String> {
    let mut matches = Vec::new();
    for id in ids {
        if id == reference {
            return Ok(id.to_string());
        }
        if id.starts_with(reference) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => bail!("no {kind} matches '{reference}'"),
        _ => bail!("'{reference}' matches several {kind} entries; use more of the id"),
    }
}
