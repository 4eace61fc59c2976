use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use taxplan_core::{
    DeductionCategory, DeductionItem, ExpenseItem, IncomeCategory, IncomeItem, PlanRepository,
    RepositoryError, StandardDeduction, TaxPlan, default_standard_deductions,
};
use tracing::{debug, info};

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects using a sqlx URL such as `sqlite://taxplan.db?mode=rwc`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    /// Opens a database from a config connection string: a file path
    /// (created if missing), `:memory:`, or a `sqlite:` URL.
    pub async fn open(connection_string: &str) -> Result<Self> {
        if connection_string.starts_with("sqlite:") {
            return Self::new(connection_string).await;
        }

        if connection_string == ":memory:" {
            // Every connection to :memory: is its own database.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .context("Failed to open in-memory database")?;
            return Ok(Self { pool });
        }

        let options = SqliteConnectOptions::new()
            .filename(connection_string)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", connection_string))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_plan(&self, row: &SqliteRow) -> Result<TaxPlan, RepositoryError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let incomes = sqlx::query(
            "SELECT id, category, description, amount, withholding_tax
             FROM income_items WHERE plan_id = ? ORDER BY position",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .iter()
        .map(row_to_income)
        .collect::<Result<Vec<_>, _>>()?;

        let expenses = sqlx::query(
            "SELECT id, category, description, amount, is_manual_override, default_percentage
             FROM expense_items WHERE plan_id = ? ORDER BY position",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .iter()
        .map(row_to_expense)
        .collect::<Result<Vec<_>, _>>()?;

        let deductions = sqlx::query(
            "SELECT id, name, amount, is_custom, category
             FROM deduction_items WHERE plan_id = ? ORDER BY position",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .iter()
        .map(row_to_deduction)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(TaxPlan {
            id,
            name: row
                .try_get("name")
                .map_err(|e| RepositoryError::Database(e.to_string()))?,
            year: row
                .try_get("year")
                .map_err(|e| RepositoryError::Database(e.to_string()))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
            incomes,
            expenses,
            deductions,
        })
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_income_category(
    row: &SqliteRow,
    column: &str,
) -> Result<IncomeCategory, RepositoryError> {
    let code: i64 = row.try_get(column).map_err(db_err)?;
    u8::try_from(code)
        .ok()
        .and_then(|c| IncomeCategory::try_from(c).ok())
        .ok_or_else(|| {
            RepositoryError::Database(format!("Invalid income category {} in '{}'", code, column))
        })
}

fn get_deduction_category(
    row: &SqliteRow,
    column: &str,
) -> Result<DeductionCategory, RepositoryError> {
    let value: String = row.try_get(column).map_err(db_err)?;
    DeductionCategory::parse(&value).ok_or_else(|| {
        RepositoryError::Database(format!(
            "Invalid deduction category '{}' in '{}'",
            value, column
        ))
    })
}

fn row_to_income(row: &SqliteRow) -> Result<IncomeItem, RepositoryError> {
    Ok(IncomeItem {
        id: row.try_get("id").map_err(db_err)?,
        category: get_income_category(row, "category")?,
        description: row.try_get("description").map_err(db_err)?,
        amount: get_decimal(row, "amount")?,
        withholding_tax: get_decimal(row, "withholding_tax")?,
    })
}

fn row_to_expense(row: &SqliteRow) -> Result<ExpenseItem, RepositoryError> {
    Ok(ExpenseItem {
        id: row.try_get("id").map_err(db_err)?,
        category: get_income_category(row, "category")?,
        description: row.try_get("description").map_err(db_err)?,
        amount: get_decimal(row, "amount")?,
        is_manual_override: row.try_get("is_manual_override").map_err(db_err)?,
        default_percentage: get_decimal(row, "default_percentage")?,
    })
}

fn row_to_deduction(row: &SqliteRow) -> Result<DeductionItem, RepositoryError> {
    Ok(DeductionItem {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        amount: get_decimal(row, "amount")?,
        is_custom: row.try_get("is_custom").map_err(db_err)?,
        category: get_deduction_category(row, "category")?,
    })
}

fn row_to_standard_deduction(row: &SqliteRow) -> Result<StandardDeduction, RepositoryError> {
    Ok(StandardDeduction {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        max_amount: get_optional_decimal(row, "max_amount")?,
        description: row.try_get("description").map_err(db_err)?,
        category: get_deduction_category(row, "category")?,
    })
}

async fn delete_items(
    tx: &mut Transaction<'_, Sqlite>,
    plan_id: &str,
) -> Result<(), RepositoryError> {
    for table in ["income_items", "expense_items", "deduction_items"] {
        sqlx::query(&format!("DELETE FROM {} WHERE plan_id = ?", table))
            .bind(plan_id)
            .execute(&mut **tx)
            .await
            .map_err(db_err)?;
    }
    Ok(())
}

async fn insert_items(
    tx: &mut Transaction<'_, Sqlite>,
    plan: &TaxPlan,
) -> Result<(), RepositoryError> {
    for (position, income) in plan.incomes.iter().enumerate() {
        sqlx::query(
            "INSERT INTO income_items (
                plan_id, position, id, category, description, amount, withholding_tax
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&plan.id)
        .bind(position as i64)
        .bind(&income.id)
        .bind(i64::from(income.category.code()))
        .bind(&income.description)
        .bind(decimal_to_text(income.amount))
        .bind(decimal_to_text(income.withholding_tax))
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;
    }

    for (position, expense) in plan.expenses.iter().enumerate() {
        sqlx::query(
            "INSERT INTO expense_items (
                plan_id, position, id, category, description, amount,
                is_manual_override, default_percentage
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&plan.id)
        .bind(position as i64)
        .bind(&expense.id)
        .bind(i64::from(expense.category.code()))
        .bind(&expense.description)
        .bind(decimal_to_text(expense.amount))
        .bind(expense.is_manual_override)
        .bind(decimal_to_text(expense.default_percentage))
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;
    }

    for (position, deduction) in plan.deductions.iter().enumerate() {
        sqlx::query(
            "INSERT INTO deduction_items (
                plan_id, position, id, name, amount, is_custom, category
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&plan.id)
        .bind(position as i64)
        .bind(&deduction.id)
        .bind(&deduction.name)
        .bind(decimal_to_text(deduction.amount))
        .bind(deduction.is_custom)
        .bind(deduction.category.as_str())
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;
    }

    Ok(())
}

#[async_trait]
impl PlanRepository for SqliteRepository {
    async fn list_plans(&self) -> Result<Vec<TaxPlan>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, year, created_at, updated_at
             FROM tax_plans ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut plans = Vec::with_capacity(rows.len());
        for row in &rows {
            plans.push(self.load_plan(row).await?);
        }
        Ok(plans)
    }

    async fn get_plan(
        &self,
        id: &str,
    ) -> Result<TaxPlan, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, year, created_at, updated_at FROM tax_plans WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| RepositoryError::plan_not_found(id))?;

        self.load_plan(&row).await
    }

    async fn save_plan(
        &self,
        plan: &TaxPlan,
    ) -> Result<TaxPlan, RepositoryError> {
        let mut saved = plan.clone();
        saved.updated_at = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO tax_plans (id, name, year, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                year = excluded.year,
                updated_at = excluded.updated_at",
        )
        .bind(&saved.id)
        .bind(&saved.name)
        .bind(saved.year)
        .bind(saved.created_at)
        .bind(saved.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        delete_items(&mut tx, &saved.id).await?;
        insert_items(&mut tx, &saved).await?;

        tx.commit().await.map_err(db_err)?;

        debug!(
            plan = %saved.id,
            incomes = saved.incomes.len(),
            expenses = saved.expenses.len(),
            deductions = saved.deductions.len(),
            "saved plan"
        );
        Ok(saved)
    }

    async fn delete_plan(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        delete_items(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM tax_plans WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::plan_not_found(id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_standard_deductions(&self) -> Result<Vec<StandardDeduction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, max_amount, description, category
             FROM standard_deductions ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        if rows.is_empty() {
            let defaults = default_standard_deductions();
            info!(count = defaults.len(), "seeding default deduction templates");
            self.save_standard_deductions(&defaults).await?;
            return Ok(defaults);
        }

        rows.iter().map(row_to_standard_deduction).collect()
    }

    async fn save_standard_deductions(
        &self,
        templates: &[StandardDeduction],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM standard_deductions")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for (position, template) in templates.iter().enumerate() {
            sqlx::query(
                "INSERT INTO standard_deductions (
                    position, id, name, max_amount, description, category
                ) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(position as i64)
            .bind(&template.id)
            .bind(&template.name)
            .bind(template.max_amount.map(decimal_to_text))
            .bind(&template.description)
            .bind(template.category.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}
