//! Process-local storage, used by the `memory` backend and in tests.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{PlanRepository, RepositoryError};
use crate::models::{StandardDeduction, TaxPlan, default_standard_deductions};

#[derive(Debug, Default)]
struct MemoryState {
    plans: Vec<TaxPlan>,
    standard_deductions: Option<Vec<StandardDeduction>>,
}

/// Holds plans in insertion order behind a lock. Contents are lost when
/// the repository is dropped.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .read()
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .write()
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }
}

#[async_trait]
impl PlanRepository for MemoryRepository {
    async fn list_plans(&self) -> Result<Vec<TaxPlan>, RepositoryError> {
        Ok(self.read()?.plans.clone())
    }

    async fn get_plan(&self, id: &str) -> Result<TaxPlan, RepositoryError> {
        self.read()?
            .plans
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::plan_not_found(id))
    }

    async fn save_plan(&self, plan: &TaxPlan) -> Result<TaxPlan, RepositoryError> {
        let mut saved = plan.clone();
        saved.updated_at = Utc::now();

        let mut state = self.write()?;
        match state.plans.iter_mut().find(|p| p.id == saved.id) {
            Some(existing) => *existing = saved.clone(),
            None => state.plans.push(saved.clone()),
        }
        debug!(plan = %saved.id, "saved plan in memory");
        Ok(saved)
    }

    async fn delete_plan(&self, id: &str) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        let before = state.plans.len();
        state.plans.retain(|p| p.id != id);
        if state.plans.len() == before {
            return Err(RepositoryError::plan_not_found(id));
        }
        Ok(())
    }

    async fn list_standard_deductions(&self) -> Result<Vec<StandardDeduction>, RepositoryError> {
        let mut state = self.write()?;
        let templates = state
            .standard_deductions
            .get_or_insert_with(default_standard_deductions);
        Ok(templates.clone())
    }

    async fn save_standard_deductions(
        &self,
        templates: &[StandardDeduction],
    ) -> Result<(), RepositoryError> {
        self.write()?.standard_deductions = Some(templates.to_vec());
        Ok(())
    }
}

/// Factory for the `memory` backend. The connection string is ignored.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &DbConfig) -> Result<Box<dyn PlanRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{IncomeCategory, IncomeItem};

    fn plan(name: &str) -> TaxPlan {
        let mut plan = TaxPlan::new(name, 2024);
        plan.incomes.push(IncomeItem {
            id: "i1".to_string(),
            category: IncomeCategory::Employment,
            description: "Salary".to_string(),
            amount: dec!(500000),
            withholding_tax: dec!(10000),
        });
        plan
    }

    #[tokio::test]
    async fn save_then_get_returns_plan() {
        let repo = MemoryRepository::new();
        let plan = plan("A");

        let saved = repo.save_plan(&plan).await.unwrap();
        let loaded = repo.get_plan(&plan.id).await.unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.incomes, plan.incomes);
        assert!(saved.updated_at >= plan.updated_at);
    }

    #[tokio::test]
    async fn save_replaces_existing_plan() {
        let repo = MemoryRepository::new();
        let mut plan = plan("A");
        repo.save_plan(&plan).await.unwrap();

        plan.name = "Renamed".to_string();
        repo.save_plan(&plan).await.unwrap();

        let plans = repo.list_plans().await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Renamed");
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = MemoryRepository::new();
        for name in ["first", "second", "third"] {
            repo.save_plan(&plan(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_plans()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn delete_removes_plan() {
        let repo = MemoryRepository::new();
        let plan = plan("A");
        repo.save_plan(&plan).await.unwrap();

        repo.delete_plan(&plan.id).await.unwrap();

        assert_eq!(
            repo.get_plan(&plan.id).await,
            Err(RepositoryError::plan_not_found(&plan.id))
        );
        assert!(matches!(
            repo.delete_plan(&plan.id).await,
            Err(RepositoryError::NotFound { kind: "plan", .. })
        ));
    }

    #[tokio::test]
    async fn templates_default_when_none_stored() {
        let repo = MemoryRepository::new();

        let templates = repo.list_standard_deductions().await.unwrap();

        assert_eq!(templates, default_standard_deductions());
    }

    #[tokio::test]
    async fn saved_templates_replace_defaults() {
        let repo = MemoryRepository::new();
        let mut templates = default_standard_deductions();
        templates.truncate(2);

        repo.save_standard_deductions(&templates).await.unwrap();

        assert_eq!(repo.list_standard_deductions().await.unwrap(), templates);
    }

    #[tokio::test]
    async fn factory_reports_memory_backend() {
        let factory = MemoryRepositoryFactory;

        let repo = factory.create(&DbConfig::default()).await.unwrap();

        assert_eq!(factory.backend_name(), "memory");
        assert!(repo.list_plans().await.unwrap().is_empty());
    }
}
