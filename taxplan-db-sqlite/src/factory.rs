use async_trait::async_trait;
use taxplan_core::db::{DbConfig, PlanRepository, RepositoryError, RepositoryFactory};
use tracing::debug;

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`taxplan_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use taxplan_core::db::RepositoryRegistry;
/// use taxplan_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database named by `config.connection_string` and brings
    /// its schema up to date.
    ///
    /// Accepted values:
    /// * A file path, e.g. `"taxplan.db"`. Created if missing.
    /// * `":memory:"`, an ephemeral database.
    /// * A sqlx URL starting with `sqlite:`.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PlanRepository>, RepositoryError> {
        let repo = SqliteRepository::open(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        debug!(path = %config.connection_string, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}
