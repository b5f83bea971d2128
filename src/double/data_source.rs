use std::future::Future;
use std::sync::Arc;

use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::registry::StubRegistry;
use crate::session::SessionMonitor;
use crate::spy::CallLog;
use crate::{
    DataSourceMethod, EntityManagerDouble, EntityRef, IsolationLevel, QueryBuilderDouble,
    QueryRunnerDouble, RepositoryDouble, StdResult,
};

/// Stub double of the data source surface.
///
/// Entry point handed to the code under test: lifecycle operations are
/// observable no-ops, and the other surfaces (query runner, query builder,
/// repository, entity manager) are created from here, all wired to the same
/// session.
#[derive(Clone)]
pub struct DataSourceDouble {
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    manager: EntityManagerDouble,
    calls: Arc<CallLog>,
    logger: Logger,
}

impl DataSourceDouble {
    pub(crate) fn new(
        registry: Arc<StubRegistry>,
        monitor: Arc<SessionMonitor>,
        logger: Logger,
    ) -> Self {
        Self {
            manager: EntityManagerDouble::new(registry.clone(), monitor.clone(), logger.clone()),
            registry,
            monitor,
            calls: Arc::new(CallLog::default()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    async fn lifecycle(&self, method: DataSourceMethod) -> StdResult<()> {
        self.monitor.ensure_active()?;
        self.calls.record(method);
        debug!(self.logger, "Stubbed lifecycle call"; "method" => %method);

        Ok(())
    }

    /// Stubbed `initialize`.
    pub async fn initialize(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::Initialize).await
    }

    /// Stubbed `destroy`.
    pub async fn destroy(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::Destroy).await
    }

    /// Stubbed `dropDatabase`.
    pub async fn drop_database(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::DropDatabase).await
    }

    /// Stubbed `runMigrations`.
    pub async fn run_migrations(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::RunMigrations).await
    }

    /// Stubbed `showMigrations`.
    pub async fn show_migrations(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::ShowMigrations).await
    }

    /// Stubbed `synchronize`.
    pub async fn synchronize(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::Synchronize).await
    }

    /// Stubbed `undoLastMigration`.
    pub async fn undo_last_migration(&self) -> StdResult<()> {
        self.lifecycle(DataSourceMethod::UndoLastMigration).await
    }

    /// Create a query runner double wired to this session.
    pub fn create_query_runner(&self) -> QueryRunnerDouble {
        QueryRunnerDouble::new(
            self.registry.clone(),
            self.monitor.clone(),
            self.logger.clone(),
        )
    }

    /// Create a query builder double for the given entity.
    pub fn create_query_builder<E: 'static>(&self, alias: &str) -> QueryBuilderDouble {
        QueryBuilderDouble::new(
            EntityRef::of::<E>(),
            alias,
            self.registry.clone(),
            self.monitor.clone(),
            self.logger.clone(),
        )
    }

    /// Create a repository double bound to the given entity.
    pub fn get_repository<E: 'static>(&self) -> RepositoryDouble {
        RepositoryDouble::new(
            EntityRef::of::<E>(),
            self.registry.clone(),
            self.monitor.clone(),
            self.logger.clone(),
        )
    }

    /// Entity manager of this data source.
    pub fn manager(&self) -> &EntityManagerDouble {
        &self.manager
    }

    /// Run a unit of work against this session's entity manager, as a
    /// transaction wrapper.
    pub async fn transaction<T, F, Fut>(&self, work: F) -> StdResult<T>
    where
        F: FnOnce(EntityManagerDouble) -> Fut,
        Fut: Future<Output = StdResult<T>>,
    {
        self.monitor.ensure_active()?;
        self.calls.record(DataSourceMethod::Transaction);
        debug!(self.logger, "Stubbed transaction wrapper call");

        work(self.manager.clone()).await
    }

    /// Same as [transaction][Self::transaction], with an explicit isolation
    /// level.
    pub async fn transaction_with_isolation<T, F, Fut>(
        &self,
        isolation: IsolationLevel,
        work: F,
    ) -> StdResult<T>
    where
        F: FnOnce(EntityManagerDouble) -> Fut,
        Fut: Future<Output = StdResult<T>>,
    {
        self.monitor.ensure_active()?;
        self.calls.record(DataSourceMethod::Transaction);
        debug!(self.logger, "Stubbed transaction wrapper call"; "isolation" => %isolation);

        work(self.manager.clone()).await
    }

    /// Invocation counters of this surface.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }
}
