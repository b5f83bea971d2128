use std::sync::Arc;

use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::registry::StubRegistry;
use crate::session::SessionMonitor;
use crate::spy::CallLog;
use crate::{EntityManagerDouble, QueryRunnerMethod, StdResult};

/// Stub double of the query runner surface.
///
/// Lifecycle operations are observable no-ops: they are call-counted and
/// resolve immediately. Data access goes through the runner's
/// [manager][QueryRunnerDouble::manager].
pub struct QueryRunnerDouble {
    manager: EntityManagerDouble,
    monitor: Arc<SessionMonitor>,
    calls: Arc<CallLog>,
    logger: Logger,
}

impl QueryRunnerDouble {
    pub(crate) fn new(
        registry: Arc<StubRegistry>,
        monitor: Arc<SessionMonitor>,
        logger: Logger,
    ) -> Self {
        Self {
            manager: EntityManagerDouble::new(registry, monitor.clone(), logger.clone()),
            monitor,
            calls: Arc::new(CallLog::default()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    async fn lifecycle(&self, method: QueryRunnerMethod) -> StdResult<()> {
        self.monitor.ensure_active()?;
        self.calls.record(method);
        debug!(self.logger, "Stubbed lifecycle call"; "method" => %method);

        Ok(())
    }

    /// Stubbed `connect`.
    pub async fn connect(&self) -> StdResult<()> {
        self.lifecycle(QueryRunnerMethod::Connect).await
    }

    /// Stubbed `startTransaction`.
    pub async fn start_transaction(&self) -> StdResult<()> {
        self.lifecycle(QueryRunnerMethod::StartTransaction).await
    }

    /// Stubbed `commitTransaction`.
    pub async fn commit_transaction(&self) -> StdResult<()> {
        self.lifecycle(QueryRunnerMethod::CommitTransaction).await
    }

    /// Stubbed `rollbackTransaction`.
    pub async fn rollback_transaction(&self) -> StdResult<()> {
        self.lifecycle(QueryRunnerMethod::RollbackTransaction).await
    }

    /// Stubbed `release`.
    pub async fn release(&self) -> StdResult<()> {
        self.lifecycle(QueryRunnerMethod::Release).await
    }

    /// Entity manager of this runner.
    pub fn manager(&self) -> &EntityManagerDouble {
        &self.manager
    }

    /// Invocation counters of this surface.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }
}
