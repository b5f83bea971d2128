use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::registry::StubRegistry;
use crate::session::SessionMonitor;
use crate::spy::CallLog;
use crate::{EntityRef, IsolationLevel, ManagerMethod, QueryBuilderDouble, StdResult};

/// Stub double of the entity manager surface.
///
/// Data operations take the entity type as a type parameter and resolve
/// against the session's stub registry; criteria and entity payloads are
/// accepted for call-site fidelity but never interpreted.
#[derive(Clone)]
pub struct EntityManagerDouble {
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    calls: Arc<CallLog>,
    logger: Logger,
}

impl EntityManagerDouble {
    pub(crate) fn new(
        registry: Arc<StubRegistry>,
        monitor: Arc<SessionMonitor>,
        logger: Logger,
    ) -> Self {
        Self {
            registry,
            monitor,
            calls: Arc::new(CallLog::default()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    async fn dispatch(&self, entity: EntityRef, method: ManagerMethod) -> StdResult<Value> {
        self.monitor.ensure_active()?;
        self.calls.record(method);
        debug!(self.logger, "Stubbed manager call"; "entity" => %entity, "method" => %method);

        self.registry.resolve(entity, method)
    }

    /// Resolve the payload configured for `find` on the given entity.
    pub async fn find<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Find).await
    }

    /// Resolve the payload configured for `findBy` on the given entity.
    pub async fn find_by<E: 'static>(&self, _where: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::FindBy).await
    }

    /// Resolve the payload configured for `findOne` on the given entity.
    pub async fn find_one<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::FindOne).await
    }

    /// Resolve the payload configured for `findOneBy` on the given entity.
    pub async fn find_one_by<E: 'static>(&self, _where: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::FindOneBy).await
    }

    /// Resolve the payload configured for `findAndCount` on the given entity.
    pub async fn find_and_count<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::FindAndCount).await
    }

    /// Resolve the payload configured for `count` on the given entity.
    pub async fn count<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Count).await
    }

    /// Resolve the payload configured for `exists` on the given entity.
    pub async fn exists<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Exists).await
    }

    /// Resolve the payload configured for `save` on the given entity.
    pub async fn save<E: 'static>(&self, _entity: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Save).await
    }

    /// Resolve the payload configured for `insert` on the given entity.
    pub async fn insert<E: 'static>(&self, _entity: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Insert).await
    }

    /// Resolve the payload configured for `update` on the given entity.
    pub async fn update<E: 'static>(&self, _criteria: Value, _partial: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Update).await
    }

    /// Resolve the payload configured for `delete` on the given entity.
    pub async fn delete<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Delete).await
    }

    /// Resolve the payload configured for `softDelete` on the given entity.
    pub async fn soft_delete<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::SoftDelete).await
    }

    /// Resolve the payload configured for `restore` on the given entity.
    pub async fn restore<E: 'static>(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(EntityRef::of::<E>(), ManagerMethod::Restore).await
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

    /// Run a unit of work against this manager, as a transaction wrapper.
    ///
    /// The closure receives a manager sharing this one's registry and call
    /// log; its result is propagated verbatim.
    pub async fn transaction<T, F, Fut>(&self, work: F) -> StdResult<T>
    where
        F: FnOnce(EntityManagerDouble) -> Fut,
        Fut: Future<Output = StdResult<T>>,
    {
        self.monitor.ensure_active()?;
        self.calls.record(ManagerMethod::Transaction);
        debug!(self.logger, "Stubbed transaction wrapper call");

        work(self.clone()).await
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
        self.calls.record(ManagerMethod::Transaction);
        debug!(self.logger, "Stubbed transaction wrapper call"; "isolation" => %isolation);

        work(self.clone()).await
    }

    /// Invocation counters of this surface.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    pub(crate) fn registry(&self) -> &Arc<StubRegistry> {
        &self.registry
    }
}
