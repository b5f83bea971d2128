use std::sync::Arc;

use serde_json::Value;
use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::registry::StubRegistry;
use crate::session::SessionMonitor;
use crate::spy::CallLog;
use crate::{EntityRef, ManagerMethod, QueryBuilderDouble, StdResult};

/// Stub double of a repository, bound to one entity type at creation.
///
/// Same data operations as the entity manager, without the type parameter:
/// every call resolves under the entity the repository was obtained for.
pub struct RepositoryDouble {
    entity: EntityRef,
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    calls: Arc<CallLog>,
    logger: Logger,
}

impl RepositoryDouble {
    pub(crate) fn new(
        entity: EntityRef,
        registry: Arc<StubRegistry>,
        monitor: Arc<SessionMonitor>,
        logger: Logger,
    ) -> Self {
        Self {
            entity,
            registry,
            monitor,
            calls: Arc::new(CallLog::default()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    async fn dispatch(&self, method: ManagerMethod) -> StdResult<Value> {
        self.monitor.ensure_active()?;
        self.calls.record(method);
        debug!(self.logger, "Stubbed repository call"; "entity" => %self.entity, "method" => %method);

        self.registry.resolve(self.entity, method)
    }

    /// Resolve the payload configured for `find` on this repository's entity.
    pub async fn find(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Find).await
    }

    /// Resolve the payload configured for `findBy`.
    pub async fn find_by(&self, _where: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::FindBy).await
    }

    /// Resolve the payload configured for `findOne`.
    pub async fn find_one(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::FindOne).await
    }

    /// Resolve the payload configured for `findOneBy`.
    pub async fn find_one_by(&self, _where: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::FindOneBy).await
    }

    /// Resolve the payload configured for `findAndCount`.
    pub async fn find_and_count(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::FindAndCount).await
    }

    /// Resolve the payload configured for `count`.
    pub async fn count(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Count).await
    }

    /// Resolve the payload configured for `exists`.
    pub async fn exists(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Exists).await
    }

    /// Resolve the payload configured for `save`.
    pub async fn save(&self, _entity: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Save).await
    }

    /// Resolve the payload configured for `insert`.
    pub async fn insert(&self, _entity: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Insert).await
    }

    /// Resolve the payload configured for `update`.
    pub async fn update(&self, _criteria: Value, _partial: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Update).await
    }

    /// Resolve the payload configured for `delete`.
    pub async fn delete(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Delete).await
    }

    /// Resolve the payload configured for `softDelete`.
    pub async fn soft_delete(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::SoftDelete).await
    }

    /// Resolve the payload configured for `restore`.
    pub async fn restore(&self, _criteria: Value) -> StdResult<Value> {
        self.dispatch(ManagerMethod::Restore).await
    }

    /// Create a query builder double for this repository's entity.
    pub fn create_query_builder(&self, alias: &str) -> QueryBuilderDouble {
        QueryBuilderDouble::new(
            self.entity,
            alias,
            self.registry.clone(),
            self.monitor.clone(),
            self.logger.clone(),
        )
    }

    /// Entity this repository is bound to.
    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    /// Invocation counters of this surface.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_tools::TestLogger;

    use super::*;

    struct Role;
    struct User;

    fn init_repository(entity: EntityRef) -> RepositoryDouble {
        let logger = TestLogger::stdout();
        RepositoryDouble::new(
            entity,
            Arc::new(StubRegistry::new(logger.clone())),
            Arc::new(SessionMonitor::new()),
            logger,
        )
    }

    #[tokio::test]
    async fn repository_resolves_under_its_bound_entity() {
        let repository = init_repository(EntityRef::of::<Role>());
        repository.registry.register(
            EntityRef::of::<Role>(),
            ManagerMethod::Find,
            json!([{"id": "1"}]).into(),
        );
        repository.registry.register(
            EntityRef::of::<User>(),
            ManagerMethod::Find,
            json!([{"id": "2"}]).into(),
        );

        let roles = repository.find(json!({})).await.unwrap();

        assert_eq!(json!([{"id": "1"}]), roles);
        assert_eq!(1, repository.calls().count(ManagerMethod::Find));
    }

    #[tokio::test]
    async fn unregistered_operations_resolve_to_the_default() {
        let repository = init_repository(EntityRef::of::<Role>());

        assert_eq!(json!({}), repository.save(json!({"name": "a"})).await.unwrap());
        assert_eq!(json!({}), repository.delete(json!({"id": "1"})).await.unwrap());
        assert_eq!(1, repository.calls().count(ManagerMethod::Save));
        assert_eq!(1, repository.calls().count(ManagerMethod::Delete));
    }

    #[tokio::test]
    async fn repository_query_builder_shares_the_bound_entity() {
        let repository = init_repository(EntityRef::of::<Role>());
        repository.registry.register(
            EntityRef::of::<Role>(),
            crate::QueryBuilderMethod::GetOne,
            json!("role").into(),
        );

        let mut builder = repository.create_query_builder("role");
        let role = builder.where_clause("role.id = 1").get_one().await.unwrap();

        assert_eq!(json!("role"), role);
        assert_eq!(EntityRef::of::<Role>(), builder.entity());
    }
}
