use std::sync::Arc;

use serde_json::Value;
use slog::{Logger, debug};

use crate::logging::LoggerExtensions;
use crate::registry::StubRegistry;
use crate::session::SessionMonitor;
use crate::spy::CallLog;
use crate::{EntityRef, QueryBuilderMethod, StdResult};

/// Stub double of the query builder surface.
///
/// Chainable operations return the builder itself regardless of any
/// registration, so fluent chains keep working; terminal operations are the
/// only ones resolving against the stub registry, under the entity the
/// builder was created for. Expressions, aliases and parameters are accepted
/// for call-site fidelity but never interpreted.
pub struct QueryBuilderDouble {
    entity: EntityRef,
    alias: String,
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    calls: Arc<CallLog>,
    logger: Logger,
}

impl QueryBuilderDouble {
    pub(crate) fn new(
        entity: EntityRef,
        alias: &str,
        registry: Arc<StubRegistry>,
        monitor: Arc<SessionMonitor>,
        logger: Logger,
    ) -> Self {
        Self {
            entity,
            alias: alias.to_string(),
            registry,
            monitor,
            calls: Arc::new(CallLog::default()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    fn chain(&mut self, method: QueryBuilderMethod) -> &mut Self {
        self.calls.record(method);
        self
    }

    /// Chainable `select`.
    pub fn select(&mut self, _selection: &[&str]) -> &mut Self {
        self.chain(QueryBuilderMethod::Select)
    }

    /// Chainable `where`.
    pub fn where_clause(&mut self, _expression: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::Where)
    }

    /// Chainable `andWhere`.
    pub fn and_where(&mut self, _expression: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::AndWhere)
    }

    /// Chainable `orWhere`.
    pub fn or_where(&mut self, _expression: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::OrWhere)
    }

    /// Chainable `innerJoin`.
    pub fn inner_join(&mut self, _relation: &str, _alias: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::InnerJoin)
    }

    /// Chainable `leftJoin`.
    pub fn left_join(&mut self, _relation: &str, _alias: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::LeftJoin)
    }

    /// Chainable `innerJoinAndSelect`.
    pub fn inner_join_and_select(&mut self, _relation: &str, _alias: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::InnerJoinAndSelect)
    }

    /// Chainable `leftJoinAndSelect`.
    pub fn left_join_and_select(&mut self, _relation: &str, _alias: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::LeftJoinAndSelect)
    }

    /// Chainable `groupBy`.
    pub fn group_by(&mut self, _column: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::GroupBy)
    }

    /// Chainable `having`.
    pub fn having(&mut self, _expression: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::Having)
    }

    /// Chainable `orderBy`.
    pub fn order_by(&mut self, _column: &str, _direction: &str) -> &mut Self {
        self.chain(QueryBuilderMethod::OrderBy)
    }

    /// Chainable `skip`.
    pub fn skip(&mut self, _count: usize) -> &mut Self {
        self.chain(QueryBuilderMethod::Skip)
    }

    /// Chainable `take`.
    pub fn take(&mut self, _count: usize) -> &mut Self {
        self.chain(QueryBuilderMethod::Take)
    }

    /// Chainable `limit`.
    pub fn limit(&mut self, _count: usize) -> &mut Self {
        self.chain(QueryBuilderMethod::Limit)
    }

    /// Chainable `offset`.
    pub fn offset(&mut self, _count: usize) -> &mut Self {
        self.chain(QueryBuilderMethod::Offset)
    }

    async fn terminal(&self, method: QueryBuilderMethod) -> StdResult<Value> {
        self.monitor.ensure_active()?;
        self.calls.record(method);
        debug!(self.logger, "Stubbed terminal call"; "entity" => %self.entity, "method" => %method);

        self.registry.resolve(self.entity, method)
    }

    /// Terminal `getOne`.
    pub async fn get_one(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetOne).await
    }

    /// Terminal `getMany`.
    pub async fn get_many(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetMany).await
    }

    /// Terminal `getManyAndCount`.
    pub async fn get_many_and_count(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetManyAndCount).await
    }

    /// Terminal `getCount`.
    pub async fn get_count(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetCount).await
    }

    /// Terminal `getRawOne`.
    pub async fn get_raw_one(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetRawOne).await
    }

    /// Terminal `getRawMany`.
    pub async fn get_raw_many(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::GetRawMany).await
    }

    /// Terminal `execute`.
    pub async fn execute(&self) -> StdResult<Value> {
        self.terminal(QueryBuilderMethod::Execute).await
    }

    /// Entity this builder was created for.
    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    /// Alias this builder was created with.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Invocation counters of this surface.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }
}
