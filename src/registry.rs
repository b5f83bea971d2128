use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use slog::{Logger, debug};
use thiserror::Error;

use crate::logging::LoggerExtensions;
use crate::{EntityRef, StdError, StdResult, SurfaceMethod};

/// Error configured on a stub entry.
///
/// The registered error is shared: every rejection carries the same
/// underlying instance, message preserved, with no wrapping nor translation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StubbedError(Arc<StdError>);

impl StubbedError {
    /// Wrap an error for registration.
    pub fn new(error: StdError) -> Self {
        Self(Arc::new(error))
    }
}

impl From<StdError> for StubbedError {
    fn from(error: StdError) -> Self {
        Self::new(error)
    }
}

/// Outcome registered for a stubbed operation.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    /// Resolve with the given payload.
    Value(Value),

    /// Reject with the given error.
    Failure(StubbedError),
}

impl From<Value> for StubOutcome {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for StubOutcome {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for StubOutcome {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<StdError> for StubOutcome {
    fn from(error: StdError) -> Self {
        Self::Failure(error.into())
    }
}

impl From<StubbedError> for StubOutcome {
    fn from(error: StubbedError) -> Self {
        Self::Failure(error)
    }
}

/// Session-scoped registry of stub entries.
///
/// Entries are keyed by entity type and operation and are independent of one
/// another; later registrations overwrite earlier ones for the same key.
pub struct StubRegistry {
    entries: Mutex<HashMap<(EntityRef, SurfaceMethod), StubOutcome>>,
    logger: Logger,
}

impl StubRegistry {
    /// StubRegistry factory.
    pub fn new(logger: Logger) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    /// Store an entry for the given key, replacing any previous one.
    pub fn register(
        &self,
        entity: EntityRef,
        method: impl Into<SurfaceMethod>,
        outcome: StubOutcome,
    ) {
        let method = method.into();
        debug!(self.logger, "Registering stub entry"; "entity" => %entity, "method" => %method);
        self.entries.lock().unwrap().insert((entity, method), outcome);
    }

    /// Resolve the outcome stored for the given key.
    ///
    /// Returns the registered payload, rejects with the registered error, or
    /// resolves to an empty object when no entry exists.
    pub fn resolve(&self, entity: EntityRef, method: impl Into<SurfaceMethod>) -> StdResult<Value> {
        let method = method.into();
        match self.entries.lock().unwrap().get(&(entity, method)) {
            Some(StubOutcome::Value(value)) => Ok(value.clone()),
            Some(StubOutcome::Failure(error)) => Err(error.clone().into()),
            None => {
                debug!(
                    self.logger, "No stub entry, resolving to the default empty object";
                    "entity" => %entity, "method" => %method
                );
                Ok(Value::Object(Map::new()))
            }
        }
    }

    /// Remove every stored entry.
    pub(crate) fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
