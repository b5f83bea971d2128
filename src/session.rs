use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use slog::{Logger, debug};

use crate::double::DataSourceDouble;
use crate::error::MockOrmError;
use crate::logging::LoggerExtensions;
use crate::registry::{StubOutcome, StubRegistry};
use crate::{EntityRef, StdResult, SurfaceMethod};

// Process-wide mock slot: at most one session serves stubs at a time.
static SESSION_SLOT: AtomicBool = AtomicBool::new(false);

/// State of a mock session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The session serves stubs.
    Active,

    /// The session has been torn down; its surfaces are unusable.
    Restored,
}

/// Session state shared between the session handle and its surfaces.
pub(crate) struct SessionMonitor {
    active: AtomicBool,
}

impl SessionMonitor {
    pub(crate) fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        if self.active.load(Ordering::SeqCst) {
            SessionState::Active
        } else {
            SessionState::Restored
        }
    }

    pub(crate) fn ensure_active(&self) -> Result<(), MockOrmError> {
        match self.state() {
            SessionState::Active => Ok(()),
            SessionState::Restored => Err(MockOrmError::SessionRestored),
        }
    }

    fn restore(&self) -> bool {
        self.active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Test-double context over the persistence layer surfaces.
///
/// Installing a session claims the process-wide mock slot and yields the
/// session handle together with its [TeardownHandle]. The handle hands out
/// stubbed surfaces through [MockOrm::data_source] and the configuration
/// facade through [MockOrm::on_mock]; every surface resolves against the
/// session's [StubRegistry] until teardown.
pub struct MockOrm {
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    logger: Logger,
}

impl std::fmt::Debug for MockOrm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOrm").finish_non_exhaustive()
    }
}

impl MockOrm {
    /// Install a new mock session.
    ///
    /// At most one session is active at a time; installing a second one
    /// before the first is restored fails with
    /// [MockOrmError::SessionAlreadyActive].
    pub fn install(logger: Logger) -> StdResult<(Self, TeardownHandle)> {
        if SESSION_SLOT
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MockOrmError::SessionAlreadyActive.into());
        }
        let session_logger = logger.new_with_component_name::<Self>();
        debug!(session_logger, "Mock session installed");
        let registry = Arc::new(StubRegistry::new(logger.clone()));
        let monitor = Arc::new(SessionMonitor::new());
        let teardown = TeardownHandle {
            registry: registry.clone(),
            monitor: monitor.clone(),
            logger: session_logger,
        };

        Ok((
            Self {
                registry,
                monitor,
                logger,
            },
            teardown,
        ))
    }

    /// Bind the configuration facade to an entity type.
    pub fn on_mock<E: 'static>(&self) -> StubBinder {
        StubBinder {
            entity: EntityRef::of::<E>(),
            registry: self.registry.clone(),
        }
    }

    /// Create a data source double wired to this session.
    pub fn data_source(&self) -> DataSourceDouble {
        DataSourceDouble::new(
            self.registry.clone(),
            self.monitor.clone(),
            self.logger.clone(),
        )
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        self.monitor.state()
    }
}

/// Configuration facade bound to one entity type.
///
/// Obtained from [MockOrm::on_mock].
pub struct StubBinder {
    entity: EntityRef,
    registry: Arc<StubRegistry>,
}

impl StubBinder {
    /// Register the outcome served for the given operation.
    ///
    /// `outcome` is any JSON payload, or an error to reject with. Later
    /// registrations overwrite earlier ones for the same operation.
    /// Registering an operation no surface ever resolves is inert.
    pub fn to_return(&self, outcome: impl Into<StubOutcome>, method: impl Into<SurfaceMethod>) -> &Self {
        self.registry.register(self.entity, method, outcome.into());
        self
    }
}

/// Explicit teardown handle of a mock session.
///
/// Restoring transitions the session to [SessionState::Restored], clears
/// every stub registration and frees the process-wide mock slot. The handle
/// restores on drop when [TeardownHandle::restore] was not called, so a
/// session cannot outlive the test that installed it.
pub struct TeardownHandle {
    registry: Arc<StubRegistry>,
    monitor: Arc<SessionMonitor>,
    logger: Logger,
}

impl std::fmt::Debug for TeardownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownHandle").finish_non_exhaustive()
    }
}

impl TeardownHandle {
    /// Restore the session.
    pub fn restore(mut self) {
        self.do_restore();
    }

    fn do_restore(&mut self) {
        if self.monitor.restore() {
            self.registry.clear();
            SESSION_SLOT.store(false, Ordering::SeqCst);
            debug!(self.logger, "Mock session restored");
        }
    }
}

impl Drop for TeardownHandle {
    fn drop(&mut self) {
        self.do_restore();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_tools::{TestLogger, exclusive_session};
    use crate::{ManagerMethod, MockOrmError};

    use super::*;

    struct Role;

    #[test]
    fn install_rejects_a_second_concurrent_session() {
        let _slot = exclusive_session();
        let (_orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();

        let error = MockOrm::install(TestLogger::stdout()).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MockOrmError>(),
            Some(MockOrmError::SessionAlreadyActive)
        ));
    }

    #[test]
    fn install_succeeds_again_once_the_previous_session_is_restored() {
        let _slot = exclusive_session();
        {
            let (_orm, teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
            teardown.restore();
        }
        {
            // Implicit restoration through drop.
            let (_orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
        }

        let (_orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
    }

    #[test]
    fn session_state_transitions_from_active_to_restored() {
        let _slot = exclusive_session();
        let (orm, teardown) = MockOrm::install(TestLogger::stdout()).unwrap();

        assert_eq!(SessionState::Active, orm.state());
        teardown.restore();
        assert_eq!(SessionState::Restored, orm.state());
    }

    #[test]
    fn binder_registrations_are_scoped_to_the_bound_entity() {
        let _slot = exclusive_session();
        let (orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
        orm.on_mock::<Role>()
            .to_return(json!({"id": "1"}), ManagerMethod::FindOne)
            .to_return(json!([{"id": "1"}]), ManagerMethod::Find);

        assert_eq!(
            json!({"id": "1"}),
            orm.registry
                .resolve(EntityRef::of::<Role>(), ManagerMethod::FindOne)
                .unwrap()
        );
        assert_eq!(
            json!([{"id": "1"}]),
            orm.registry
                .resolve(EntityRef::of::<Role>(), ManagerMethod::Find)
                .unwrap()
        );
    }

    #[test]
    fn restore_clears_registrations() {
        let _slot = exclusive_session();
        let (orm, teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
        let registry = orm.registry.clone();
        orm.on_mock::<Role>().to_return(json!({"id": "1"}), ManagerMethod::FindOne);
        teardown.restore();

        assert_eq!(
            json!({}),
            registry
                .resolve(EntityRef::of::<Role>(), ManagerMethod::FindOne)
                .unwrap()
        );
    }
}
