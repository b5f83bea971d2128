#![warn(missing_docs)]

//! Test doubles for object-relational persistence layers.
//!
//! Provide:
//! - A [MockOrm] session handing out stub implementations of the persistence
//!   surfaces: data source, query runner, query builder, repository and
//!   entity manager ([double]).
//! - A fluent configuration facade, [MockOrm::on_mock], to choose the payload
//!   or error each stubbed operation resolves with.
//! - Automatic per-method call counting through [CallLog].
//!
//! Stubbed operations resolve to the configured payload, reject with the
//! configured error, or resolve to an empty JSON object when nothing was
//! configured. The set of stubbed operations is closed: each surface declares
//! its operation enum and registrations are keyed by entity type and
//! operation.
//!
//! ```
//! use orm_double::{ManagerMethod, MockOrm};
//! use serde_json::json;
//!
//! struct Role;
//!
//! let logger = slog::Logger::root(slog::Discard, slog::o!());
//! let (orm, teardown) = MockOrm::install(logger).unwrap();
//! orm.on_mock::<Role>().to_return(json!({"id": "1", "name": "a"}), ManagerMethod::FindOne);
//!
//! let data_source = orm.data_source();
//! // hand `data_source` to the code under test, then:
//! teardown.restore();
//! ```

pub mod double;
mod entity;
mod error;
pub mod logging;
mod method;
mod registry;
mod session;
mod spy;
#[cfg(any(test, feature = "test_tools"))]
pub mod test_tools;

pub use double::{
    DataSourceDouble, EntityManagerDouble, QueryBuilderDouble, QueryRunnerDouble, RepositoryDouble,
};
pub use entity::EntityRef;
pub use error::MockOrmError;
pub use method::{
    DataSourceMethod, IsolationLevel, ManagerMethod, QueryBuilderMethod, QueryRunnerMethod,
    SurfaceMethod,
};
pub use registry::{StubOutcome, StubRegistry, StubbedError};
pub use session::{MockOrm, SessionState, StubBinder, TeardownHandle};
pub use spy::CallLog;

/// Generic error type.
pub type StdError = anyhow::Error;

/// Generic result type.
pub type StdResult<T> = Result<T, StdError>;
