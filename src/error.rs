use thiserror::Error;

/// Errors raised on mock session misuse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOrmError {
    /// A session already holds the process-wide mock slot.
    #[error("a mock session is already active, restore it before installing a new one")]
    SessionAlreadyActive,

    /// The session owning this surface has been restored.
    #[error("the mock session has been restored, its stubbed surfaces are no longer usable")]
    SessionRestored,
}
