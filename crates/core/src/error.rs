/// Input rejected before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Note cannot be empty.")]
    EmptyNote,

    #[error("Ban reason is required.")]
    EmptyReason,

    #[error("unknown ban duration: {0}")]
    UnknownDuration(String),
}

/// Why a workflow did not dispatch its call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("missing permission: {0}")]
    Forbidden(&'static str),

    #[error("player data is not loaded")]
    NotLoaded,

    #[error("cannot set notes for players that are not registered")]
    NotRegistered,

    #[error("action not found: {0}")]
    UnknownAction(String),

    #[error("action {0} is already revoked")]
    AlreadyRevoked(String),

    #[error("a ban is already being applied")]
    BanPending,
}
