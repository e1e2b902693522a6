/// Failure of a backend call, as delivered to the caller.
///
/// Aborted calls have no variant: they are never delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    /// Network failure, timeout, non-2xx status or an undecodable body.
    #[error("{0}")]
    Transport(String),

    /// Well-formed response carrying an `error` field from the backend.
    #[error("{0}")]
    Domain(String),
}

impl CallError {
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(msg) | Self::Domain(msg) => msg,
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

pub type CallResult<T> = std::result::Result<T, CallError>;
