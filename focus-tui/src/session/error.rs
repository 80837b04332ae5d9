use focus_client::NetworkError;
use thiserror::Error;

/// Every failure the session workflow can surface. None of them is fatal; the
/// user can always retry the action that produced it.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PopupBlocked(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
