use thiserror::Error;

/// Any failed list/create call. Messages are meant to be shown to the user as-is.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to call {call}: {message}")]
    Request { call: String, message: String },
    #[error("{call} returned {status}")]
    Status { call: String, status: String },
    #[error("Failed to parse {call} response: {message}")]
    Decode { call: String, message: String },
    #[error("{0}")]
    Other(String),
}
