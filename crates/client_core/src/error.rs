use shared::domain::MessageTextError;
use thiserror::Error;

/// Failures talking to the remote message store. None of these stop the
/// display loop; the next scheduled cycle retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store unavailable: {0}")]
    Transient(String),
    #[error("message store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) if status.is_client_error() => Self::Rejected {
                status: status.as_u16(),
                message: error.to_string(),
            },
            _ => Self::Transient(error.to_string()),
        }
    }
}

/// Invalid startup configuration. Fatal before the loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid message store url '{url}': {reason}")]
    InvalidStoreUrl { url: String, reason: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be at most {max}, got {actual}")]
    TooLarge {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
    #[error("failed to read config file '{path}': {reason}")]
    File { path: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Output failures. Logged; the loop keeps the stale output.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("display io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("display unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidText(#[from] MessageTextError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
