use std::io;
use thiserror::Error;

/// Custom error type for the Load Impact CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// Transport or DNS failure while reaching the platform
    #[error("Cannot connect to Load Impact API: {0}")]
    ConnectionUnavailable(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Error reported by the results endpoint while polling a running test
    #[error("Upstream sample error: {0}")]
    UpstreamSample(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the Load Impact CLI
pub type Result<T> = std::result::Result<T, CliError>;

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            CliError::ConnectionUnavailable(err.to_string())
        } else if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                CliError::Unauthorized
            } else {
                CliError::Api {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else {
            CliError::Http(err)
        }
    }
}

impl CliError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        CliError::ConnectionUnavailable(msg.into())
    }

    /// Create an upstream sample error
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        CliError::UpstreamSample(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CliError::Other(msg.into())
    }

    /// Transport or authentication failure: the platform is unusable from here
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            CliError::ConnectionUnavailable(_) | CliError::Unauthorized
        )
    }
}

/// True when any error in the chain is a connectivity failure
pub fn is_connection_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<CliError>()
            .is_some_and(CliError::is_connection)
    })
}
