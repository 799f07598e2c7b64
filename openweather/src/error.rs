//! Error types returned by the One Call operations.

use thiserror::Error;

/// Failure while talking to the remote service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connection, timeout or body read failure.
    ///
    /// The request URL is stripped before the error is stored, since it carries `appid`.
    #[error("request to OpenWeather failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with a non-2xx status; the body is not decoded.
    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Error returned by every [`crate::OneCall`] operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode OpenWeather response as JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// HTTP status of a non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl TransportError {
    pub(crate) fn request(err: reqwest::Error) -> Self {
        TransportError::Request(err.without_url())
    }
}
