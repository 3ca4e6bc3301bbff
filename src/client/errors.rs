//! Admin client errors
//!
//! Every failure the polling and mutation layer can run into. None of them
//! is fatal: the poller keeps its previous snapshot and the actions surface
//! the error to the user and carry on.

use std::fmt;
use std::fmt::Display;

/// Errors produced while talking to the firewall backend
#[derive(Debug)]
pub enum AdminError {
    /// The request could not be completed
    ///
    /// Covers connection refused, DNS failures, timeouts and bodies that
    /// could not be read off the wire.
    Network(String),

    /// The response body is not the JSON the caller expected
    ///
    /// For `/status` the body must be a JSON object; for mutations any JSON
    /// value is accepted.
    MalformedResponse(serde_json::Error),

    /// The backend answered with a non-2xx status where success is required
    Status { code: u16, body: String },
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::MalformedResponse(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for AdminError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdminError::Network(e) => write!(fmt, "network error: {}", e),
            AdminError::MalformedResponse(e) => write!(fmt, "malformed response: {}", e),
            AdminError::Status { code, body } => write!(fmt, "backend returned {}: {}", code, body),
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self {
        AdminError::MalformedResponse(e)
    }
}
