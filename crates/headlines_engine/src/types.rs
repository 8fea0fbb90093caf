use std::fmt;

use headlines_core::{Article, HeadlineQuery, RequestId};
use thiserror::Error;

/// Shown when the transport fails and the server did not explain why.
pub(crate) const NETWORK_ERROR: &str = "Network Error";
/// Shown when the API answered but not with a usable `ok` envelope.
pub(crate) const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    FetchCompleted {
        request: RequestId,
        query: HeadlineQuery,
        result: Result<Vec<Article>, NetworkError>,
    },
    /// Saved articles read from the store; empty when missing or unreadable.
    SavedLoaded(Vec<Article>),
}

/// A remote call failed or the API returned a non-`ok` status.
///
/// `message` is what the user sees; `code` is the API's machine-readable
/// error code when it sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetworkError {
    pub kind: FailureKind,
    pub message: String,
    pub code: Option<String>,
}

impl NetworkError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    pub(crate) fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The envelope said `status != "ok"`.
    Api,
    HttpStatus(u16),
    Timeout,
    /// 2xx response whose body is not an envelope.
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Api => write!(f, "api error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
