//! Error types for the identification and lookup pipeline

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("could not reach {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unreadable payload: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("inference service returned an empty completion")]
    EmptyCompletion,
}

/// Coarse category of an [`Error`], used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required credential or client setting is missing or unusable.
    Configuration,
    /// The external service could not be reached.
    Transport,
    /// The external service answered, but not with something usable.
    Service,
}

impl Error {
    /// Wraps a reqwest failure without its URL, which can carry an API key.
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Error::Transport {
            service,
            source: source.without_url(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCredential(_) | Error::ClientSetup(_) => ErrorKind::Configuration,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Status { .. } | Error::Decode { .. } | Error::EmptyCompletion => {
                ErrorKind::Service
            }
        }
    }
}

/// User-visible form of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
