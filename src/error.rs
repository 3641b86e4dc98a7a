use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

use crate::Method;

/// The errors produced while sending a request or saving its result.
///
/// Every variant is also reported as a `warn` diagnostic through `tracing` at the point where it
/// occurs, so callers that only care about the value may simply call [`Result::ok`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request could not be sent or its response could not be received, e.g. DNS failure,
    /// connection refused, timeout or an invalid URL.
    #[error("{method} request failed: {source}")]
    Transport {
        /// Method of the failed request.
        method: Method,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server responded with a status code outside of 200-299.
    #[error("{method} request returned unsuccessful status {status}")]
    UnsuccessfulStatus {
        /// Method of the failed request.
        method: Method,
        /// The received status code.
        status: StatusCode,
        /// Raw response body, lossily decoded as UTF-8. Empty if the server sent none.
        body: String,
    },
    /// The server responded successfully but without any content.
    #[error("{method} request returned an empty body")]
    EmptyBody {
        /// Method of the request.
        method: Method,
    },
    /// The response body is not valid JSON.
    #[error("{method} response is not valid JSON: {source}")]
    InvalidJson {
        /// Method of the request.
        method: Method,
        /// The parser error.
        #[source]
        source: serde_json::Error,
        /// Raw response body, lossily decoded as UTF-8.
        body: String,
    },
    /// The method name is neither `GET` nor `POST`.
    #[error("unsupported request method: {0}")]
    UnsupportedMethod(String),
    /// The data could not be serialized as JSON.
    #[error("failed to serialize data for {}: {source}", path.display())]
    Save {
        /// Destination file.
        path: PathBuf,
        /// The serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// The destination file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// A fieldless tag of [`Error`], convenient for matching on the failure kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`Error::Transport`].
    Transport,
    /// See [`Error::UnsuccessfulStatus`].
    UnsuccessfulStatus,
    /// See [`Error::EmptyBody`].
    EmptyBody,
    /// See [`Error::InvalidJson`].
    InvalidJson,
    /// See [`Error::UnsupportedMethod`].
    UnsupportedMethod,
    /// See [`Error::Save`] and [`Error::Io`].
    Save,
}

impl Error {
    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::UnsuccessfulStatus { .. } => ErrorKind::UnsuccessfulStatus,
            Error::EmptyBody { .. } => ErrorKind::EmptyBody,
            Error::InvalidJson { .. } => ErrorKind::InvalidJson,
            Error::UnsupportedMethod(_) => ErrorKind::UnsupportedMethod,
            Error::Save { .. } | Error::Io { .. } => ErrorKind::Save,
        }
    }

    /// The raw response body attached to this error, if the server sent one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::UnsuccessfulStatus { body, .. } | Error::InvalidJson { body, .. }
                if !body.is_empty() =>
            {
                Some(body)
            }
            _ => None,
        }
    }
}

/// A `Result` alias where the `Err` case is [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;
