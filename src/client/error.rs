use std::{io, path::PathBuf};

use thiserror::Error;

/// The errors produced when building a [`crate::RequestClient`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildClientError {
    /// The configuration blob is not valid JSON or does not match the expected shape.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    /// The proxy address was rejected by the HTTP client.
    #[error("invalid proxy address {address}: {source}")]
    InvalidProxy {
        /// The configured proxy address.
        address: String,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The save directory could not be created, or a configuration file could not be read.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The HTTP client has returned an error while being created.
    #[error("error creating HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

/// A `Result` alias where the `Err` case is [`BuildClientError`].
pub type BuildClientResult<T> = Result<T, BuildClientError>;
