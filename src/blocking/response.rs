use reqwest::{blocking::Response, StatusCode};
use serde_json::Value;

use crate::{Error, Method, Result};

/// Block until the full response body is received and interpret it as JSON.
///
/// The status is checked first, then the body: a non-successful status wins over an empty or
/// malformed body.
pub(crate) fn read_json(method: Method, response: Response) -> Result<Value> {
    let status = response.status();
    let body = response
        .bytes()
        .map_err(|source| Error::Transport { method, source })?;
    interpret(method, status, &body)
}

pub(crate) fn interpret(method: Method, status: StatusCode, body: &[u8]) -> Result<Value> {
    if !status.is_success() {
        return Err(Error::UnsuccessfulStatus {
            method,
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
    let json = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    if json.is_empty() {
        return Err(Error::EmptyBody { method });
    }
    serde_json::from_slice(json).map_err(|source| Error::InvalidJson {
        method,
        source,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Report a failed call to the log stream.
pub(crate) fn log_failure(url: &str, err: &Error) {
    match err {
        Error::Transport { method, source } => {
            tracing::warn!(%method, url, error = %source, "request failed");
        }
        Error::UnsuccessfulStatus {
            method,
            status,
            body,
        } => {
            tracing::warn!(%method, url, %status, "request returned unsuccessful status");
            if !body.is_empty() {
                tracing::warn!(%method, url, body = %body, "response content");
            }
        }
        Error::EmptyBody { method } => {
            tracing::warn!(%method, url, "request returned empty content");
        }
        Error::InvalidJson {
            method,
            source,
            body,
        } => {
            tracing::warn!(%method, url, error = %source, "response is not valid JSON");
            tracing::warn!(%method, url, body = %body, "response content");
        }
        other => tracing::warn!(url, error = %other, "request failed"),
    }
}
