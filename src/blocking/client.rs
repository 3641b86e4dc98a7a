use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use reqwest::{blocking::Client, Proxy};
use serde::Serialize;
use serde_json::Value;

use super::response::{log_failure, read_json};
use crate::{
    client::{
        BuildClientError, BuildClientResult, ClientBuilder, ClientConfig, ProxyKind, ProxySettings,
    },
    header, save, Error, Method, Request, Result,
};

/// A blocking HTTP client sending JSON requests with preconfigured headers, cookies and proxy,
/// and saving the results to a local directory.
///
/// The current thread issuing a request is blocked until the response is fully received.
///
/// # Thread safety
///
/// The configuration is fixed at construction time and no method takes `&mut self`, so the client
/// can be shared between threads. Cloning is cheap and clones share the underlying connection
/// handle.
#[derive(Clone)]
pub struct RequestClient {
    inner: Client,
    config: ClientConfig,
    proxy: Option<ProxySettings>,
}

impl ClientBuilder {
    /// Build a new client with the given options.
    ///
    /// The save directory is created, including missing parents, if it does not exist yet.
    pub fn build(self) -> BuildClientResult<RequestClient> {
        RequestClient::new(self.config)
    }
}

impl RequestClient {
    /// Create a client from a configuration.
    pub fn new(config: ClientConfig) -> BuildClientResult<Self> {
        fs::create_dir_all(&config.save_directory).map_err(|source| BuildClientError::Io {
            path: config.save_directory.clone(),
            source,
        })?;

        let proxy = config.proxy_settings();
        let mut builder = Client::builder();
        match &proxy {
            Some(settings) => {
                let proxy = match settings.kind {
                    ProxyKind::Http => Proxy::http(&settings.address),
                    ProxyKind::Https => Proxy::https(&settings.address),
                    ProxyKind::Socks5 => Proxy::all(&settings.address),
                }
                .map_err(|source| BuildClientError::InvalidProxy {
                    address: settings.address.clone(),
                    source,
                })?;
                builder = builder.proxy(proxy);
            }
            None if !config.use_system_proxy => builder = builder.no_proxy(),
            None => {}
        }
        let inner = builder.build().map_err(BuildClientError::Http)?;

        tracing::debug!(
            save_directory = %config.save_directory.display(),
            proxy = ?proxy,
            "request client created"
        );
        Ok(Self {
            inner,
            config,
            proxy,
        })
    }

    /// Create a client from a JSON configuration blob. See [`ClientBuilder::from_json`].
    pub fn from_json(blob: &str) -> BuildClientResult<Self> {
        ClientBuilder::from_json(blob)?.build()
    }

    /// Get the configuration of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the directory response files are saved to.
    pub fn save_directory(&self) -> &Path {
        &self.config.save_directory
    }

    /// Get the proxy requests are routed through, if any.
    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// Sends a request to the server and returns the parsed JSON response. The current thread
    /// will be blocked until the response is available or an error occurs.
    ///
    /// Default headers and cookies are sent along with those set on the request, the latter
    /// winning on a name collision. Any failure is logged before being returned.
    pub fn send(&self, req: Request) -> Result<Value> {
        let Request {
            method,
            url,
            query,
            json,
            headers,
            cookies,
        } = req;

        let mut headers = header::merge_headers(&self.config.headers, headers);
        let cookies = header::merge_cookies(&self.config.cookies, cookies);
        header::apply_cookies(&mut headers, &cookies);

        let mut builder = self.inner.request(method.into(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &json {
            builder = builder.json(body);
        }

        tracing::debug!(%method, url = %url, "sending request");
        let result = builder
            .send()
            .map_err(|source| Error::Transport { method, source })
            .and_then(|res| read_json(method, res));
        match &result {
            Ok(_) => tracing::debug!(%method, url = %url, "request succeeded"),
            Err(err) => log_failure(&url, err),
        }
        result
    }

    /// Send a `GET` request with the given query parameters and headers.
    pub fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        self.send(
            Request::get(url)
                .with_query_pairs(params.iter().copied())
                .with_headers(headers.iter().copied()),
        )
    }

    /// Send a `POST` request with `data` as its JSON body, if any, and the given headers.
    pub fn post(
        &self,
        url: &str,
        data: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        let mut req = Request::post(url).with_headers(headers.iter().copied());
        if let Some(data) = data {
            req = req.with_json(data);
        }
        self.send(req)
    }

    /// Save `data` as indented JSON to `<file_name>.json` under the save directory, returning the
    /// written path.
    pub fn save_to_file<T: Serialize + ?Sized>(
        &self,
        data: &T,
        file_name: &str,
    ) -> Result<PathBuf> {
        match save::write_json_file(&self.config.save_directory, file_name, data) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "data saved");
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save data");
                Err(err)
            }
        }
    }

    /// Request `url` with the given method and save a non-empty result to `<file_name>.json`.
    ///
    /// `method` is matched case-insensitively against `GET` and `POST`; anything else is
    /// rejected without sending a request. For `GET`, `params_or_data` supplies the query
    /// parameters (see [`Request::with_query_json`]); for `POST` it is the JSON body.
    ///
    /// Returns `Ok(None)` when the server answered with an empty JSON value such as `null`,
    /// `{}`, `[]`, `""`, `0` or `false`; nothing is written in that case. A failed save is
    /// logged and the fetched value is still returned.
    pub fn fetch_and_save(
        &self,
        url: &str,
        file_name: &str,
        method: &str,
        params_or_data: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let method = method.parse::<Method>().inspect_err(|err| {
            tracing::warn!(url, error = %err, "request not sent");
        })?;
        let req = Request::new(method, url).with_headers(headers.iter().copied());
        let req = match (method, params_or_data) {
            (Method::Get, Some(params)) => req.with_query_json(&params),
            (Method::Post, Some(data)) => req.with_json(data),
            (_, None) => req,
        };

        let data = self.send(req)?;
        if is_empty_value(&data) {
            tracing::debug!(url, "empty result not saved");
            return Ok(None);
        }
        if let Err(err) = self.save_to_file(&data, file_name) {
            tracing::debug!(url, error = %err, "returning unsaved result");
        }
        Ok(Some(data))
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

impl Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("save_directory", &self.config.save_directory)
            .field("proxy", &self.proxy)
            .field("headers", &self.config.headers.keys().collect::<Vec<_>>())
            .field("cookies", &self.config.cookies.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_empty_values() {
        let empty = [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ];
        for value in empty {
            assert!(is_empty_value(&value), "{value} should be empty");
        }
        let non_empty = [
            json!(true),
            json!(1),
            json!(-0.5),
            json!("a"),
            json!([0]),
            json!({"a": null}),
        ];
        for value in non_empty {
            assert!(!is_empty_value(&value), "{value} should not be empty");
        }
    }

    #[test]
    fn test_build_creates_save_directory() {
        let dir = tempfile::tempdir().unwrap();
        let save_dir = dir.path().join("nested/out");
        let client = ClientBuilder::default()
            .save_directory(&save_dir)
            .build()
            .unwrap();
        assert!(save_dir.is_dir());
        assert_eq!(client.save_directory(), save_dir);
        assert!(client.proxy().is_none());
    }

    #[test]
    fn test_from_json_creates_save_directory() {
        let dir = tempfile::tempdir().unwrap();
        let save_dir = dir.path().join("from_blob");
        let blob = json!({
            "save_directory": save_dir,
            "use_proxy": true,
            "proxy_type": "HTTPS",
            "proxy_address": "http://127.0.0.1:3128",
            "headers": {"Accept": "application/json"},
        })
        .to_string();
        let client = RequestClient::from_json(&blob).unwrap();
        assert!(save_dir.is_dir());
        assert_eq!(client.proxy().map(|p| p.kind), Some(ProxyKind::Https));
        assert_eq!(client.config().headers["Accept"], "application/json");
    }

    #[test]
    fn test_from_invalid_json() {
        let err = RequestClient::from_json("not json").unwrap_err();
        assert!(matches!(err, BuildClientError::InvalidConfig(_)));
    }

    #[test]
    fn test_unsupported_proxy_type_builds_without_proxy() {
        let dir = tempfile::tempdir().unwrap();
        let client = ClientBuilder::default()
            .save_directory(dir.path())
            .use_proxy(true)
            .proxy_type("gopher")
            .proxy_address("gopher://127.0.0.1:70")
            .build()
            .unwrap();
        assert!(client.proxy().is_none());
    }

    #[test]
    fn test_save_directory_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, b"").unwrap();
        let err = ClientBuilder::default()
            .save_directory(&file)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildClientError::Io { .. }));
    }

    #[test]
    fn test_unsupported_method_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let client = ClientBuilder::default()
            .save_directory(dir.path())
            .build()
            .unwrap();
        // Unroutable on purpose, a request attempt would surface as a transport error.
        let err = client
            .fetch_and_save("http://127.0.0.1:9/items", "items", "DELETE", None, &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
        assert!(!dir.path().join("items.json").exists());
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = ClientBuilder::default()
            .save_directory(dir.path())
            .build()
            .unwrap();
        let path = client.save_to_file(&json!({"名前": "値"}), "unicode").unwrap();
        assert_eq!(path, dir.path().join("unicode.json"));
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "{\n    \"名前\": \"値\"\n}");
    }
}
