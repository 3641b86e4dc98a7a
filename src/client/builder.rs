use std::{fs, path::PathBuf};

use super::{BuildClientError, BuildClientResult, ClientConfig, ProxyKind};

/// A builder to configure and create a [`crate::RequestClient`].
///
/// Setters mirror the keys of the JSON configuration blob, see [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    pub(crate) config: ClientConfig,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Parse a JSON configuration blob. Keys present in the blob fully replace any builder
    /// defaults; missing keys take the defaults documented on [`ClientConfig`].
    pub fn from_json(blob: &str) -> BuildClientResult<Self> {
        let config = serde_json::from_str(blob)?;
        Ok(Self::from_config(config))
    }

    /// Read and parse a JSON configuration blob from a file.
    pub fn from_json_file(path: impl Into<PathBuf>) -> BuildClientResult<Self> {
        let path = path.into();
        let blob = fs::read_to_string(&path).map_err(|source| BuildClientError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&blob)
    }

    /// Set the directory where response files are written.
    pub fn save_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.save_directory = dir.into();
        self
    }

    /// Route requests through a proxy of the given kind.
    pub fn proxy(mut self, kind: ProxyKind, address: impl Into<String>) -> Self {
        self.config.use_proxy = true;
        self.config.proxy_type = Some(kind.as_str().to_owned());
        self.config.proxy_address = Some(address.into());
        self
    }

    /// Enable or disable the configured proxy.
    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.config.use_proxy = use_proxy;
        self
    }

    /// Set the proxy type by name. Unsupported names are reported and ignored when building.
    pub fn proxy_type(mut self, proxy_type: impl Into<String>) -> Self {
        self.config.proxy_type = Some(proxy_type.into());
        self
    }

    /// Set the proxy address.
    pub fn proxy_address(mut self, address: impl Into<String>) -> Self {
        self.config.proxy_address = Some(address.into());
        self
    }

    /// Ignore system proxy settings when no proxy is configured.
    pub fn no_system_proxy(mut self) -> Self {
        self.config.use_system_proxy = false;
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Add a cookie sent with every request.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.cookies.insert(name.into(), value.into());
        self
    }

    /// Get the configuration collected so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
