//! Configuration options for request clients.

use std::{collections::BTreeMap, fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Proxy schemes a client can route its requests through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    /// Route plain `http://` requests through the proxy.
    Http,
    /// Route `https://` requests through the proxy.
    Https,
    /// Route every request through a SOCKS5 proxy.
    Socks5,
}

impl ProxyKind {
    /// The lowercase name of this proxy kind as used in configuration blobs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
            ProxyKind::Socks5 => "socks5",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unknown proxy type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported proxy type: {0}")]
pub struct UnsupportedProxyType(pub String);

impl FromStr for ProxyKind {
    type Err = UnsupportedProxyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProxyKind::Http),
            "https" => Ok(ProxyKind::Https),
            "socks5" => Ok(ProxyKind::Socks5),
            _ => Err(UnsupportedProxyType(s.to_owned())),
        }
    }
}

/// A resolved proxy that will be applied to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// The proxy scheme.
    pub kind: ProxyKind,
    /// The proxy URL, e.g. `socks5://127.0.0.1:1080`.
    pub address: String,
}

/// Configuration of a [`crate::RequestClient`].
///
/// This is also the schema of the JSON configuration blob accepted by
/// [`crate::ClientBuilder::from_json`]. Missing keys take their default values and unknown keys
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Directory where response files are written. Defaults to `.`.
    pub save_directory: PathBuf,
    /// Whether to route requests through the configured proxy.
    pub use_proxy: bool,
    /// One of `http`, `https` or `socks5`, case-insensitive. Defaults to `http`.
    pub proxy_type: Option<String>,
    /// Proxy URL, e.g. `http://127.0.0.1:8080`.
    pub proxy_address: Option<String>,
    /// Headers sent with every request.
    #[serde(deserialize_with = "null_as_empty")]
    pub headers: BTreeMap<String, String>,
    /// Cookies sent with every request.
    #[serde(deserialize_with = "null_as_empty")]
    pub cookies: BTreeMap<String, String>,
    /// Whether to honor system proxy settings (e.g. `HTTP_PROXY`) when no proxy is configured.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            save_directory: PathBuf::from("."),
            use_proxy: false,
            proxy_type: Some(ProxyKind::Http.as_str().to_owned()),
            proxy_address: None,
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    /// Resolve the proxy to apply, if any.
    ///
    /// A proxy is applied only when `use_proxy` is set and both the type and the address are
    /// non-empty. An unsupported proxy type is reported as a diagnostic and ignored.
    pub fn proxy_settings(&self) -> Option<ProxySettings> {
        if !self.use_proxy {
            return None;
        }
        let proxy_type = self.proxy_type.as_deref().filter(|t| !t.is_empty())?;
        let address = self.proxy_address.as_deref().filter(|a| !a.is_empty())?;
        match proxy_type.parse::<ProxyKind>() {
            Ok(kind) => Some(ProxySettings {
                kind,
                address: address.to_owned(),
            }),
            Err(err) => {
                tracing::warn!(proxy_type, "{err}, no proxy will be applied");
                None
            }
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}
