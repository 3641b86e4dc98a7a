//! Client configuration and construction.

mod builder;
mod error;
mod options;

pub use builder::ClientBuilder;
pub use error::{BuildClientError, BuildClientResult};
pub use options::{ClientConfig, ProxyKind, ProxySettings, UnsupportedProxyType};
