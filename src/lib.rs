//! A small blocking HTTP client for JSON APIs.
//!
//! ## Overview
//!
//! `simple-request` wraps [`reqwest`]'s blocking client with the handful of conveniences a script
//! or a data collection job usually wants:
//!
//! - Default headers and cookies attached to every request
//! - An optional `http`, `https` or `socks5` proxy
//! - JSON responses parsed into [`serde_json::Value`]
//! - Results persisted as indented JSON files under a save directory
//!
//! A client is configured once, either through [`ClientBuilder`] or from a JSON configuration
//! blob, and is immutable afterwards.
//!
//! ## Usage
//!
//! ```no_run
//! use simple_request::ClientBuilder;
//!
//! let client = ClientBuilder::default()
//!     .save_directory("out")
//!     .with_header("User-Agent", "CustomUserAgent/1.0")
//!     .with_cookie("session", "YOUR_SESSION_COOKIE")
//!     .build()?;
//! let items = client.get("https://api.example.com/items", &[("page", "1")], &[])?;
//! client.save_to_file(&items, "items")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The same client can be created from a configuration blob. Keys missing from the blob take
//! their defaults:
//!
//! ```no_run
//! let client = simple_request::RequestClient::from_json(
//!     r#"{
//!         "save_directory": "out",
//!         "use_proxy": true,
//!         "proxy_type": "socks5",
//!         "proxy_address": "socks5://127.0.0.1:1080",
//!         "headers": {"User-Agent": "CustomUserAgent/1.0"},
//!         "cookies": {"user_id": "123456"}
//!     }"#,
//! )?;
//! let saved = client.fetch_and_save(
//!     "https://api.example.com/items",
//!     "items",
//!     "post",
//!     Some(serde_json::json!({"name": "widget"})),
//!     &[],
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Errors and diagnostics
//!
//! Every call returns a [`Result`] whose error names the kind of failure: transport errors,
//! unsuccessful status codes, empty bodies, malformed JSON, unsupported methods and failed saves
//! are all distinct, see [`Error`] and [`ErrorKind`]. Use [`Result::ok`] if only the value
//! matters.
//!
//! Each failure is also reported through [`tracing`] before being returned. Install a
//! `tracing` subscriber to collect, redirect or filter these diagnostics; without one they are
//! discarded.
//!

#![forbid(missing_docs)]

mod error;
mod header;
mod request;
mod save;

pub mod blocking;
pub mod client;

pub use blocking::RequestClient;
#[doc(inline)]
pub use client::ClientBuilder;
pub use error::{Error, ErrorKind, Result};
pub use request::{Method, Request};
