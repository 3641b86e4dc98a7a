//! Blocking client support.
//!
//! The blocking client will block the current thread to execute.
//!

pub(crate) mod client;
mod response;

pub use client::RequestClient;
