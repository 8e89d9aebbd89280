//! BikeMee Library
//!
//! Disk-backed cache and refresh policy for JCDecaux bike-share data.
//! Exposed as a library so integration tests can exercise the CLI and the
//! cache manager directly.

pub mod cache;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod manager;
