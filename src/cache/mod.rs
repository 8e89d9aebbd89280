//! Cache module for storing raw API responses to disk
//!
//! This module provides a file-backed store that persists response bodies to
//! the filesystem under a cache root, exposing existence and age inspection
//! used by the refresh policy, plus a recursive purge of the whole root.

mod store;

pub use store::{CacheStore, Clock, StoreError, SystemClock};
