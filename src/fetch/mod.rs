// src/fetch/mod.rs
// =============================================================================
// This module talks to the network.
//
// Submodules:
// - http: GET with a browser User-Agent, timeout and retries; save to disk
// =============================================================================

mod http;

pub use http::{FetchError, Fetcher, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
