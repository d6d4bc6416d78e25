//! # TSG Token Library
//!
//! Obtains client-credentials OAuth2 bearer tokens scoped to a tenant service
//! group (`tsg_id:<tenant>`), persists them with their expiry to a local file
//! and serves the cached token until it approaches expiry.
//!
//! Modules:
//! - `cache` — cached token record and the storage backends
//! - `sources` — the client-credentials token endpoint
//! - `provider` — cache-or-refresh logic and the one-shot call surface
//! - `observability` — observer hooks, tracing and prometheus observers
//! - `config` — settings and the optional YAML config file

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod provider;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::{AccessToken, CacheLookup, CachedToken, FileTokenStore, MemoryTokenStore, TokenStore};
pub use crate::error::{CacheError, TokenError};
pub use crate::provider::{get_token, get_token_blocking, RefreshReason, TokenProvider};
pub use crate::sources::oauth2::ClientCredentials;
