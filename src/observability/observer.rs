use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::cache::token::CachedToken;
use crate::error::{CacheError, TokenError};
use crate::helpers::time::format_unix_ts;
use crate::provider::RefreshReason;

/// Hooks invoked by the provider at fixed points of a `get_token` call.
/// All hooks default to no-ops.
pub trait TokenObserver: Send + Sync {
    fn on_cache_hit(&self, _token: &CachedToken) {}

    /// Stored content exists but is not a token record; a refresh follows.
    fn on_cache_malformed(&self, _location: &str, _reason: &str) {}

    /// The cache could not be read at all; the call fails.
    fn on_cache_error(&self, _error: &CacheError) {}

    fn on_refresh_start(&self, _reason: RefreshReason) {}

    fn on_refresh_success(&self, _token: &CachedToken, _elapsed: Duration) {}

    /// Fetch or persist failed after a refresh started.
    fn on_refresh_failure(&self, _error: &TokenError, _elapsed: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TokenObserver for NoopObserver {}

/// Default observer: reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TokenObserver for TracingObserver {
    fn on_cache_hit(&self, token: &CachedToken) {
        info!("returning cached token, valid until {}", format_unix_ts(token.expires_at));
    }

    fn on_cache_malformed(&self, location: &str, reason: &str) {
        warn!("token cache '{}' is empty or invalid JSON ({}), fetching new token", location, reason);
    }

    fn on_cache_error(&self, error: &CacheError) {
        error!("{}", error);
    }

    fn on_refresh_start(&self, reason: RefreshReason) {
        info!("fetching new token, reason: {}", reason);
    }

    fn on_refresh_success(&self, token: &CachedToken, elapsed: Duration) {
        info!(
            "new token fetched successfully in {:.2} seconds, valid until {}",
            elapsed.as_secs_f64(),
            format_unix_ts(token.expires_at)
        );
    }

    fn on_refresh_failure(&self, error: &TokenError, elapsed: Duration) {
        error!("{} (after {:.2} seconds)", error, elapsed.as_secs_f64());
    }
}

/// Fans every event out to each inner observer, in order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TokenObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn TokenObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl TokenObserver for CompositeObserver {
    fn on_cache_hit(&self, token: &CachedToken) {
        self.observers.iter().for_each(|o| o.on_cache_hit(token));
    }

    fn on_cache_malformed(&self, location: &str, reason: &str) {
        self.observers.iter().for_each(|o| o.on_cache_malformed(location, reason));
    }

    fn on_cache_error(&self, error: &CacheError) {
        self.observers.iter().for_each(|o| o.on_cache_error(error));
    }

    fn on_refresh_start(&self, reason: RefreshReason) {
        self.observers.iter().for_each(|o| o.on_refresh_start(reason));
    }

    fn on_refresh_success(&self, token: &CachedToken, elapsed: Duration) {
        self.observers.iter().for_each(|o| o.on_refresh_success(token, elapsed));
    }

    fn on_refresh_failure(&self, error: &TokenError, elapsed: Duration) {
        self.observers.iter().for_each(|o| o.on_refresh_failure(error, elapsed));
    }
}
