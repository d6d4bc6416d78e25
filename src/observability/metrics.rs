use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::cache::token::CachedToken;
use crate::error::{CacheError, TokenError};
use crate::observability::observer::TokenObserver;
use crate::provider::RefreshReason;

const METRICS_PREFIX: &str = "tsg_token";

/// Prometheus metrics for token acquisition, kept in a private registry.
#[derive(Clone)]
pub struct MetricsObserver {
    pub registry: Registry,

    // Cache metrics
    pub cache_hits: IntCounter,
    pub cache_malformed: IntCounter,
    pub cache_read_failures: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Refresh metrics
    pub refreshes: IntCounterVec,
    pub refresh_failures: IntCounterVec,
    pub fetch_duration: HistogramVec,
}

impl MetricsObserver {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some(METRICS_PREFIX.into()), None)?;

        let metrics = Self {
            // Cache
            cache_hits: IntCounter::new("cache_hits_total", "Calls served from the token cache")?,
            cache_malformed: IntCounter::new("cache_malformed_total", "Cache reads that found unparseable content")?,
            cache_read_failures: IntCounter::new("cache_read_failures_total", "Cache reads that failed with an I/O error")?,
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry of the current token, margin applied")?,

            // Refresh
            refreshes: IntCounterVec::new(Opts::new("refreshes_total", "Token refreshes by reason"), &["reason"])?,
            refresh_failures: IntCounterVec::new(Opts::new("refresh_failures_total", "Failed refreshes by error kind"), &["kind"])?,
            fetch_duration: HistogramVec::new(
                HistogramOpts::new("fetch_duration_seconds", "Token refresh duration seconds")
                    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
                &["outcome"],
            )?,

            registry,
        };

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.cache_hits.clone()))?;
        reg.register(Box::new(metrics.cache_malformed.clone()))?;
        reg.register(Box::new(metrics.cache_read_failures.clone()))?;
        reg.register(Box::new(metrics.token_expiry_unix.clone()))?;
        reg.register(Box::new(metrics.refreshes.clone()))?;
        reg.register(Box::new(metrics.refresh_failures.clone()))?;
        reg.register(Box::new(metrics.fetch_duration.clone()))?;

        Ok(metrics)
    }

    /// Prometheus text exposition of every metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}

impl TokenObserver for MetricsObserver {
    fn on_cache_hit(&self, token: &CachedToken) {
        self.cache_hits.inc();
        self.token_expiry_unix.set(token.expires_at as i64);
    }

    fn on_cache_malformed(&self, _location: &str, _reason: &str) {
        self.cache_malformed.inc();
    }

    fn on_cache_error(&self, _error: &CacheError) {
        self.cache_read_failures.inc();
    }

    fn on_refresh_start(&self, reason: RefreshReason) {
        self.refreshes.with_label_values(&[reason.as_str()]).inc();
    }

    fn on_refresh_success(&self, token: &CachedToken, elapsed: Duration) {
        self.token_expiry_unix.set(token.expires_at as i64);
        self.fetch_duration.with_label_values(&["success"]).observe(elapsed.as_secs_f64());
    }

    fn on_refresh_failure(&self, error: &TokenError, elapsed: Duration) {
        self.refresh_failures.with_label_values(&[error.kind()]).inc();
        self.fetch_duration.with_label_values(&["failure"]).observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::token::AccessToken;

    #[test]
    fn events_are_counted_and_rendered() {
        let metrics = MetricsObserver::new().unwrap();
        let token = CachedToken::new(AccessToken::new("abc"), 1_700_000_000.5);

        metrics.on_cache_hit(&token);
        metrics.on_refresh_start(RefreshReason::Expired);
        metrics.on_refresh_success(&token, Duration::from_millis(120));
        metrics.on_refresh_failure(
            &TokenError::Auth { status: 401, reason: "Unauthorized".into() },
            Duration::from_millis(30),
        );

        assert_eq!(metrics.cache_hits.get(), 1);
        assert_eq!(metrics.refreshes.with_label_values(&["expired"]).get(), 1);
        assert_eq!(metrics.refresh_failures.with_label_values(&["auth"]).get(), 1);
        assert_eq!(metrics.token_expiry_unix.get(), 1_700_000_000);

        let text = metrics.render().unwrap();
        assert!(text.contains("tsg_token_cache_hits_total 1"));
        assert!(text.contains(r#"tsg_token_refreshes_total{reason="expired"} 1"#));
        assert!(text.contains("tsg_token_fetch_duration_seconds_count"));
        assert!(!text.contains("abc"));
    }

    #[test]
    fn instances_do_not_share_state() {
        let first = MetricsObserver::new().unwrap();
        let second = MetricsObserver::new().unwrap();
        first.cache_malformed.inc();
        assert_eq!(second.cache_malformed.get(), 0);
    }
}
