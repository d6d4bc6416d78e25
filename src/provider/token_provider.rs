use std::path::Path;
use std::sync::Arc;

use crate::cache::file_store::FileTokenStore;
use crate::cache::store::{CacheLookup, TokenStore};
use crate::cache::token::{AccessToken, CachedToken};
use crate::config::settings::ProviderSettings;
use crate::error::TokenError;
use crate::helpers::time::{get_instant, now_f64};
use crate::observability::observer::{TokenObserver, TracingObserver};
use crate::provider::RefreshReason;
use crate::sources::oauth2::{ClientCredentials, OAuth2Source};

/// Returns a bearer token, from the cache while it is fresh, otherwise from
/// the token endpoint (then cached).
///
/// Each call reads the store once and sends at most one request. Calls are
/// not serialized against each other: two callers sharing one cache file may
/// both refresh, and the last write wins.
pub struct TokenProvider<S: TokenStore = FileTokenStore> {
    source: OAuth2Source,
    credentials: ClientCredentials,
    store: S,
    safety_margin_seconds: u64,
    observer: Arc<dyn TokenObserver>,
}

impl<S: TokenStore> TokenProvider<S> {
    pub fn new(settings: &ProviderSettings, credentials: ClientCredentials, store: S) -> Result<Self, TokenError> {
        let source = OAuth2Source::new(settings)?;
        Ok(Self::from_source(source, credentials, store, settings.safety_margin_seconds))
    }

    pub fn from_source(
        source: OAuth2Source,
        credentials: ClientCredentials,
        store: S,
        safety_margin_seconds: u64,
    ) -> Self {
        Self {
            source,
            credentials,
            store,
            safety_margin_seconds,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TokenObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// `force_refresh` skips the cache read entirely.
    ///
    /// Malformed cache content counts as a miss. A cache that cannot be read
    /// fails the call with [`TokenError::Cache`]. A token that was fetched but
    /// not persisted fails with [`TokenError::Persist`], which still carries it.
    pub async fn get_token(&self, force_refresh: bool) -> Result<AccessToken, TokenError> {
        let reason = if force_refresh {
            RefreshReason::Forced
        } else {
            match self.store.load().await {
                Err(err) => {
                    self.observer.on_cache_error(&err);
                    return Err(err.into());
                }
                Ok(CacheLookup::Found(cached)) if cached.is_fresh_at(now_f64()) => {
                    self.observer.on_cache_hit(&cached);
                    return Ok(cached.access_token);
                }
                Ok(CacheLookup::Found(_)) => RefreshReason::Expired,
                Ok(CacheLookup::Missing) => RefreshReason::Missing,
                Ok(CacheLookup::Malformed(detail)) => {
                    self.observer.on_cache_malformed(&self.store.location(), &detail);
                    RefreshReason::Malformed
                }
            }
        };
        self.refresh(reason).await
    }

    async fn refresh(&self, reason: RefreshReason) -> Result<AccessToken, TokenError> {
        self.observer.on_refresh_start(reason);
        let start = get_instant();

        let response = match self.source.fetch_token(&self.credentials).await {
            Ok(response) => response,
            Err(err) => {
                self.observer.on_refresh_failure(&err, start.elapsed());
                return Err(err);
            }
        };

        let cached = CachedToken::from_lifetime(
            response.access_token,
            now_f64(),
            response.expires_in,
            self.safety_margin_seconds,
        );

        if let Err(source) = self.store.save(&cached).await {
            let err = TokenError::Persist { token: cached.access_token, source };
            self.observer.on_refresh_failure(&err, start.elapsed());
            return Err(err);
        }

        self.observer.on_refresh_success(&cached, start.elapsed());
        Ok(cached.access_token)
    }
}

/// One-shot call with default settings and a file cache at `cache_path`.
pub async fn get_token(
    client_id: &str,
    client_secret: &str,
    tenant_id: &str,
    cache_path: impl AsRef<Path>,
    force_refresh: bool,
) -> Result<AccessToken, TokenError> {
    let credentials = ClientCredentials::new(client_id, client_secret, tenant_id)?;
    let store = FileTokenStore::new(cache_path.as_ref());
    TokenProvider::new(&ProviderSettings::default(), credentials, store)?
        .get_token(force_refresh)
        .await
}

/// Blocking variant of [`get_token`] for callers without a tokio runtime.
///
/// Must not be called from inside a runtime.
pub fn get_token_blocking(
    client_id: &str,
    client_secret: &str,
    tenant_id: &str,
    cache_path: impl AsRef<Path>,
    force_refresh: bool,
) -> Result<AccessToken, TokenError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TokenError::Runtime)?;
    runtime.block_on(get_token(client_id, client_secret, tenant_id, cache_path, force_refresh))
}
