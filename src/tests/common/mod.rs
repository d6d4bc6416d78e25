// tests/common/mod.rs
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;
use tempfile::TempDir;

use crate::cache::store::TokenStore;
use crate::cache::token::CachedToken;
use crate::config::settings::ProviderSettings;
use crate::error::{CacheError, TokenError};
use crate::observability::observer::TokenObserver;
use crate::provider::{RefreshReason, TokenProvider};
use crate::sources::oauth2::ClientCredentials;

pub const TOKEN_PATH: &str = "/oauth2/access_token";
pub const CLIENT_ID: &str = "sa-client@1234567890.iam.panserviceaccount.com";
pub const CLIENT_SECRET: &str = "client-secret-value";
pub const TSG_ID: &str = "1234567890";

pub fn credentials() -> ClientCredentials {
    ClientCredentials::new(CLIENT_ID, CLIENT_SECRET, TSG_ID).expect("valid credentials")
}

pub fn provider_for<S: TokenStore>(server: &MockServer, store: S) -> TokenProvider<S> {
    let settings = ProviderSettings::default().with_token_url(server.url(TOKEN_PATH));
    TokenProvider::new(&settings, credentials(), store).expect("provider")
}

/// Token endpoint answering 200 with the given token and lifetime.
pub async fn mock_token_ok<'a>(server: &'a MockServer, token: &str, expires_in: u64) -> Mock<'a> {
    let body = json!({
        "access_token": token,
        "scope": format!("tsg_id:{TSG_ID}"),
        "token_type": "Bearer",
        "expires_in": expires_in
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("content-type", "application/x-www-form-urlencoded")
                .header_exists("authorization")
                .body_includes("grant_type=client_credentials")
                .body_includes(format!("scope=tsg_id%3A{TSG_ID}"));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub async fn mock_token_status<'a>(server: &'a MockServer, status: u16) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(status).body(r#"{"error":"invalid_client"}"#);
        })
        .await
}

/// Temp dir plus the cache file path inside it (not created).
pub fn cache_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("token.json");
    (dir, path)
}

pub fn write_cache(path: &Path, access_token: &str, expires_at: f64) {
    let record = json!({"access_token": access_token, "expires_at": expires_at});
    std::fs::write(path, record.to_string()).expect("write cache file");
}

pub fn read_cache(path: &Path) -> CachedToken {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read cache file")).expect("cache record")
}

/// Observer recording event names in order.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl TokenObserver for RecordingObserver {
    fn on_cache_hit(&self, _token: &CachedToken) {
        self.push("cache_hit".into());
    }

    fn on_cache_malformed(&self, _location: &str, _reason: &str) {
        self.push("cache_malformed".into());
    }

    fn on_cache_error(&self, _error: &CacheError) {
        self.push("cache_error".into());
    }

    fn on_refresh_start(&self, reason: RefreshReason) {
        self.push(format!("refresh_start:{reason}"));
    }

    fn on_refresh_success(&self, _token: &CachedToken, _elapsed: Duration) {
        self.push("refresh_success".into());
    }

    fn on_refresh_failure(&self, error: &TokenError, _elapsed: Duration) {
        self.push(format!("refresh_failure:{}", error.kind()));
    }
}
