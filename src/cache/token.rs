use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The persisted cache record: `{ "access_token": "...", "expires_at": <unix seconds> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: AccessToken,
    /// UNIX TIMESTAMP, already reduced by the safety margin
    pub expires_at: f64,
}

impl CachedToken {
    pub fn new(access_token: AccessToken, expires_at: f64) -> Self {
        Self { access_token, expires_at }
    }

    /// `expires_at = fetched_at + expires_in - safety_margin`
    pub fn from_lifetime(
        access_token: AccessToken,
        fetched_at: f64,
        expires_in: u64,
        safety_margin_seconds: u64,
    ) -> Self {
        let expires_at = fetched_at + expires_in as f64 - safety_margin_seconds as f64;
        Self { access_token, expires_at }
    }

    pub fn is_fresh_at(&self, now: f64) -> bool {
        now < self.expires_at
    }
}
