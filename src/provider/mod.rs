use std::fmt;

pub mod token_provider;

pub use token_provider::{get_token, get_token_blocking, TokenProvider};

/// Why a call went to the token endpoint instead of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Forced,
    Missing,
    Expired,
    Malformed,
}

impl RefreshReason {
    pub fn as_str(&self) -> &'static str {
        match *self {
            RefreshReason::Forced => "forced",
            RefreshReason::Missing => "missing",
            RefreshReason::Expired => "expired",
            RefreshReason::Malformed => "malformed",
        }
    }
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
