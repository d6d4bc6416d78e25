use std::io;

use thiserror::Error;

use crate::cache::token::AccessToken;

/// Failures of the local token cache.
///
/// Malformed cache content is not an error; stores report it as
/// [`CacheLookup::Malformed`](crate::cache::store::CacheLookup::Malformed).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read token cache '{location}': {source}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write token cache '{location}': {source}")]
    Write {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// Errors returned by [`TokenProvider::get_token`](crate::provider::TokenProvider::get_token).
///
/// No variant formats a token or a client secret.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token endpoint answered with anything but `200 OK`.
    #[error("error fetching token: {status} {reason}")]
    Auth { status: u16, reason: String },

    /// Connection failure or request timeout.
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// `200 OK` with a body that is not a token response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("invalid client credentials: {0}")]
    InvalidCredentials(String),

    /// The cache exists but could not be read.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The blocking entry point could not start its runtime.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// A token was fetched but could not be persisted. The token is still
    /// valid and available through [`TokenError::recovered_token`].
    #[error("token fetched but not cached: {source}")]
    Persist {
        token: AccessToken,
        #[source]
        source: CacheError,
    },
}

impl TokenError {
    /// Stable label, used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Auth { .. } => "auth",
            TokenError::Transport(_) => "transport",
            TokenError::InvalidResponse(_) => "invalid_response",
            TokenError::InvalidCredentials(_) => "invalid_credentials",
            TokenError::Runtime(_) => "runtime",
            TokenError::Cache(_) => "cache_read",
            TokenError::Persist { .. } => "cache_write",
        }
    }

    /// The freshly fetched token when only persisting it failed.
    pub fn recovered_token(&self) -> Option<&AccessToken> {
        match self {
            TokenError::Persist { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn into_recovered_token(self) -> Option<AccessToken> {
        match self {
            TokenError::Persist { token, .. } => Some(token),
            _ => None,
        }
    }
}
