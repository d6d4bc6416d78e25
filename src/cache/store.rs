use crate::cache::token::CachedToken;
use crate::error::CacheError;

/// Result of reading the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Nothing stored yet.
    Missing,
    /// Something is stored but it is not a token record (empty, truncated,
    /// wrong shape). Callers treat it as a miss.
    Malformed(String),
    Found(CachedToken),
}

/// Backing storage for the single cached token record.
pub trait TokenStore {
    /// Read the stored record. Only genuine I/O failures are errors.
    fn load(&self) -> impl std::future::Future<Output = Result<CacheLookup, CacheError>> + Send;

    /// Replace the stored record wholesale.
    fn save(&self, token: &CachedToken) -> impl std::future::Future<Output = Result<(), CacheError>> + Send;

    /// Human readable location, used in errors and logs.
    fn location(&self) -> String;
}

/// Decode raw cache content, mapping anything unparseable to `Malformed`.
pub fn decode_record(content: &[u8]) -> CacheLookup {
    match serde_json::from_slice::<CachedToken>(content) {
        Ok(token) => CacheLookup::Found(token),
        Err(err) => CacheLookup::Malformed(err.to_string()),
    }
}
