use std::io::{self, ErrorKind};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::store::{decode_record, CacheLookup, TokenStore};
use crate::cache::token::CachedToken;
use crate::error::CacheError;

#[derive(Debug, Default)]
struct MemoryState {
    raw: Option<Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    saves: usize,
}

/// In-process token store. Holds the serialized record so that malformed
/// content behaves exactly as it would on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &CachedToken) -> Self {
        let store = Self::new();
        store.put_raw(serde_json::to_vec(token).unwrap_or_default());
        store
    }

    /// Replace stored content with arbitrary bytes.
    pub fn put_raw(&self, raw: impl Into<Vec<u8>>) {
        self.state().raw = Some(raw.into());
    }

    pub fn raw(&self) -> Option<Vec<u8>> {
        self.state().raw.clone()
    }

    /// Currently stored record, if it decodes.
    pub fn current(&self) -> Option<CachedToken> {
        match decode_record(self.state().raw.as_deref()?) {
            CacheLookup::Found(token) => Some(token),
            _ => None,
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.state().saves
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // a poisoned lock still holds consistent data: every mutation is a single assignment
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<CacheLookup, CacheError> {
        let state = self.state();
        if state.fail_reads {
            return Err(CacheError::Read {
                location: self.location(),
                source: io::Error::new(ErrorKind::PermissionDenied, "simulated read failure"),
            });
        }
        Ok(match state.raw.as_deref() {
            None => CacheLookup::Missing,
            Some(raw) => decode_record(raw),
        })
    }

    async fn save(&self, token: &CachedToken) -> Result<(), CacheError> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(CacheError::Write {
                location: self.location(),
                source: io::Error::new(ErrorKind::PermissionDenied, "simulated write failure"),
            });
        }
        let raw = serde_json::to_vec(token).map_err(|err| CacheError::Write {
            location: self.location(),
            source: io::Error::new(ErrorKind::InvalidData, err),
        })?;
        state.raw = Some(raw);
        state.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}
