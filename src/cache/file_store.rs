use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::cache::store::{decode_record, CacheLookup, TokenStore};
use crate::cache::token::CachedToken;
use crate::error::CacheError;

/// Token cache backed by a single JSON file.
///
/// Writes go to a sibling `*.tmp` file (mode `0600` on unix) which is then
/// renamed over the target, so readers never observe a half written record.
/// Concurrent writers to the same path are not serialized.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Write { location: self.location(), source }
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<CacheLookup, CacheError> {
        match fs::read(&self.path).await {
            Ok(content) => Ok(decode_record(&content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(CacheLookup::Missing),
            Err(source) => Err(CacheError::Read { location: self.location(), source }),
        }
    }

    async fn save(&self, token: &CachedToken) -> Result<(), CacheError> {
        let content = serde_json::to_vec(token)
            .map_err(|err| self.write_error(std::io::Error::new(ErrorKind::InvalidData, err)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| self.write_error(err))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &content).await.map_err(|err| self.write_error(err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            if let Err(err) = fs::set_permissions(&tmp, perms).await {
                let _ = fs::remove_file(&tmp).await;
                return Err(self.write_error(err));
            }
        }

        if let Err(err) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.write_error(err));
        }
        debug!("token cache written to '{}'", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
