use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stockroom_inventory::LedgerSnapshot;

use super::r#trait::{StateStore, StoreError};

/// Single-file JSON state store.
///
/// Saves write a sibling temp file and rename it over the target, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl StateStore for JsonFileStateStore {
    fn load_state(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved ledger state");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        let snapshot = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(snapshot))
    }

    fn save_state(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let bytes = serde_json::to_vec_pretty(snapshot).map_err(StoreError::Encode)?;
        let tmp = self.temp_path();
        fs::write(&tmp, bytes).map_err(|e| self.io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            revision = snapshot.revision,
            "ledger state saved"
        );
        Ok(())
    }
}
