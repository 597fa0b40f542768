use flog_core::{FlogError, QueueState, Result, DATA_FORMAT_VERSION};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Just the version stamp. A file without one predates versioning.
#[derive(Deserialize)]
struct FileHeader {
    #[serde(rename = "DataFormatVersion", default)]
    format_version: u32,
}

/// The single JSON file backing the pending queue.
///
/// Not synchronised on its own; [`PendingQueue`](crate::PendingQueue) only
/// touches it while holding the queue lock.
#[derive(Debug, Clone)]
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the queue file.
    ///
    /// A missing file is an empty queue. A file written with another
    /// format version is [`FlogError::StaleFormatVersion`].
    pub fn load(&self) -> Result<QueueState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "save file doesn't exist");
                return Ok(QueueState::default());
            }
            Err(e) => return Err(FlogError::persistence(self.path.display(), e)),
        };

        // check the version before the body: older layouts may not decode
        let header: FileHeader = serde_json::from_str(&raw)
            .map_err(|e| FlogError::persistence(self.path.display(), e))?;
        if header.format_version != DATA_FORMAT_VERSION {
            return Err(FlogError::StaleFormatVersion {
                found: header.format_version,
                expected: DATA_FORMAT_VERSION,
            });
        }
        let state: QueueState = serde_json::from_str(&raw)
            .map_err(|e| FlogError::persistence(self.path.display(), e))?;

        debug!(path = %self.path.display(), pending = state.pending.len(), "queue loaded");
        Ok(state)
    }

    /// Write `state` to a sibling temp file, then rename it into place.
    pub fn save(&self, state: &QueueState) -> Result<()> {
        let fail = |e: &dyn std::fmt::Display| FlogError::persistence(self.path.display(), e);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let json = serde_json::to_vec(state).map_err(|e| fail(&e))?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| fail(&e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| fail(&e))?;

        debug!(path = %self.path.display(), pending = state.pending.len(), "queue saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
