use super::backend::ShadowBackend;
use crate::error::{AutosaveError, Result};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Filesystem shadow backend.
///
/// Stateless: shadow paths arrive fully formed from the engine. The backend
/// only guarantees atomic replacement and parent-directory creation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| AutosaveError::io(parent, e))?;
            }
        }
        Ok(())
    }
}

impl ShadowBackend for FsBackend {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_parent(path)?;

        // Atomic write: tmp file in the same directory, then rename.
        let tmp_path = path.with_file_name(format!(".shadow-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(|e| AutosaveError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| AutosaveError::io(path, e))?;

        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| AutosaveError::io(path, e))
    }
}
