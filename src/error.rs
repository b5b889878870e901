use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutosaveError {
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shadow backend error: {0}")]
    Backend(String),

    #[error("Autosave interval must be a positive duration")]
    InvalidInterval,

    #[error("No free shadow file name for '{}' after {candidates} candidates", .original.display())]
    PathExhausted { original: PathBuf, candidates: u32 },

    #[error("Failed to remove {} shadow file(s)", .failures.len())]
    RemoveAll { failures: Vec<AutosaveError> },
}

impl AutosaveError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutosaveError>;
