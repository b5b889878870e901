use crate::error::Result;
use std::path::Path;

/// Abstract interface for shadow-file I/O.
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `AutosaveEngine` handles the "what" (change tracking, dedup, cleanup).
pub trait ShadowBackend {
    /// Write `content` to `path`, replacing any previous shadow file.
    /// MUST be atomic (e.g. write to tmp then rename) so a crash mid-write
    /// never leaves a torn shadow file.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Delete the shadow file at `path`.
    /// Environment-level failures (permissions, missing file) are returned
    /// as errors; the caller decides whether they are surfaced.
    fn remove(&self, path: &Path) -> Result<()>;
}
