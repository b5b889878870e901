//! # Shadow Storage Layer
//!
//! This module defines the filesystem seam for autosave. The
//! [`ShadowBackend`](backend::ShadowBackend) trait is the only way the
//! engine touches storage, which keeps every byte of pass/cleanup logic
//! testable without disk I/O.
//!
//! ## Philosophy
//!
//! - **Shadow files are plain copies**: a shadow file holds the document
//!   content verbatim at an engine-assigned path. No framing, no metadata
//!   sidecar. A crashed session can be recovered with `cat`.
//! - **Writes are atomic**: a torn shadow file is worse than a stale one,
//!   so [`FsBackend`](fs_backend::FsBackend) writes to a temp file and
//!   renames over the target.
//! - **Removal is best-effort**: the engine drops its bookkeeping whether or
//!   not the delete succeeded; a leftover shadow file is garbage, not
//!   corruption.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production implementation.
//! - [`mem_backend::MemBackend`]: for testing pass and cleanup logic without
//!   filesystem I/O, with failure simulation and call logs.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::ShadowBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
