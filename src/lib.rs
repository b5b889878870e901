//! # Shadowsave Architecture
//!
//! Shadowsave is a **UI-agnostic autosave library** for editors: it
//! periodically copies unsaved buffer content to shadow files so a crash
//! costs at most one interval of work. It is not an editor; it is the
//! engine an editor embeds.
//!
//! ## The Two Core Components
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Scheduler (scheduler.rs)                                   │
//! │  - Owns enabled/interval state and the repeating deadline   │
//! │  - Decides WHEN a pass runs; never touches documents        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ AutosavePass::autosave(pass_id)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (engine.rs)                                         │
//! │  - Walks the open documents, skips unchanged ones           │
//! │  - Fingerprint-dedups writes, assigns shadow paths          │
//! │  - Cleanup: per-file and bulk removal, rename handling      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (injected at construction)                   │
//! │  - EditorStack/Document: the editor's buffers + hashing     │
//! │  - ShadowBackend: filesystem (or memory, in tests)          │
//! │  - FailureReporter: the editor's error surface              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Ownership of Editor State
//!
//! The engine is handed the document stack per operation and reads only the
//! narrow [`document::Document`] surface. Hashing belongs to the stack and
//! error presentation to the reporter. Every seam is a constructor-injected
//! trait, so each one substitutes cleanly with a test double.
//!
//! ## Concurrency Contract
//!
//! Everything runs on the editor's single logical thread. The scheduler's
//! [`poll`](scheduler::AutosaveScheduler::poll) executes the pass
//! synchronously before returning, so passes never overlap and no map needs
//! a lock. A multi-threaded embedding must add its own mutual exclusion
//! around the engine.
//!
//! ## Module Overview
//!
//! - [`scheduler`]: enabled/interval state and tick decisions
//! - [`engine`]: the autosave pass, tracked-file records, cleanup
//! - [`document`]: collaborator traits for the editor side
//! - [`shadow`]: storage seam (filesystem + in-memory backends)
//! - [`report`]: failure-reporting seam
//! - [`fingerprint`]: default blake3 content fingerprinting
//! - [`config`]: autosave configuration schema
//! - [`error`]: error types

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod report;
pub mod scheduler;
pub mod shadow;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
