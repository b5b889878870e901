//! Collaborator traits for the document/editor-stack side of autosave.
//!
//! The engine never owns buffers. The embedding editor exposes its open
//! documents through [`EditorStack`] and the engine walks them by index,
//! reading only what it needs: the original filename, the changed-flag, and
//! the current content. Hashing is deliberately the stack's job. The engine
//! stores and compares [`Fingerprint`]s but never decides how they are
//! computed, so the editor can hash its rope/buffer representation directly
//! without materializing content for unchanged documents.

use std::path::Path;

/// Opaque, comparable content fingerprint.
///
/// Stack implementations typically delegate to
/// [`fingerprint_text`](crate::fingerprint::fingerprint_text), but any
/// scheme works as long as equal content yields equal fingerprints.
pub type Fingerprint = String;

/// One open editor buffer, as seen by the autosave engine.
pub trait Document {
    /// The buffer's original filename. Newly-created buffers report the
    /// placeholder name the editor assigned them.
    fn filename(&self) -> &Path;

    /// Whether the buffer changed since its last successful autosave.
    fn changed_since_autosave(&self) -> bool;

    /// The buffer's current content.
    fn contents(&self) -> String;

    /// Clear the changed-flag. Called by the engine once the shadow file is
    /// known to match the buffer (after a write, or on a fingerprint hit).
    fn mark_autosaved(&mut self);
}

/// The collection of open documents owned by the editor.
pub trait EditorStack {
    type Doc: Document;

    /// Number of open documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn document(&self, index: usize) -> &Self::Doc;

    fn document_mut(&mut self, index: usize) -> &mut Self::Doc;

    /// Content fingerprint for a document. The stack owns the hashing
    /// scheme; the engine only compares the result for equality.
    fn compute_hash(&self, doc: &Self::Doc) -> Fingerprint;
}
