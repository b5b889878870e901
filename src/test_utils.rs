//! Test doubles for the autosave collaborator traits.
//!
//! Available to downstream crates via the `test_utils` feature, mirroring
//! how the engine's own tests substitute each injected collaborator.

use crate::document::{Document, EditorStack, Fingerprint};
use crate::error::AutosaveError;
use crate::fingerprint::fingerprint_text;
use crate::report::FailureReporter;
use crate::scheduler::AutosavePass;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A scripted document: plain fields instead of a buffer.
pub struct FakeDocument {
    pub filename: PathBuf,
    pub changed: bool,
    pub contents: String,
}

impl FakeDocument {
    pub fn changed(filename: impl Into<PathBuf>, contents: &str) -> Self {
        Self {
            filename: filename.into(),
            changed: true,
            contents: contents.to_string(),
        }
    }

    pub fn unchanged(filename: impl Into<PathBuf>, contents: &str) -> Self {
        Self {
            changed: false,
            ..Self::changed(filename, contents)
        }
    }
}

impl Document for FakeDocument {
    fn filename(&self) -> &Path {
        &self.filename
    }

    fn changed_since_autosave(&self) -> bool {
        self.changed
    }

    fn contents(&self) -> String {
        self.contents.clone()
    }

    fn mark_autosaved(&mut self) {
        self.changed = false;
    }
}

/// A stack over [`FakeDocument`]s that counts hash computations, so tests
/// can assert that skipped documents cost nothing.
#[derive(Default)]
pub struct FakeStack {
    pub docs: Vec<FakeDocument>,
    pub hash_calls: RefCell<usize>,
}

impl FakeStack {
    pub fn new(docs: Vec<FakeDocument>) -> Self {
        Self {
            docs,
            hash_calls: RefCell::new(0),
        }
    }
}

impl EditorStack for FakeStack {
    type Doc = FakeDocument;

    fn len(&self) -> usize {
        self.docs.len()
    }

    fn document(&self, index: usize) -> &FakeDocument {
        &self.docs[index]
    }

    fn document_mut(&mut self, index: usize) -> &mut FakeDocument {
        &mut self.docs[index]
    }

    fn compute_hash(&self, doc: &FakeDocument) -> Fingerprint {
        *self.hash_calls.borrow_mut() += 1;
        fingerprint_text(&doc.contents)
    }
}

/// Records every surfaced failure as its display string.
#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Vec<String>,
}

impl FailureReporter for RecordingReporter {
    fn report(&mut self, error: &AutosaveError) {
        self.reports.push(error.to_string());
    }
}

/// Records every triggered pass id.
#[derive(Default)]
pub struct RecordingPass {
    pub passes: Vec<u64>,
}

impl AutosavePass for RecordingPass {
    fn autosave(&mut self, pass_id: u64) {
        self.passes.push(pass_id);
    }
}
