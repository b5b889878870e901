//! The autosave engine: decides *what* gets shadow-saved and keeps the
//! bookkeeping that makes saves cheap and cleanup idempotent.
//!
//! One [`TrackedFile`] record per known document, indexed by original
//! filename in insertion order. The record carries both the assigned shadow
//! path and the fingerprint of the last content written there, so the
//! path assignment and the dedup cache cannot drift apart.

use crate::document::{Document, EditorStack, Fingerprint};
use crate::error::{AutosaveError, Result};
use crate::report::FailureReporter;
use crate::shadow::ShadowBackend;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on collision-avoidance candidates per original filename.
pub const MAX_PATH_CANDIDATES: u32 = 100;

/// What to do with a shadow-file deletion failure.
///
/// Bookkeeping cleanup happens in both modes; only user-facing reporting
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Surface the failure through the engine's [`FailureReporter`].
    Report,
    /// Suppress the failure.
    Ignore,
}

/// Autosave bookkeeping for one tracked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Engine-assigned shadow file path.
    pub shadow_path: PathBuf,
    /// Fingerprint of the content last written to `shadow_path`.
    /// `None` between path assignment and the first successful write.
    pub last_fingerprint: Option<Fingerprint>,
}

/// The autosave engine for one editor stack.
///
/// Generic over [`ShadowBackend`] and [`FailureReporter`] so both the
/// filesystem and the user-facing error channel can be substituted with
/// test doubles. The document collection itself is passed into each
/// operation; the engine never owns buffers.
pub struct AutosaveEngine<B: ShadowBackend, R: FailureReporter> {
    backend: B,
    reporter: R,
    shadow_dir: PathBuf,
    tracked: IndexMap<PathBuf, TrackedFile>,
}

impl<B: ShadowBackend, R: FailureReporter> AutosaveEngine<B, R> {
    pub fn new(backend: B, reporter: R, shadow_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            reporter,
            shadow_dir: shadow_dir.into(),
            tracked: IndexMap::new(),
        }
    }

    pub fn shadow_dir(&self) -> &Path {
        &self.shadow_dir
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn is_tracked(&self, original: &Path) -> bool {
        self.tracked.contains_key(original)
    }

    pub fn shadow_path_for(&self, original: &Path) -> Option<&Path> {
        self.tracked
            .get(original)
            .map(|entry| entry.shadow_path.as_path())
    }

    /// Original filename → shadow path, in insertion order.
    pub fn name_mapping(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.tracked
            .iter()
            .map(|(original, entry)| (original.as_path(), entry.shadow_path.as_path()))
    }

    /// Shadow path → last written fingerprint, in insertion order.
    /// Records that were assigned a path but never written are omitted.
    pub fn fingerprints(&self) -> impl Iterator<Item = (&Path, &Fingerprint)> {
        self.tracked.values().filter_map(|entry| {
            entry
                .last_fingerprint
                .as_ref()
                .map(|fingerprint| (entry.shadow_path.as_path(), fingerprint))
        })
    }

    /// Seed a tracked record for a shadow file assigned in an earlier
    /// session (the recovery path). The next pass re-fingerprints and
    /// rewrites it, so no `last_fingerprint` is assumed.
    pub fn track(&mut self, original: impl Into<PathBuf>, shadow_path: impl Into<PathBuf>) {
        self.tracked.insert(
            original.into(),
            TrackedFile {
                shadow_path: shadow_path.into(),
                last_fingerprint: None,
            },
        );
    }

    /// Run one autosave pass over every document in the stack.
    ///
    /// `pass_id` is for log correlation only. A write failure is reported
    /// and the pass moves on to the next document; the failed document's
    /// changed-flag stays set so the next pass retries it.
    pub fn autosave<S: EditorStack>(&mut self, pass_id: u64, stack: &mut S) {
        let mut saved = 0usize;
        let mut failed = 0usize;

        for index in 0..stack.len() {
            if !stack.document(index).changed_since_autosave() {
                continue;
            }
            match self.autosave_document(stack, index) {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(error) => {
                    failed += 1;
                    warn!(
                        pass_id,
                        file = %stack.document(index).filename().display(),
                        error = %error,
                        "autosave write failed"
                    );
                    self.reporter.report(&error);
                }
            }
        }

        debug!(pass_id, saved, failed, "autosave pass finished");
    }

    /// Shadow-save a single document now if it has unsaved changes.
    pub fn maybe_autosave<S: EditorStack>(&mut self, stack: &mut S, index: usize) {
        if !stack.document(index).changed_since_autosave() {
            return;
        }
        if let Err(error) = self.autosave_document(stack, index) {
            warn!(
                file = %stack.document(index).filename().display(),
                error = %error,
                "autosave write failed"
            );
            self.reporter.report(&error);
        }
    }

    /// A tracked document's original filename changed (Save As, rename).
    ///
    /// The shadow file under the old name is removed quietly, then the
    /// document is re-saved under the new name right away so nothing is
    /// lost between the rename and the next timer tick.
    pub fn file_renamed<S: EditorStack>(&mut self, old: &Path, new: &Path, stack: &mut S) {
        self.remove_shadow_file(old, ErrorPolicy::Ignore);
        if let Some(index) = (0..stack.len()).find(|&i| stack.document(i).filename() == new) {
            self.maybe_autosave(stack, index);
        }
    }

    /// Remove the shadow file for `original` and forget its record.
    ///
    /// Idempotent: untracked originals are a no-op. The record is dropped
    /// whether or not the deletion succeeds.
    pub fn remove_shadow_file(&mut self, original: &Path, policy: ErrorPolicy) {
        let entry = match self.tracked.shift_remove(original) {
            Some(entry) => entry,
            None => return,
        };

        if let Err(error) = self.backend.remove(&entry.shadow_path) {
            warn!(
                file = %entry.shadow_path.display(),
                error = %error,
                "failed to remove shadow file"
            );
            if policy == ErrorPolicy::Report {
                self.reporter.report(&error);
            }
        }
    }

    /// Remove every shadow file, attempting all of them regardless of
    /// earlier failures. Emits at most one aggregate report per call.
    pub fn remove_all_shadow_files(&mut self, policy: ErrorPolicy) {
        let mut failures = Vec::new();

        for (_original, entry) in self.tracked.drain(..) {
            if let Err(error) = self.backend.remove(&entry.shadow_path) {
                failures.push(error);
            }
        }

        if failures.is_empty() {
            return;
        }
        let aggregate = AutosaveError::RemoveAll { failures };
        warn!(error = %aggregate, "shadow file cleanup finished with failures");
        if policy == ErrorPolicy::Report {
            self.reporter.report(&aggregate);
        }
    }

    fn autosave_document<S: EditorStack>(&mut self, stack: &mut S, index: usize) -> Result<bool> {
        let original = stack.document(index).filename().to_path_buf();
        let shadow_path = self.ensure_tracked(&original)?;

        let fingerprint = stack.compute_hash(stack.document(index));
        let up_to_date = self
            .tracked
            .get(&original)
            .and_then(|entry| entry.last_fingerprint.as_ref())
            == Some(&fingerprint);
        if up_to_date {
            // The shadow file already holds exactly this content.
            stack.document_mut(index).mark_autosaved();
            return Ok(false);
        }

        let content = stack.document(index).contents();
        self.backend.write(&shadow_path, &content)?;

        if let Some(entry) = self.tracked.get_mut(&original) {
            entry.last_fingerprint = Some(fingerprint);
        }
        stack.document_mut(index).mark_autosaved();
        Ok(true)
    }

    /// Look up the shadow path for `original`, assigning and registering one
    /// on first contact.
    fn ensure_tracked(&mut self, original: &Path) -> Result<PathBuf> {
        if let Some(entry) = self.tracked.get(original) {
            return Ok(entry.shadow_path.clone());
        }
        let shadow_path = self.next_shadow_path(original)?;
        self.tracked.insert(
            original.to_path_buf(),
            TrackedFile {
                shadow_path: shadow_path.clone(),
                last_fingerprint: None,
            },
        );
        Ok(shadow_path)
    }

    /// First free shadow path for `original`: the bare file name inside the
    /// shadow directory, then `name-1.ext`, `name-2.ext`, … when another
    /// tracked document already claimed the candidate.
    fn next_shadow_path(&self, original: &Path) -> Result<PathBuf> {
        let file_name = original
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("untitled");
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (file_name, None),
        };

        for attempt in 0..MAX_PATH_CANDIDATES {
            let candidate_name = if attempt == 0 {
                file_name.to_string()
            } else {
                match ext {
                    Some(ext) => format!("{stem}-{attempt}.{ext}"),
                    None => format!("{stem}-{attempt}"),
                }
            };
            let candidate = self.shadow_dir.join(candidate_name);
            let taken = self
                .tracked
                .values()
                .any(|entry| entry.shadow_path == candidate);
            if !taken {
                return Ok(candidate);
            }
        }

        Err(AutosaveError::PathExhausted {
            original: original.to_path_buf(),
            candidates: MAX_PATH_CANDIDATES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint_text;
    use crate::shadow::MemBackend;
    use crate::test_utils::{FakeDocument, FakeStack, RecordingReporter};
    use std::collections::HashMap;

    fn make_engine() -> AutosaveEngine<MemBackend, RecordingReporter> {
        AutosaveEngine::new(MemBackend::new(), RecordingReporter::default(), "/shadow")
    }

    #[test]
    fn test_unchanged_document_skips_hash_and_write() {
        let mut engine = make_engine();
        let mut stack = FakeStack::new(vec![FakeDocument::unchanged("orig", "content")]);

        engine.autosave(0, &mut stack);

        assert_eq!(*stack.hash_calls.borrow(), 0);
        assert!(engine.backend().write_calls().is_empty());
        assert_eq!(engine.name_mapping().count(), 0);
    }

    #[test]
    fn test_autosave_updates_fingerprint_cache() {
        let mut engine = make_engine();
        engine.track("orig", "autosave");
        let mut stack = FakeStack::new(vec![FakeDocument::changed("orig", "buffer text")]);

        engine.autosave(0, &mut stack);

        let cache: HashMap<_, _> = engine.fingerprints().collect();
        let expected = fingerprint_text("buffer text");
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(Path::new("autosave")).map(|f| f.as_str()),
            Some(expected.as_str())
        );
        assert_eq!(engine.backend().content(Path::new("autosave")).as_deref(), Some("buffer text"));
        assert!(!stack.docs[0].changed);
    }

    #[test]
    fn test_first_autosave_assigns_shadow_path() {
        let mut engine = make_engine();
        let mut stack = FakeStack::new(vec![FakeDocument::changed("/home/me/notes.txt", "hi")]);

        engine.autosave(0, &mut stack);

        let mapping: Vec<_> = engine.name_mapping().collect();
        assert_eq!(
            mapping,
            vec![(
                Path::new("/home/me/notes.txt"),
                Path::new("/shadow/notes.txt")
            )]
        );
        assert!(engine.backend().contains(Path::new("/shadow/notes.txt")));
    }

    #[test]
    fn test_shadow_path_collision_appends_counter() {
        let mut engine = make_engine();
        let mut stack = FakeStack::new(vec![
            FakeDocument::changed("/a/notes.txt", "one"),
            FakeDocument::changed("/b/notes.txt", "two"),
            FakeDocument::changed("/c/Makefile", "three"),
            FakeDocument::changed("/d/Makefile", "four"),
        ]);

        engine.autosave(0, &mut stack);

        assert_eq!(
            engine.shadow_path_for(Path::new("/b/notes.txt")),
            Some(Path::new("/shadow/notes-1.txt"))
        );
        assert_eq!(
            engine.shadow_path_for(Path::new("/d/Makefile")),
            Some(Path::new("/shadow/Makefile-1"))
        );
    }

    #[test]
    fn test_unchanged_fingerprint_skips_write_but_clears_flag() {
        let mut engine = make_engine();
        let mut stack = FakeStack::new(vec![FakeDocument::changed("orig", "same text")]);

        engine.autosave(0, &mut stack);
        assert_eq!(engine.backend().write_calls().len(), 1);

        // Flag re-set without a real content change (e.g. undo back to the
        // saved state).
        stack.docs[0].changed = true;
        engine.autosave(1, &mut stack);

        assert_eq!(engine.backend().write_calls().len(), 1);
        assert!(!stack.docs[0].changed);
    }

    #[test]
    fn test_write_failure_is_isolated_per_document() {
        let mut engine = make_engine();
        engine.backend().poison_write(Path::new("/shadow/broken.txt"));
        let mut stack = FakeStack::new(vec![
            FakeDocument::changed("/x/broken.txt", "lost?"),
            FakeDocument::changed("/x/fine.txt", "kept"),
        ]);

        engine.autosave(0, &mut stack);

        // The healthy document still made it to its shadow file.
        assert_eq!(engine.backend().content(Path::new("/shadow/fine.txt")).as_deref(), Some("kept"));
        // One report for the broken one, whose flag stays set for retry.
        assert_eq!(engine.reporter().reports.len(), 1);
        assert!(stack.docs[0].changed);
        assert!(!stack.docs[1].changed);
        // No fingerprint was cached for the failed write.
        assert!(engine
            .fingerprints()
            .all(|(path, _)| path != Path::new("/shadow/broken.txt")));
    }

    #[test]
    fn test_remove_shadow_file_cleans_mapping_and_cache() {
        let mut engine = make_engine();
        engine.track("orig", "autosave");
        let mut stack = FakeStack::new(vec![FakeDocument::changed("orig", "text")]);
        engine.autosave(0, &mut stack);

        engine.remove_shadow_file(Path::new("orig"), ErrorPolicy::Ignore);

        assert_eq!(engine.name_mapping().count(), 0);
        assert_eq!(engine.fingerprints().count(), 0);
        assert_eq!(engine.backend().remove_calls(), vec![PathBuf::from("autosave")]);
        assert!(engine.reporter().reports.is_empty());
    }

    #[test]
    fn test_remove_shadow_file_untracked_is_noop() {
        let mut engine = make_engine();
        engine.remove_shadow_file(Path::new("never-seen"), ErrorPolicy::Report);
        assert!(engine.backend().remove_calls().is_empty());
        assert!(engine.reporter().reports.is_empty());
    }

    #[test]
    fn test_remove_shadow_file_failure_still_cleans_up() {
        for policy in [ErrorPolicy::Ignore, ErrorPolicy::Report] {
            let mut engine = make_engine();
            engine.track("orig", "autosave");
            engine.backend().set_simulate_remove_error(true);

            engine.remove_shadow_file(Path::new("orig"), policy);

            assert_eq!(engine.name_mapping().count(), 0);
            assert_eq!(engine.backend().remove_calls(), vec![PathBuf::from("autosave")]);
            let expected_reports = if policy == ErrorPolicy::Report { 1 } else { 0 };
            assert_eq!(engine.reporter().reports.len(), expected_reports);
        }
    }

    #[test]
    fn test_remove_all_removes_in_insertion_order() {
        let mut engine = make_engine();
        for idx in 0..3 {
            engine.track(format!("orig_{idx}"), format!("autosave_{idx}"));
        }

        engine.remove_all_shadow_files(ErrorPolicy::Report);

        assert_eq!(
            engine.backend().remove_calls(),
            vec![
                PathBuf::from("autosave_0"),
                PathBuf::from("autosave_1"),
                PathBuf::from("autosave_2"),
            ]
        );
        assert_eq!(engine.name_mapping().count(), 0);
        assert!(engine.reporter().reports.is_empty());
    }

    #[test]
    fn test_remove_all_reports_one_aggregate_failure() {
        for policy in [ErrorPolicy::Ignore, ErrorPolicy::Report] {
            let mut engine = make_engine();
            for idx in 0..3 {
                engine.track(format!("orig_{idx}"), format!("autosave_{idx}"));
            }
            engine.backend().set_simulate_remove_error(true);

            engine.remove_all_shadow_files(policy);

            // Every deletion is attempted despite the failures.
            assert_eq!(engine.backend().remove_calls().len(), 3);
            assert_eq!(engine.name_mapping().count(), 0);
            let expected_reports = if policy == ErrorPolicy::Report { 1 } else { 0 };
            assert_eq!(engine.reporter().reports.len(), expected_reports);
            if policy == ErrorPolicy::Report {
                assert!(engine.reporter().reports[0].contains("3 shadow file(s)"));
            }
        }
    }

    #[test]
    fn test_file_renamed_moves_tracking() {
        let mut engine = make_engine();
        let mut stack = FakeStack::new(vec![FakeDocument::changed("/p/old.txt", "v1")]);
        engine.autosave(0, &mut stack);
        assert!(engine.is_tracked(Path::new("/p/old.txt")));

        stack.docs[0].filename = PathBuf::from("/p/new.txt");
        stack.docs[0].changed = true;
        engine.file_renamed(Path::new("/p/old.txt"), Path::new("/p/new.txt"), &mut stack);

        assert!(!engine.is_tracked(Path::new("/p/old.txt")));
        assert_eq!(
            engine.shadow_path_for(Path::new("/p/new.txt")),
            Some(Path::new("/shadow/new.txt"))
        );
        assert_eq!(engine.backend().content(Path::new("/shadow/new.txt")).as_deref(), Some("v1"));
        assert!(!engine.backend().contains(Path::new("/shadow/old.txt")));
    }

    #[test]
    fn test_shadow_path_exhaustion_reports_and_continues() {
        let mut engine = make_engine();
        // Claim the bare name and every numbered candidate.
        engine.track("seed", "/shadow/clash");
        for attempt in 1..MAX_PATH_CANDIDATES {
            engine.track(format!("seed_{attempt}"), format!("/shadow/clash-{attempt}"));
        }
        let mut stack = FakeStack::new(vec![
            FakeDocument::changed("/y/clash", "no room"),
            FakeDocument::changed("/y/ok.txt", "fits"),
        ]);

        engine.autosave(0, &mut stack);

        assert_eq!(engine.reporter().reports.len(), 1);
        assert!(!engine.is_tracked(Path::new("/y/clash")));
        assert!(engine.backend().contains(Path::new("/shadow/ok.txt")));
    }
}
