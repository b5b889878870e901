//! The error-reporting collaborator.
//!
//! Autosave failures must reach the user without aborting the pass or the
//! cleanup loop that hit them. The engine routes every surfaced failure
//! through [`FailureReporter`]; the embedding editor supplies whatever
//! presentation it has (a dialog, a status line). [`LogReporter`] is the
//! headless default.

use crate::error::AutosaveError;

/// Receives autosave failures the engine decided to surface.
///
/// Invoked at most once per cleanup call, however many files failed; pass
/// execution may invoke it once per failing document.
pub trait FailureReporter {
    fn report(&mut self, error: &AutosaveError);
}

/// Reports failures to the `tracing` log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&mut self, error: &AutosaveError) {
        tracing::error!(error = %error, "autosave failure");
    }
}
