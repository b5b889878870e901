use super::backend::ShadowBackend;
use crate::error::{AutosaveError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// In-memory shadow backend for testing.
///
/// Uses `RefCell` for interior mutability since autosave runs on a single
/// logical thread. This keeps the `ShadowBackend` trait on `&self` without
/// dragging in a lock.
///
/// Every `write`/`remove` call is logged, including failed ones, so tests
/// can assert exactly which paths the engine touched and in what order.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, String>>,
    write_log: RefCell<Vec<PathBuf>>,
    remove_log: RefCell<Vec<PathBuf>>,
    simulate_write_error: RefCell<bool>,
    simulate_remove_error: RefCell<bool>,
    poisoned_writes: RefCell<HashSet<PathBuf>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent `write`.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Fail every subsequent `remove`.
    pub fn set_simulate_remove_error(&self, simulate: bool) {
        *self.simulate_remove_error.borrow_mut() = simulate;
    }

    /// Fail writes to one specific path only, for per-document isolation
    /// tests.
    pub fn poison_write(&self, path: &Path) {
        self.poisoned_writes.borrow_mut().insert(path.to_path_buf());
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    pub fn write_calls(&self) -> Vec<PathBuf> {
        self.write_log.borrow().clone()
    }

    pub fn remove_calls(&self) -> Vec<PathBuf> {
        self.remove_log.borrow().clone()
    }
}

impl ShadowBackend for MemBackend {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.write_log.borrow_mut().push(path.to_path_buf());

        if *self.simulate_write_error.borrow() || self.poisoned_writes.borrow().contains(path) {
            return Err(AutosaveError::Backend("Simulated write error".to_string()));
        }

        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.remove_log.borrow_mut().push(path.to_path_buf());

        if *self.simulate_remove_error.borrow() {
            return Err(AutosaveError::Backend("Simulated remove error".to_string()));
        }

        self.files.borrow_mut().remove(path);
        Ok(())
    }
}
