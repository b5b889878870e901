//! The autosave scheduler: decides *when* a pass runs.
//!
//! Cooperative, single-threaded timing. The embedding event loop calls
//! [`AutosaveScheduler::poll`] with the current instant (the same way it
//! polls for input); the scheduler fires at most one pass per call and runs
//! it synchronously, so passes can never overlap. Deadlines that slipped by
//! several periods while the loop was busy yield one pass, not a backlog.

use crate::config::AutosaveConfig;
use crate::error::{AutosaveError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// The sink a scheduler drives.
///
/// Implemented by the embedding editor; a typical implementation forwards to
/// [`AutosaveEngine::autosave`](crate::engine::AutosaveEngine::autosave)
/// with the live document stack.
pub trait AutosavePass {
    fn autosave(&mut self, pass_id: u64);
}

/// Repeating-timer state plus the enabled/interval configuration.
///
/// Construction alone never triggers a pass. Exactly three things do:
/// a due [`poll`](Self::poll) while enabled, enabling from disabled, and
/// changing the interval while enabled.
pub struct AutosaveScheduler<P: AutosavePass> {
    pass: P,
    enabled: bool,
    interval: Duration,
    deadline: Option<Instant>,
    next_pass_id: u64,
}

impl<P: AutosavePass> AutosaveScheduler<P> {
    pub fn new(pass: P) -> Self {
        Self {
            pass,
            enabled: false,
            interval: DEFAULT_INTERVAL,
            deadline: None,
            next_pass_id: 0,
        }
    }

    /// Apply a config through the normal setters.
    ///
    /// An enabled config performs the initial pass: that is "enabling from
    /// disabled", not construction.
    pub fn from_config(pass: P, config: &AutosaveConfig, now: Instant) -> Result<Self> {
        let mut scheduler = Self::new(pass);
        scheduler.set_interval(config.interval(), now)?;
        scheduler.set_enabled(config.enabled, now);
        Ok(scheduler)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The last-set interval, exactly as given.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total passes triggered so far, across all trigger sources.
    pub fn passes_triggered(&self) -> u64 {
        self.next_pass_id
    }

    pub fn pass(&self) -> &P {
        &self.pass
    }

    pub fn pass_mut(&mut self) -> &mut P {
        &mut self.pass
    }

    /// Start or stop the repeating timer. Enabling from disabled arms the
    /// timer and immediately performs one pass; disabling disarms it.
    /// Idempotent in both directions.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            debug!(interval_ms = self.interval.as_millis() as u64, "autosave enabled");
            self.deadline = Some(now + self.interval);
            self.fire();
        } else {
            debug!("autosave disabled");
            self.deadline = None;
        }
    }

    /// Reconfigure the timer period. Rejects a zero interval. While
    /// enabled, re-arms from `now` and immediately performs one pass.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) -> Result<()> {
        if interval.is_zero() {
            return Err(AutosaveError::InvalidInterval);
        }
        self.interval = interval;
        if self.enabled {
            self.deadline = Some(now + interval);
            self.fire();
        }
        Ok(())
    }

    /// Cooperative timer tick, called from the owning event loop.
    ///
    /// While enabled, fires at most one pass per call once the deadline has
    /// elapsed, then re-arms from `now` (missed periods are skipped).
    /// Returns whether a pass ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval);
                self.fire();
                true
            }
            _ => false,
        }
    }

    fn fire(&mut self) {
        let pass_id = self.next_pass_id;
        self.next_pass_id += 1;
        trace!(pass_id, "autosave pass triggered");
        self.pass.autosave(pass_id);
    }
}
