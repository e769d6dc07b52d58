//! When the active asset's metadata is flushed without being asked.
//!
//! Edits are counted for one asset at a time. A save becomes due once the
//! edits have been quiet for the debounce delay and the previous attempt is
//! at least the minimum interval old. Switching assets starts the count over;
//! the session flushes the previous asset itself before it switches.

use std::time::Duration;
use web_time::Instant;

/// Debounce and spacing of automatic asset saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTiming {
    /// Quiet time required after the last edit.
    pub debounce: Duration,
    /// Minimum time between two save attempts, failed ones included.
    pub min_interval: Duration,
}

impl SaveTiming {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);
    pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(10);

    pub fn from_millis(debounce_ms: u64, min_interval_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }
}

impl Default for SaveTiming {
    fn default() -> Self {
        Self {
            debounce: Self::DEFAULT_DEBOUNCE,
            min_interval: Self::DEFAULT_MIN_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FlushState {
    #[default]
    Idle,
    InFlight,
}

/// Unsaved edits of the active asset and the timing of their flush.
#[derive(Debug)]
pub struct SaveTracker {
    timing: SaveTiming,
    enabled: bool,

    asset_id: Option<String>,
    pending_edits: usize,
    last_edit: Option<Instant>,
    last_attempt: Option<Instant>,
    flush: FlushState,
}

impl SaveTracker {
    pub fn new(timing: SaveTiming, enabled: bool) -> Self {
        Self {
            timing,
            enabled,
            asset_id: None,
            pending_edits: 0,
            last_edit: None,
            last_attempt: None,
            flush: FlushState::Idle,
        }
    }

    pub fn timing(&self) -> SaveTiming {
        self.timing
    }

    /// Take new timing; pending edits stay pending.
    pub fn set_timing(&mut self, timing: SaveTiming) {
        self.timing = timing;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("💾 Auto-save {}", if enabled { "on" } else { "off" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Asset whose edits are being counted.
    pub fn asset_id(&self) -> Option<&str> {
        self.asset_id.as_deref()
    }

    /// Start counting for another asset. Anything still pending belongs to
    /// the previous asset and is forgotten.
    pub fn switch_asset(&mut self, asset_id: Option<&str>) {
        if self.pending_edits > 0 {
            log::debug!(
                "💾 Forgetting {} pending edit(s) of {:?}",
                self.pending_edits,
                self.asset_id
            );
        }
        *self = Self::new(self.timing, self.enabled);
        self.asset_id = asset_id.map(str::to_string);
    }

    pub fn record_edit(&mut self) {
        self.pending_edits += 1;
        self.last_edit = Some(Instant::now());
        log::trace!("Save tracker: {} pending edit(s)", self.pending_edits);
    }

    pub fn pending_edits(&self) -> usize {
        self.pending_edits
    }

    pub fn is_dirty(&self) -> bool {
        self.pending_edits > 0
    }

    /// Moment the next automatic save becomes due. None while disabled,
    /// flushing, or with nothing pending.
    pub fn due_at(&self) -> Option<Instant> {
        if !self.enabled || self.flush == FlushState::InFlight || !self.is_dirty() {
            return None;
        }
        let quiet = self.last_edit? + self.timing.debounce;
        Some(match self.last_attempt {
            Some(attempt) => quiet.max(attempt + self.timing.min_interval),
            None => quiet,
        })
    }

    pub fn should_save(&self) -> bool {
        self.due_at().is_some_and(|due| Instant::now() >= due)
    }

    /// Enter a flush. Returns false, and the caller skips its save, when one
    /// is already running.
    pub fn begin_flush(&mut self) -> bool {
        if self.flush == FlushState::InFlight {
            log::debug!("💾 Flush of {:?} already in flight", self.asset_id);
            return false;
        }
        self.flush = FlushState::InFlight;
        true
    }

    /// Leave a flush. A failed one keeps its edits pending for the next
    /// attempt after the minimum interval.
    pub fn end_flush(&mut self, saved: bool) {
        self.flush = FlushState::Idle;
        if saved {
            self.record_saved();
        } else {
            self.last_attempt = Some(Instant::now());
            log::trace!("Save tracker: flush failed, {} edit(s) still pending", self.pending_edits);
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.flush == FlushState::InFlight
    }

    /// Everything pending reached storage, through a flush or another save
    /// such as a review decision.
    pub fn record_saved(&mut self) {
        self.pending_edits = 0;
        self.last_edit = None;
        self.last_attempt = Some(Instant::now());
    }
}

impl Default for SaveTracker {
    fn default() -> Self {
        Self::new(SaveTiming::default(), true)
    }
}
