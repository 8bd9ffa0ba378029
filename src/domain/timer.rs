use serde::{Deserialize, Serialize};

/// Default countdown length in minutes.
pub const DEFAULT_MINUTES: u32 = 25;
/// User-configurable duration bounds, inclusive.
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;

/// Per-task countdown state.
///
/// The tick itself is caller-driven: whatever scheduler hosts the engine
/// calls `Board::tick` once a second, which delegates here. Only one timer
/// on the whole board runs at a time; that rule lives on the board, not on
/// the individual timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimer {
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub running: bool,
}

impl TaskTimer {
    /// Starts a fresh countdown over the given number of minutes.
    pub fn start(minutes: u32) -> Self {
        Self {
            duration_secs: minutes * 60,
            remaining_secs: minutes * 60,
            running: true,
        }
    }

    /// Stops the countdown without resetting the remaining time, so a
    /// later resume picks up where it left off.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resumes a paused countdown.
    pub fn resume(&mut self) {
        if self.remaining_secs > 0 {
            self.running = true;
        }
    }

    /// Advances the countdown by one second. Returns true when the timer
    /// just expired on this tick.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Remaining time formatted as M:SS for display.
    pub fn display(&self) -> String {
        format!(
            "{}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

/// Normalizes a requested duration. Anything outside 1–180 minutes (or an
/// unparseable value upstream, passed as None) quietly falls back to the
/// default rather than erroring.
pub fn sanitize_minutes(requested: Option<u32>) -> u32 {
    match requested {
        Some(m) if (MIN_MINUTES..=MAX_MINUTES).contains(&m) => m,
        _ => DEFAULT_MINUTES,
    }
}
