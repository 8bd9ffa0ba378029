use crate::domain::stage::Stage;
use crate::domain::timer::TaskTimer;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Progress moves in fixed steps of ten percent.
pub const PROGRESS_STEP: u8 = 10;

/// Unique identifier for a task (e.g., task-1, task-42)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    const DEFAULT_PREFIX: &'static str = "task-";

    /// Creates a new TaskId from a sequence counter
    pub fn new(counter: u64) -> Self {
        Self(format!("{}{}", Self::DEFAULT_PREFIX, counter))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric portion of a generated id, if this id has one.
    /// Imported ids may be arbitrary strings and carry no counter.
    pub fn counter(&self) -> Option<u64> {
        self.0
            .strip_prefix(Self::DEFAULT_PREFIX)
            .and_then(|rest| rest.parse().ok())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for TaskId {
    type Err = crate::error::TaskflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(crate::error::TaskflowError::Other(
                "Task id must not be empty".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id generator with an explicit persisted cursor.
///
/// The cursor only ever moves forward; ids are never reused even across
/// sessions (the cursor round-trips through storage with the board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSequence {
    next: u64,
}

impl TaskSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Resumes a sequence from a previously persisted cursor.
    pub fn from_cursor(cursor: u64) -> Self {
        Self {
            next: cursor.max(1),
        }
    }

    pub fn cursor(&self) -> u64 {
        self.next
    }

    /// Hands out the next id and advances the cursor.
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next);
        self.next += 1;
        id
    }

    /// Moves the cursor past an id seen during restore so future ids
    /// never collide with it.
    pub fn observe(&mut self, id: &TaskId) {
        if let Some(n) = id.counter() {
            self.next = self.next.max(n + 1);
        }
    }
}

impl Default for TaskSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = crate::error::TaskflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(crate::error::TaskflowError::Other(format!(
                "Invalid priority: {}",
                s
            ))),
        }
    }
}

/// Task category. Unknown values from imported boards fall back to Other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Study,
    Health,
    #[serde(other)]
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => write!(f, "work"),
            Self::Personal => write!(f, "personal"),
            Self::Study => write!(f, "study"),
            Self::Health => write!(f, "health"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "work" => Category::Work,
            "personal" => Category::Personal,
            "study" => Category::Study,
            "health" => Category::Health,
            _ => Category::Other,
        })
    }
}

/// A board task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub progress: u8,
    pub stage: Stage,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TaskTimer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in To Do with zero progress.
    ///
    /// Returns None when the description is empty after trimming; a blank
    /// submission creates nothing rather than failing loudly.
    pub fn new(id: TaskId, text: impl Into<String>) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return None;
        }
        let now = Utc::now();
        Some(Self {
            id,
            text,
            priority: Priority::default(),
            category: Category::default(),
            due_date: None,
            progress: 0,
            stage: Stage::Todo,
            position: 0,
            timer: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the description. An empty edit is a no-op, not an error;
    /// returns whether the text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.text = trimmed.to_string();
        self.updated_at = Utc::now();
        true
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
        self.updated_at = Utc::now();
    }

    /// Steps progress up by ten, clamped at 100. Returns whether it moved.
    pub fn increase_progress(&mut self) -> bool {
        if self.progress >= 100 {
            return false;
        }
        self.progress = (self.progress + PROGRESS_STEP).min(100);
        self.updated_at = Utc::now();
        true
    }

    /// Steps progress down by ten, clamped at 0. Returns whether it moved.
    pub fn decrease_progress(&mut self) -> bool {
        if self.progress == 0 {
            return false;
        }
        self.progress = self.progress.saturating_sub(PROGRESS_STEP);
        self.updated_at = Utc::now();
        true
    }

    /// True iff the due date is set and strictly before `today`.
    /// Time of day is ignored.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < today)
    }

    /// Overdue check against the local calendar day.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.running)
    }
}

/// Clamps an arbitrary progress value into [0, 100] and snaps it to the
/// nearest multiple of ten. Used when rehydrating imported records.
pub(crate) fn snap_progress(raw: i64) -> u8 {
    let clamped = raw.clamp(0, 100) as u8;
    let step = PROGRESS_STEP;
    let snapped = (clamped + step / 2) / step * step;
    snapped.min(100)
}
