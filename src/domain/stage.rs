use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the three fixed kanban columns, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Todo,
    InProgress,
    Done,
}

impl Stage {
    /// All stages in fixed board order: todo → in_progress → done.
    pub const ALL: [Stage; 3] = [Stage::Todo, Stage::InProgress, Stage::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Todo => "todo",
            Stage::InProgress => "in_progress",
            Stage::Done => "done",
        }
    }

    /// Derives the stage a task belongs in after a progress edit.
    ///
    /// - 0 always routes back to To Do; a progress edit re-evaluates stage
    ///   even when a manual drag placed the task elsewhere.
    /// - A non-boundary value (1..=99) only promotes out of To Do; it never
    ///   pulls an In Progress or Done task backward.
    /// - 100 routes to Done unconditionally.
    ///
    /// Manual drags write the stage field directly and do not pass through
    /// here; the next progress edit re-applies this policy and may move the
    /// task again. Both writers are intentional (last writer wins).
    pub fn derive(current: Stage, progress: u8) -> Stage {
        match progress {
            0 => Stage::Todo,
            100 => Stage::Done,
            _ => match current {
                Stage::Todo => Stage::InProgress,
                other => other,
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = crate::error::TaskflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" | "to-do" => Ok(Stage::Todo),
            "in_progress" | "in-progress" => Ok(Stage::InProgress),
            "done" => Ok(Stage::Done),
            _ => Err(crate::error::TaskflowError::Other(format!(
                "Invalid stage: {}",
                s
            ))),
        }
    }
}
