//! # TaskFlow Core
//!
//! Board and task state engine for TaskFlow kanban boards.
//!
//! This crate owns the rules of the board — task lifecycle, the
//! progress-driven stage transitions, drag reordering, the per-task
//! countdown timer, and snapshot serialization for persistence and
//! import/export — without any dependency on a specific UI or rendering
//! layer. The UI is a pure projection of this state and mutates it only
//! through the operations exposed here.

pub mod auth;
pub mod domain;
pub mod error;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardStats},
    sorting::{sort_tasks, SortField, SortOrder, TaskFilter},
    stage::Stage,
    task::{Category, Priority, Task, TaskId, TaskSequence},
    timer::TaskTimer,
};
pub use error::{Result, TaskflowError};
pub use snapshot::{export_file_name, ExportedBoard, Snapshot, TaskRecord};
pub use storage::{BoardStore, Storage};
