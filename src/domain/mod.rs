pub mod board;
pub mod ordering;
pub mod sorting;
pub mod stage;
pub mod task;
pub mod timer;

pub use board::{Board, BoardStats};
pub use sorting::{sort_tasks, SortField, SortOrder, TaskFilter};
pub use stage::Stage;
pub use task::{Category, Priority, Task, TaskId, TaskSequence};
pub use timer::TaskTimer;
