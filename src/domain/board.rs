use crate::domain::ordering;
use crate::domain::stage::Stage;
use crate::domain::task::{Category, Priority, Task, TaskId, TaskSequence};
use crate::domain::timer::{self, TaskTimer};
use crate::error::{Result, TaskflowError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-user board state: three ordered task lists keyed by stage.
///
/// Owned by exactly one user. All mutation is synchronous; the hosting
/// event loop dispatches one operation at a time, so no two edits ever
/// interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    columns: [Vec<Task>; 3],
    seq: TaskSequence,
    last_updated: DateTime<Utc>,
}

/// Aggregate figures for the analytics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
    /// Mean progress across all tasks, rounded; 0 on an empty board.
    pub average_progress: u8,
    /// Share of tasks in Done, as a rounded percentage.
    pub completion_rate: u8,
}

impl Board {
    /// Creates an empty board around an injected id sequence.
    pub fn new(seq: TaskSequence) -> Self {
        Self {
            columns: [Vec::new(), Vec::new(), Vec::new()],
            seq,
            last_updated: Utc::now(),
        }
    }

    pub fn sequence(&self) -> &TaskSequence {
        &self.seq
    }

    pub(crate) fn sequence_mut(&mut self) -> &mut TaskSequence {
        &mut self.seq
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Tasks in the given stage, in board order.
    pub fn tasks_in(&self, stage: Stage) -> &[Task] {
        &self.columns[stage as usize]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    /// All tasks in stage order, then board order within each stage.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flatten()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.iter().find(|t| &t.id == id)
    }

    pub fn get(&self, id: &TaskId) -> Result<&Task> {
        self.find(id)
            .ok_or_else(|| TaskflowError::TaskNotFound(id.to_string()))
    }

    /// Creates a task from a submitted description. Blank submissions
    /// create nothing and consume no id.
    pub fn add_task(
        &mut self,
        text: &str,
        priority: Priority,
        category: Category,
        due_date: Option<NaiveDate>,
    ) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let mut task = Task::new(self.seq.next_id(), text)?;
        task.priority = priority;
        task.category = category;
        task.due_date = due_date;
        self.columns[Stage::Todo as usize].push(task);
        self.renumber(Stage::Todo);
        self.touch();
        self.tasks_in(Stage::Todo).last()
    }

    /// Removes a task from the board. The confirmation prompt is the UI's
    /// concern; by the time this runs the deletion is decided.
    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task> {
        let (stage, index) = self.locate(id)?;
        let task = self.columns[stage as usize].remove(index);
        self.renumber(stage);
        self.touch();
        tracing::debug!(task = %task.id, "task removed");
        Ok(task)
    }

    pub fn set_text(&mut self, id: &TaskId, text: &str) -> Result<bool> {
        let changed = self.task_mut(id)?.set_text(text);
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    pub fn set_priority(&mut self, id: &TaskId, priority: Priority) -> Result<()> {
        self.task_mut(id)?.set_priority(priority);
        self.touch();
        Ok(())
    }

    pub fn set_category(&mut self, id: &TaskId, category: Category) -> Result<()> {
        self.task_mut(id)?.set_category(category);
        self.touch();
        Ok(())
    }

    pub fn set_due_date(&mut self, id: &TaskId, due_date: Option<NaiveDate>) -> Result<()> {
        self.task_mut(id)?.set_due_date(due_date);
        self.touch();
        Ok(())
    }

    /// Steps progress up by ten and re-derives the stage. Returns the new
    /// progress value.
    pub fn increase_progress(&mut self, id: &TaskId) -> Result<u8> {
        self.step_progress(id, true)
    }

    /// Steps progress down by ten and re-derives the stage. Returns the new
    /// progress value.
    pub fn decrease_progress(&mut self, id: &TaskId) -> Result<u8> {
        self.step_progress(id, false)
    }

    fn step_progress(&mut self, id: &TaskId, up: bool) -> Result<u8> {
        let (stage, index) = self.locate(id)?;
        let task = &mut self.columns[stage as usize][index];
        let moved = if up {
            task.increase_progress()
        } else {
            task.decrease_progress()
        };
        let progress = task.progress;
        if moved {
            // Every progress edit re-applies the policy, even right after a
            // manual drag placed the task somewhere else.
            let target = Stage::derive(stage, progress);
            if target != stage {
                let task = self.columns[stage as usize].remove(index);
                self.insert_at(task, target, None);
                self.renumber(stage);
            }
            self.touch();
        }
        Ok(progress)
    }

    /// Relocates a task to `stage`, inserting at `position` (end when None
    /// or out of range). Manual placement: the progress policy is not
    /// consulted, and only `position` values in the affected columns move.
    pub fn move_to(&mut self, id: &TaskId, stage: Stage, position: Option<usize>) -> Result<()> {
        let (source, index) = self.locate(id)?;
        let task = self.columns[source as usize].remove(index);
        self.insert_at(task, stage, position);
        self.renumber(source);
        self.touch();
        Ok(())
    }

    /// Completes a drag gesture: computes the insertion index from the
    /// pointer's vertical coordinate and the centers of the other visible
    /// tasks in the target column, then relocates the task there.
    ///
    /// Deliberately bypasses the progress policy; the next progress edit
    /// may move the task again.
    pub fn drop_task(
        &mut self,
        id: &TaskId,
        stage: Stage,
        pointer_y: f64,
        centers: &[f64],
    ) -> Result<usize> {
        let index = ordering::insertion_index(pointer_y, centers);
        self.move_to(id, stage, Some(index))?;
        Ok(index)
    }

    /// Begins a countdown on a task, force-pausing whichever other task
    /// currently holds the running slot. Out-of-range durations fall back
    /// to the default.
    pub fn start_timer(&mut self, id: &TaskId, minutes: Option<u32>) -> Result<()> {
        self.get(id)?;
        let minutes = timer::sanitize_minutes(minutes);
        for task in self.columns.iter_mut().flatten() {
            if &task.id != id && task.timer_running() {
                if let Some(t) = task.timer.as_mut() {
                    t.pause();
                }
                tracing::debug!(task = %task.id, "timer force-paused");
            }
        }
        let task = self.task_mut(id)?;
        task.timer = Some(TaskTimer::start(minutes));
        self.touch();
        Ok(())
    }

    /// Stops a task's countdown without resetting it. Always succeeds for
    /// a known task; pausing an idle timer is a no-op.
    pub fn pause_timer(&mut self, id: &TaskId) -> Result<()> {
        let task = self.task_mut(id)?;
        if let Some(t) = task.timer.as_mut() {
            t.pause();
        }
        self.touch();
        Ok(())
    }

    /// The task currently holding the single running-timer slot.
    pub fn running_timer(&self) -> Option<&Task> {
        self.iter().find(|t| t.timer_running())
    }

    /// Advances the running countdown by one second. When it expires the
    /// task is forced into In Progress (unless already Done) and its id is
    /// returned so the caller can raise a notification.
    pub fn tick(&mut self) -> Option<TaskId> {
        let mut expired = None;
        'columns: for column in self.columns.iter_mut() {
            for task in column.iter_mut() {
                if task.timer_running() {
                    if let Some(t) = task.timer.as_mut() {
                        if t.tick() {
                            expired = Some(task.id.clone());
                        }
                    }
                    // At most one timer runs board-wide.
                    break 'columns;
                }
            }
        }
        if let Some(id) = &expired {
            if let Ok((stage, index)) = self.locate(id) {
                if stage == Stage::Todo {
                    let task = self.columns[stage as usize].remove(index);
                    self.insert_at(task, Stage::InProgress, None);
                    self.renumber(stage);
                }
            }
            self.touch();
        }
        expired
    }

    /// Aggregate counts for the analytics panel.
    pub fn stats(&self) -> BoardStats {
        let todo = self.tasks_in(Stage::Todo).len();
        let in_progress = self.tasks_in(Stage::InProgress).len();
        let done = self.tasks_in(Stage::Done).len();
        let total = todo + in_progress + done;
        let overdue = self.iter().filter(|t| t.is_overdue()).count();

        let (average_progress, completion_rate) = if total == 0 {
            (0, 0)
        } else {
            let sum: u32 = self.iter().map(|t| t.progress as u32).sum();
            let avg = (sum as f64 / total as f64).round() as u8;
            let rate = (done as f64 / total as f64 * 100.0).round() as u8;
            (avg, rate)
        };

        BoardStats {
            total,
            todo,
            in_progress,
            done,
            overdue,
            average_progress,
            completion_rate,
        }
    }

    /// Empties every column. The id sequence keeps its cursor; ids are
    /// never reused.
    pub fn clear(&mut self) {
        for column in self.columns.iter_mut() {
            column.clear();
        }
        self.touch();
    }

    pub(crate) fn push_restored(&mut self, task: Task) {
        self.seq.observe(&task.id);
        let stage = task.stage;
        self.columns[stage as usize].push(task);
        self.renumber(stage);
    }

    pub(crate) fn set_last_updated(&mut self, when: DateTime<Utc>) {
        self.last_updated = when;
    }

    fn locate(&self, id: &TaskId) -> Result<(Stage, usize)> {
        for stage in Stage::ALL {
            if let Some(index) = self.columns[stage as usize]
                .iter()
                .position(|t| &t.id == id)
            {
                return Ok((stage, index));
            }
        }
        Err(TaskflowError::TaskNotFound(id.to_string()))
    }

    fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task> {
        let (stage, index) = self.locate(id)?;
        Ok(&mut self.columns[stage as usize][index])
    }

    fn insert_at(&mut self, mut task: Task, stage: Stage, position: Option<usize>) {
        task.stage = stage;
        let column = &mut self.columns[stage as usize];
        let index = position.unwrap_or(column.len()).min(column.len());
        column.insert(index, task);
        self.renumber(stage);
    }

    fn renumber(&mut self, stage: Stage) {
        for (index, task) in self.columns[stage as usize].iter_mut().enumerate() {
            task.position = index;
        }
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(TaskSequence::new())
    }
}
