use crate::domain::task::{Category, Priority, Task};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting a column view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Text,
    Priority,
    DueDate,
    Progress,
    Created,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SortField::Text),
            "priority" => Ok(SortField::Priority),
            "due-date" | "due_date" => Ok(SortField::DueDate),
            "progress" => Ok(SortField::Progress),
            "created" => Ok(SortField::Created),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: text, priority, due-date, progress, created",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!("Invalid sort order '{}'. Valid orders: asc, desc", s)),
        }
    }
}

/// Sorts a column view in place. Sorting is a presentation concern: callers
/// sort a copy of a column, never the board's own lists, so drag positions
/// survive a sorted view.
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let cmp = match field {
            SortField::Text => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
            SortField::Priority => priority_rank(a.priority).cmp(&priority_rank(b.priority)),
            SortField::DueDate => compare_option_dates(a.due_date, b.due_date),
            SortField::Progress => a.progress.cmp(&b.progress),
            SortField::Created => a.created_at.cmp(&b.created_at),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Criteria for narrowing a column view. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(category) = self.category {
            if task.category != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() && !task.text.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

fn priority_rank(p: Priority) -> u8 {
    match p {
        Priority::Low => 0,
        Priority::Medium => 1,
        Priority::High => 2,
    }
}

/// Compare Option<NaiveDate> with None always sorting to end
fn compare_option_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
