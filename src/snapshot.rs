//! Snapshot capture and restore: the bridge between live board state and
//! the persisted/exported wire format.
//!
//! The wire format is deliberately lenient on read. Boards exported by
//! earlier versions of the system carry progress values as strings, empty
//! strings for missing due dates, and sometimes no ids at all; all of that
//! must rehydrate cleanly. Writes always produce the canonical shape.

use crate::domain::board::Board;
use crate::domain::stage::Stage;
use crate::domain::task::{snap_progress, Category, Priority, Task, TaskId};
use crate::error::{Result, TaskflowError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The stable fields of one task on the wire. Position is implicit in list
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(
        rename = "dueDate",
        default,
        serialize_with = "ser_due_date",
        deserialize_with = "de_due_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "de_progress")]
    pub progress: u8,
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.as_str().to_string(),
            text: task.text.clone(),
            priority: task.priority,
            due_date: task.due_date,
            category: task.category,
            progress: task.progress,
        }
    }

    fn into_task(self, id: TaskId, stage: Stage) -> Task {
        let now = Utc::now();
        Task {
            id,
            text: self.text,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            progress: snap_progress(self.progress as i64),
            stage,
            position: 0,
            timer: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Serializable representation of full board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub todo: Vec<TaskRecord>,
    #[serde(default)]
    pub in_progress: Vec<TaskRecord>,
    #[serde(default)]
    pub done: Vec<TaskRecord>,
    #[serde(rename = "lastUpdated", default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    /// Captures the board's current state.
    pub fn capture(board: &Board) -> Self {
        let records = |stage: Stage| -> Vec<TaskRecord> {
            board
                .tasks_in(stage)
                .iter()
                .map(TaskRecord::from_task)
                .collect()
        };
        Self {
            todo: records(Stage::Todo),
            in_progress: records(Stage::InProgress),
            done: records(Stage::Done),
            last_updated: board.last_updated(),
        }
    }

    /// Parses snapshot text. Malformed input surfaces as an import-format
    /// error and touches nothing.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| TaskflowError::ImportFormat(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuilds the board from this snapshot: total replacement, not a
    /// merge. Original ids and ordering are preserved; records without an
    /// id get a fresh one. Numeric ids bump the sequence cursor so later
    /// creations never collide.
    pub fn restore_into(self, board: &mut Board) {
        board.clear();
        let lists = [
            (Stage::Todo, self.todo),
            (Stage::InProgress, self.in_progress),
            (Stage::Done, self.done),
        ];
        for (stage, records) in lists {
            for record in records {
                let id = if record.id.is_empty() {
                    board.sequence_mut().next_id()
                } else {
                    TaskId::from(record.id.as_str())
                };
                board.push_restored(record.into_task(id, stage));
            }
        }
        board.set_last_updated(self.last_updated);
        tracing::debug!(tasks = board.len(), "board restored from snapshot");
    }
}

/// A snapshot annotated for download: who exported it and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedBoard {
    pub user: String,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

impl ExportedBoard {
    pub fn new(user: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            user: user.into(),
            exported_at: Utc::now(),
            snapshot,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Download name for an exported board file.
pub fn export_file_name(user: &str, date: NaiveDate) -> String {
    format!("kanban_board_{}_{}.json", user, date.format("%Y-%m-%d"))
}

fn ser_due_date<S: Serializer>(date: &Option<NaiveDate>, s: S) -> std::result::Result<S::Ok, S::Error> {
    // The wire format uses the empty string for "no due date".
    match date {
        Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => s.serialize_str(""),
    }
}

fn de_due_date<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn de_progress<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u8, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Number(n) => Ok(snap_progress(n)),
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(snap_progress)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskSequence;

    fn sample_board() -> Board {
        let mut board = Board::new(TaskSequence::new());
        board
            .add_task("Write report", Priority::High, Category::Work, None)
            .unwrap();
        board
            .add_task(
                "Buy milk",
                Priority::Low,
                Category::Personal,
                NaiveDate::from_ymd_opt(2025, 2, 1),
            )
            .unwrap();
        board
            .add_task("Read paper", Priority::Medium, Category::Study, None)
            .unwrap();
        let milk = board.iter().find(|t| t.text == "Buy milk").unwrap().id.clone();
        let paper = board.iter().find(|t| t.text == "Read paper").unwrap().id.clone();
        for _ in 0..5 {
            board.increase_progress(&milk).unwrap();
        }
        for _ in 0..10 {
            board.increase_progress(&paper).unwrap();
        }
        board
    }

    fn assert_boards_equivalent(a: &Board, b: &Board) {
        for stage in Stage::ALL {
            let left = a.tasks_in(stage);
            let right = b.tasks_in(stage);
            assert_eq!(left.len(), right.len(), "length mismatch in {}", stage);
            for (x, y) in left.iter().zip(right) {
                assert_eq!(x.id, y.id);
                assert_eq!(x.text, y.text);
                assert_eq!(x.priority, y.priority);
                assert_eq!(x.category, y.category);
                assert_eq!(x.due_date, y.due_date);
                assert_eq!(x.progress, y.progress);
                assert_eq!(x.position, y.position);
            }
        }
    }

    #[test]
    fn test_round_trip_empty_board() {
        let board = Board::default();
        let mut restored = Board::default();
        Snapshot::capture(&board).restore_into(&mut restored);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let board = sample_board();
        let json = Snapshot::capture(&board).to_json().unwrap();

        let mut restored = Board::default();
        Snapshot::parse(&json).unwrap().restore_into(&mut restored);
        assert_boards_equivalent(&board, &restored);
    }

    #[test]
    fn test_restore_is_total_replacement() {
        let mut board = Board::default();
        board
            .add_task("stale", Priority::default(), Category::default(), None)
            .unwrap();

        Snapshot::capture(&sample_board()).restore_into(&mut board);
        assert!(board.iter().all(|t| t.text != "stale"));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_restore_bumps_sequence_past_numeric_ids() {
        let mut board = Board::default();
        Snapshot::capture(&sample_board()).restore_into(&mut board);

        let task = board
            .add_task("new", Priority::default(), Category::default(), None)
            .unwrap();
        assert_eq!(task.id.as_str(), "task-4");
    }

    #[test]
    fn test_lenient_import_string_progress_and_foreign_id() {
        let json = r#"{
            "todo": [],
            "in_progress": [
                {"id": "x", "text": "Demo", "progress": "50", "category": "work"}
            ],
            "done": [],
            "lastUpdated": "2025-01-21T01:37:13Z"
        }"#;

        let mut board = Board::default();
        Snapshot::parse(json).unwrap().restore_into(&mut board);

        let column = board.tasks_in(Stage::InProgress);
        assert_eq!(column.len(), 1);
        let task = &column[0];
        assert_eq!(task.id.as_str(), "x");
        assert_eq!(task.text, "Demo");
        assert_eq!(task.progress, 50);
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, Priority::Medium);
        assert!(board.tasks_in(Stage::Todo).is_empty());
        assert!(board.tasks_in(Stage::Done).is_empty());
    }

    #[test]
    fn test_import_empty_due_date_string_is_absent() {
        let json = r#"{
            "todo": [{"id": "task-1", "text": "a", "dueDate": "", "progress": 0}],
            "in_progress": [],
            "done": [],
            "lastUpdated": "2025-01-21T01:37:13Z"
        }"#;
        let snapshot = Snapshot::parse(json).unwrap();
        assert!(snapshot.todo[0].due_date.is_none());
    }

    #[test]
    fn test_import_unknown_category_falls_back_to_other() {
        let json = r#"{
            "todo": [{"id": "task-1", "text": "a", "category": "errands", "progress": 0}],
            "in_progress": [],
            "done": [],
            "lastUpdated": "2025-01-21T01:37:13Z"
        }"#;
        let snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(snapshot.todo[0].category, Category::Other);
    }

    #[test]
    fn test_import_record_without_id_gets_fresh_one() {
        let json = r#"{
            "todo": [{"text": "legacy", "priority": "high", "dueDate": ""}],
            "in_progress": [],
            "done": [],
            "lastUpdated": "2025-01-21T01:37:13Z"
        }"#;
        let mut board = Board::default();
        Snapshot::parse(json).unwrap().restore_into(&mut board);
        assert_eq!(board.tasks_in(Stage::Todo)[0].id.as_str(), "task-1");
    }

    #[test]
    fn test_imported_progress_snaps_to_step_grid() {
        let json = r#"{
            "todo": [{"id": "a", "text": "a", "progress": 55},
                     {"id": "b", "text": "b", "progress": 250}],
            "in_progress": [],
            "done": [],
            "lastUpdated": "2025-01-21T01:37:13Z"
        }"#;
        let snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(snapshot.todo[0].progress, 60);
        assert_eq!(snapshot.todo[1].progress, 100);
    }

    #[test]
    fn test_malformed_input_is_an_import_format_error() {
        for bad in ["not json", "{\"todo\": 5}", ""] {
            assert!(matches!(
                Snapshot::parse(bad),
                Err(TaskflowError::ImportFormat(_))
            ));
        }
    }

    #[test]
    fn test_exported_file_parses_back_as_snapshot() {
        let board = sample_board();
        let exported = ExportedBoard::new("alice", Snapshot::capture(&board));
        let json = exported.to_json().unwrap();
        assert!(json.contains("\"user\""));
        assert!(json.contains("\"exportedAt\""));

        // Import accepts exported files directly; the annotations are
        // ignored.
        let mut restored = Board::default();
        Snapshot::parse(&json).unwrap().restore_into(&mut restored);
        assert_boards_equivalent(&board, &restored);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 21).unwrap();
        assert_eq!(
            export_file_name("alice", date),
            "kanban_board_alice_2025-01-21.json"
        );
    }
}
