use crate::{
    domain::board::Board,
    error::{Result, TaskflowError},
    snapshot::{export_file_name, ExportedBoard, Snapshot},
    storage::Storage,
};
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one JSON file per key under a root directory.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    /// Creates a new FileStorage rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    fn key_file(&self, key: &str) -> PathBuf {
        // Keys embed usernames; anything the filesystem might object to
        // becomes an underscore.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root_path.join(format!("{}.json", safe))
    }

    fn unavailable(err: std::io::Error) -> TaskflowError {
        TaskflowError::StorageUnavailable(err.to_string())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_file(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn set(&self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.root_path)
            .await
            .map_err(Self::unavailable)?;
        fs::write(self.key_file(key), blob)
            .await
            .map_err(Self::unavailable)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_file(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::unavailable(e)),
        }
    }
}

/// Writes the user's board to a downloadable export file in `dir` and
/// returns the file's path.
pub async fn write_export(dir: impl AsRef<Path>, username: &str, board: &Board) -> Result<PathBuf> {
    let exported = ExportedBoard::new(username, Snapshot::capture(board));
    let path = dir
        .as_ref()
        .join(export_file_name(username, Local::now().date_naive()));
    fs::create_dir_all(dir.as_ref()).await?;
    fs::write(&path, exported.to_json()?).await?;
    tracing::debug!(path = %path.display(), "board exported");
    Ok(path)
}

/// Reads a user-selected file as a snapshot. Parse failures surface as
/// import-format errors; nothing on the board changes until the caller
/// confirms and restores.
pub async fn read_import(path: impl AsRef<Path>) -> Result<Snapshot> {
    let contents = fs::read_to_string(path.as_ref()).await?;
    Snapshot::parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::Stage;
    use crate::domain::task::{Category, Priority};
    use crate::storage::BoardStore;
    use tempfile::TempDir;

    fn sample_board() -> Board {
        let mut board = Board::default();
        board
            .add_task("Write report", Priority::High, Category::Work, None)
            .unwrap();
        board
            .add_task("Buy milk", Priority::Low, Category::Personal, None)
            .unwrap();
        board
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        assert!(storage.get("boardState_alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set("k", "v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));

        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());

        // Removing again is still fine.
        storage.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_with_odd_usernames_are_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set("boardState_a/b c", "blob").await.unwrap();
        assert_eq!(
            storage.get("boardState_a/b c").await.unwrap().as_deref(),
            Some("blob")
        );
    }

    #[tokio::test]
    async fn test_board_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = BoardStore::new(FileStorage::new(temp_dir.path()));

        let board = sample_board();
        store.save("alice", &board).await.unwrap();

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.tasks_in(Stage::Todo)[0].text, "Write report");
        assert_eq!(loaded.tasks_in(Stage::Todo)[1].text, "Buy milk");
    }

    #[tokio::test]
    async fn test_boards_are_kept_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = BoardStore::new(FileStorage::new(temp_dir.path()));

        store.save("alice", &sample_board()).await.unwrap();
        let bobs = store.load("bob").await.unwrap();
        assert!(bobs.is_empty());
    }

    #[tokio::test]
    async fn test_counter_survives_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let store = BoardStore::new(FileStorage::new(temp_dir.path()));

        let board = sample_board();
        store.save("alice", &board).await.unwrap();
        store.clear("alice").await.unwrap();

        // Fresh session, empty board, but ids pick up where they left off.
        let mut next = store.load("alice").await.unwrap();
        assert!(next.is_empty());
        let task = next
            .add_task("later", Priority::default(), Category::default(), None)
            .unwrap();
        assert_eq!(task.id.as_str(), "task-3");
    }

    #[tokio::test]
    async fn test_clear_drops_only_the_board_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = BoardStore::new(FileStorage::new(temp_dir.path()));

        store.save("alice", &sample_board()).await.unwrap();
        store.clear("alice").await.unwrap();
        assert!(store
            .storage()
            .get("boardState_alice")
            .await
            .unwrap()
            .is_none());
        assert!(store.storage().get("taskCounter").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_corrupt_blob_is_import_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = BoardStore::new(FileStorage::new(temp_dir.path()));

        store
            .storage()
            .set("boardState_alice", "{ not json")
            .await
            .unwrap();
        assert!(matches!(
            store.load("alice").await,
            Err(TaskflowError::ImportFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let board = sample_board();

        let path = write_export(temp_dir.path(), "alice", &board)
            .await
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("kanban_board_alice_"));
        assert!(name.ends_with(".json"));

        let snapshot = read_import(&path).await.unwrap();
        let mut restored = Board::default();
        snapshot.restore_into(&mut restored);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.tasks_in(Stage::Todo)[0].text, "Write report");
    }

    #[tokio::test]
    async fn test_import_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        tokio::fs::write(&path, "definitely not a board").await.unwrap();

        assert!(matches!(
            read_import(&path).await,
            Err(TaskflowError::ImportFormat(_))
        ));
    }
}
