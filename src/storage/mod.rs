use crate::{
    domain::{board::Board, task::TaskSequence},
    error::Result,
    snapshot::Snapshot,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Key-value persistence boundary: one opaque blob per key.
///
/// The engine stays usable in memory when a backend fails; callers surface
/// the error and carry on with unpersisted state.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `blob` under `key`, replacing any previous value.
    async fn set(&self, key: &str, blob: &str) -> Result<()>;

    /// Deletes the blob under `key`. Removing an absent key is a no-op.
    async fn remove(&self, key: &str) -> Result<()>;
}

pub(crate) fn board_key(username: &str) -> String {
    format!("boardState_{}", username)
}

pub(crate) fn user_key(username: &str) -> String {
    format!("user_{}", username)
}

pub(crate) const COUNTER_KEY: &str = "taskCounter";

/// Persistence layer for boards: one snapshot blob per user, plus the
/// process-wide id counter under its own key so ids survive sessions.
pub struct BoardStore<S: Storage> {
    storage: S,
}

impl<S: Storage> BoardStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persists the user's board and the id-counter cursor.
    pub async fn save(&self, username: &str, board: &Board) -> Result<()> {
        let blob = Snapshot::capture(board).to_json()?;
        self.storage.set(&board_key(username), &blob).await?;
        self.storage
            .set(COUNTER_KEY, &board.sequence().cursor().to_string())
            .await?;
        Ok(())
    }

    /// Loads the user's board, or an empty one when nothing is stored.
    /// The id counter resumes from its persisted cursor either way.
    pub async fn load(&self, username: &str) -> Result<Board> {
        let cursor = match self.storage.get(COUNTER_KEY).await? {
            Some(raw) => raw.trim().parse().unwrap_or(1),
            None => 1,
        };
        let mut board = Board::new(TaskSequence::from_cursor(cursor));
        if let Some(blob) = self.storage.get(&board_key(username)).await? {
            Snapshot::parse(&blob)?.restore_into(&mut board);
        }
        Ok(board)
    }

    /// Drops the user's persisted board. The counter key stays; ids are
    /// never reused even after a wipe.
    pub async fn clear(&self, username: &str) -> Result<()> {
        tracing::warn!(user = username, "clearing persisted board");
        self.storage.remove(&board_key(username)).await
    }
}
