use super::{RowStore, StorageError};
use crate::domain::entry::WorkoutEntry;

/// In-memory store for exercising the logger and dashboard without SQLite.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub rows: Vec<WorkoutEntry>,
    pub fail_loads: bool,
    pub fail_saves: bool,
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<WorkoutEntry>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl RowStore for MemoryStore {
    fn load(&self) -> Result<Vec<WorkoutEntry>, StorageError> {
        if self.fail_loads {
            return Err(StorageError::Db(rusqlite::Error::InvalidQuery));
        }
        Ok(self.rows.clone())
    }

    fn save(&mut self, rows: &[WorkoutEntry]) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Db(rusqlite::Error::InvalidQuery));
        }
        self.rows = rows.to_vec();
        self.saves += 1;
        Ok(())
    }
}
