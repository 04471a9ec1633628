use std::error::Error;
use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection, Row};

use crate::db;
use crate::domain::entry::{Compound, WorkoutDate, WorkoutEntry};

/// Full-table access to the workout log. Rows have no identity, so a save
/// always replaces everything that was there.
pub trait RowStore {
    fn load(&self) -> Result<Vec<WorkoutEntry>, StorageError>;
    fn save(&mut self, rows: &[WorkoutEntry]) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    Db(rusqlite::Error),
    CorruptRow {
        row: usize,
        column: &'static str,
        detail: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Db(err) => write!(f, "database error: {}", err),
            StorageError::CorruptRow {
                row,
                column,
                detail,
            } => write!(f, "stored row {} has an unreadable {}: {}", row, column, detail),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Db(err) => Some(err),
            StorageError::CorruptRow { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        StorageError::Db(value)
    }
}

const COLUMNS: [&str; 11] = [
    "Date",
    "Workout",
    "Exercise",
    "Position",
    "Weight",
    "Set_Number",
    "Target_Reps",
    "Number_Of_Reps",
    "Is_Compound",
    "Muscle",
    "Workout_Exercise",
];

pub struct SqliteRowStore {
    conn: Connection,
    table: String,
}

impl SqliteRowStore {
    pub fn open(db_path: &str, table: &str) -> Result<Self, StorageError> {
        let conn = db::open_connection(db_path)?;
        Ok(Self::with_connection(conn, table))
    }

    pub fn with_connection(conn: Connection, table: &str) -> Self {
        Self {
            conn,
            table: table.to_string(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn create_table_sql(&self) -> String {
        format!(
            r#"
CREATE TABLE IF NOT EXISTS {} (
    "Date" TEXT NOT NULL,
    "Workout" TEXT NOT NULL,
    "Exercise" TEXT NOT NULL,
    "Position" TEXT NOT NULL,
    "Weight" REAL NOT NULL,
    "Set_Number" INTEGER NOT NULL,
    "Target_Reps" INTEGER NOT NULL,
    "Number_Of_Reps" INTEGER NOT NULL,
    "Is_Compound" TEXT NOT NULL,
    "Muscle" TEXT NOT NULL,
    "Workout_Exercise" TEXT NOT NULL
);
"#,
            db::quote_identifier(&self.table)
        )
    }

    fn column_list() -> String {
        COLUMNS
            .iter()
            .map(|column| db::quote_identifier(column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl RowStore for SqliteRowStore {
    fn load(&self) -> Result<Vec<WorkoutEntry>, StorageError> {
        if !db::table_exists(&self.conn, &self.table)? {
            tracing::debug!(table = %self.table, "workout table absent; treating log as empty");
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            Self::column_list(),
            db::quote_identifier(&self.table)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(decode_row(row, result.len() + 1)?);
        }

        tracing::debug!(table = %self.table, rows = result.len(), "loaded workout log");
        Ok(result)
    }

    fn save(&mut self, rows: &[WorkoutEntry]) -> Result<(), StorageError> {
        let table = db::quote_identifier(&self.table);
        let create_sql = self.create_table_sql();
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            table,
            Self::column_list()
        );

        let tx = self.conn.transaction()?;
        tx.execute_batch(&create_sql)?;
        tx.execute(&format!("DELETE FROM {}", table), [])?;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for entry in rows {
                stmt.execute(params![
                    entry.date.to_string(),
                    entry.workout,
                    entry.exercise,
                    entry.position,
                    entry.weight,
                    entry.set_number,
                    entry.target_reps,
                    entry.number_of_reps,
                    entry.is_compound.as_str(),
                    entry.muscle,
                    entry.workout_exercise(),
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(table = %self.table, rows = rows.len(), "replaced workout log");
        Ok(())
    }
}

fn decode_row(row: &Row<'_>, position: usize) -> Result<WorkoutEntry, StorageError> {
    let corrupt = |column: &'static str, detail: String| StorageError::CorruptRow {
        row: position,
        column,
        detail,
    };

    let raw_date: String = row.get(0)?;
    let date = WorkoutDate::from_str(&raw_date).map_err(|err| corrupt("Date", err.to_string()))?;
    let raw_compound: String = row.get(8)?;
    let is_compound =
        Compound::from_str(&raw_compound).map_err(|err| corrupt("Is_Compound", err.to_string()))?;

    let count = |index: usize, column: &'static str| -> Result<u32, StorageError> {
        let value: i64 = row.get(index)?;
        u32::try_from(value).map_err(|_| corrupt(column, format!("{} is not a count", value)))
    };

    Ok(WorkoutEntry {
        date,
        workout: row.get(1)?,
        exercise: row.get(2)?,
        position: row.get(3)?,
        weight: row.get(4)?,
        set_number: count(5, "Set_Number")?,
        target_reps: count(6, "Target_Reps")?,
        number_of_reps: count(7, "Number_Of_Reps")?,
        is_compound,
        muscle: row.get(9)?,
    })
}

#[cfg(test)]
pub(crate) mod memory;

#[cfg(test)]
mod tests;
