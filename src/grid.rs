use std::error::Error;
use std::fmt;

use crate::domain::entry::WorkoutEntry;
use crate::domain::validation::{
    validate_draft, Catalog, CategoryPolicy, EntryDraft, ValidationError,
};

/// The logger's editable grid: draft rows over a snapshot of the log,
/// validated all at once before anything is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: Vec<EntryDraft>,
    catalog: Catalog,
    imported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    NoSuchRow { row: usize, len: usize },
    BlankRow,
    Empty,
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::NoSuchRow { row, len } => {
                write!(f, "row {} does not exist (the grid has {} rows)", row, len)
            }
            GridError::BlankRow => write!(f, "refusing to add a row with no values"),
            GridError::Empty => write!(f, "nothing to save: the grid is empty"),
            GridError::Invalid(errors) => {
                write!(f, "{} invalid cell(s)", errors.len())?;
                for err in errors {
                    write!(f, "\n  - {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl Error for GridError {}

impl Grid {
    pub fn from_entries(entries: &[WorkoutEntry]) -> Self {
        Self {
            rows: entries.iter().map(EntryDraft::from).collect(),
            catalog: Catalog::observe(entries),
            imported: false,
        }
    }

    pub fn rows(&self) -> &[EntryDraft] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn add_row(&mut self, draft: EntryDraft) -> Result<usize, GridError> {
        if draft.is_blank() {
            return Err(GridError::BlankRow);
        }
        self.rows.push(draft);
        Ok(self.rows.len())
    }

    /// Applies `patch` to the 1-based `row`.
    pub fn update_row(&mut self, row: usize, patch: &EntryDraft) -> Result<(), GridError> {
        let index = self.index_of(row)?;
        self.rows[index].apply_patch(patch);
        Ok(())
    }

    /// Removes 1-based rows; every number refers to the grid before removal.
    pub fn remove_rows(&mut self, rows: &[usize]) -> Result<Vec<EntryDraft>, GridError> {
        let mut indices = rows
            .iter()
            .map(|row| self.index_of(*row))
            .collect::<Result<Vec<_>, _>>()?;
        indices.sort_unstable();
        indices.dedup();

        let mut removed = Vec::with_capacity(indices.len());
        for index in indices.into_iter().rev() {
            removed.push(self.rows.remove(index));
        }
        removed.reverse();
        Ok(removed)
    }

    /// Swaps in rows from a bulk import. Imported categories are not held
    /// to the previous log's options.
    pub fn replace_rows(&mut self, rows: Vec<EntryDraft>) {
        self.rows = rows;
        self.imported = true;
    }

    /// Validates every row, returning the entries to persist or every
    /// violation found.
    pub fn commit(&self) -> Result<Vec<WorkoutEntry>, GridError> {
        if self.rows.is_empty() {
            return Err(GridError::Empty);
        }

        let policy = if self.imported {
            CategoryPolicy::Open
        } else {
            CategoryPolicy::Closed(&self.catalog)
        };

        let mut entries = Vec::with_capacity(self.rows.len());
        let mut errors = Vec::new();
        for (index, draft) in self.rows.iter().enumerate() {
            match validate_draft(draft, policy) {
                Ok(entry) => entries.push(entry),
                Err(row_errors) => {
                    errors.extend(row_errors.into_iter().map(|err| err.at_row(index + 1)))
                }
            }
        }

        if errors.is_empty() {
            Ok(entries)
        } else {
            Err(GridError::Invalid(errors))
        }
    }

    fn index_of(&self, row: usize) -> Result<usize, GridError> {
        if row == 0 || row > self.rows.len() {
            return Err(GridError::NoSuchRow {
                row,
                len: self.rows.len(),
            });
        }
        Ok(row - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridError};
    use crate::domain::entry::{Compound, WorkoutDate, WorkoutEntry};
    use crate::domain::validation::{Column, EntryDraft};
    use std::str::FromStr;

    fn logged(exercise: &str, reps: u32) -> WorkoutEntry {
        WorkoutEntry {
            date: WorkoutDate::from_str("2026-07-01").expect("date should parse"),
            workout: "Upper".to_string(),
            exercise: exercise.to_string(),
            position: "Seated".to_string(),
            weight: 40.0,
            set_number: 1,
            target_reps: 10,
            number_of_reps: reps,
            is_compound: Compound::No,
            muscle: "Shoulders".to_string(),
        }
    }

    fn draft_like(entry: &WorkoutEntry) -> EntryDraft {
        EntryDraft::from(entry)
    }

    #[test]
    fn unchanged_grid_commits_the_same_rows() {
        let rows = vec![logged("Press", 10), logged("Raise", 12)];
        let grid = Grid::from_entries(&rows);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.commit().expect("commit should succeed"), rows);
    }

    #[test]
    fn added_row_uses_known_categories() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        let mut draft = draft_like(&logged("Raise", 15));
        draft.date = Some("2026-07-02".to_string());
        assert_eq!(grid.add_row(draft).expect("add should succeed"), 2);

        let committed = grid.commit().expect("commit should succeed");
        assert_eq!(committed[1].exercise, "Raise");
        assert_eq!(committed[1].date.to_string(), "2026-07-02");
    }

    #[test]
    fn new_categories_block_the_commit() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        let mut draft = draft_like(&logged("Squat", 5));
        draft.muscle = Some("Quads".to_string());
        grid.add_row(draft).expect("add should succeed");

        match grid.commit() {
            Err(GridError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].row, Some(2));
                assert_eq!(errors[0].column, Column::Muscle);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn blank_rows_are_refused() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        assert_eq!(grid.add_row(EntryDraft::default()), Err(GridError::BlankRow));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn update_patches_one_row() {
        let mut grid = Grid::from_entries(&[logged("Press", 10), logged("Raise", 12)]);
        grid.update_row(
            2,
            &EntryDraft {
                number_of_reps: Some("9".to_string()),
                ..EntryDraft::default()
            },
        )
        .expect("update should succeed");
        let committed = grid.commit().expect("commit should succeed");
        assert_eq!(committed[0].number_of_reps, 10);
        assert_eq!(committed[1].number_of_reps, 9);
    }

    #[test]
    fn out_of_range_rows_are_rejected() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        assert_eq!(
            grid.update_row(0, &EntryDraft::default()),
            Err(GridError::NoSuchRow { row: 0, len: 1 })
        );
        assert_eq!(
            grid.remove_rows(&[2]),
            Err(GridError::NoSuchRow { row: 2, len: 1 })
        );
    }

    #[test]
    fn remove_numbers_refer_to_rows_before_removal() {
        let mut grid = Grid::from_entries(&[
            logged("A", 10),
            logged("B", 10),
            logged("C", 10),
            logged("D", 10),
        ]);
        let removed = grid.remove_rows(&[3, 1, 3]).expect("remove should succeed");
        assert_eq!(
            removed
                .iter()
                .map(|draft| draft.exercise.clone().unwrap_or_default())
                .collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        let left: Vec<String> = grid
            .commit()
            .expect("commit should succeed")
            .into_iter()
            .map(|entry| entry.exercise)
            .collect();
        assert_eq!(left, vec!["B", "D"]);
    }

    #[test]
    fn empty_grid_cannot_be_saved() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        grid.remove_rows(&[1]).expect("remove should succeed");
        assert!(grid.is_empty());
        assert_eq!(grid.commit(), Err(GridError::Empty));
    }

    #[test]
    fn imported_rows_may_bring_new_categories() {
        let mut grid = Grid::from_entries(&[]);
        assert!(grid.catalog().workouts.is_empty());
        grid.replace_rows(vec![draft_like(&logged("Press", 10))]);
        assert_eq!(grid.commit().expect("commit should succeed").len(), 1);
    }

    #[test]
    fn invalid_message_lists_every_cell() {
        let mut grid = Grid::from_entries(&[logged("Press", 10)]);
        grid.update_row(
            1,
            &EntryDraft {
                weight: Some("500".to_string()),
                set_number: Some("11".to_string()),
                ..EntryDraft::default()
            },
        )
        .expect("update should succeed");
        let err = grid.commit().expect_err("commit should fail");
        let message = err.to_string();
        assert!(message.starts_with("2 invalid cell(s)"));
        assert!(message.contains("row 1 Weight"));
        assert!(message.contains("row 1 Set_Number"));
    }
}
