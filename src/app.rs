use std::error::Error;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::charts::{build_charts, ChartSpec};
use crate::config::ConfigError;
use crate::csv_io::{self, CsvError};
use crate::domain::entry::WorkoutEntry;
use crate::domain::validation::EntryDraft;
use crate::domain::view::{View, ViewState};
use crate::grid::{Grid, GridError};
use crate::insights::Insights;
use crate::store::{RowStore, StorageError};

pub struct App<S: RowStore> {
    store: S,
    draft_path: PathBuf,
}

/// What a view resolved to for one render.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Nothing,
    Planner,
    Logger(Grid),
    Insights {
        entries: Vec<WorkoutEntry>,
        charts: Vec<ChartSpec>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridEdit {
    Add(EntryDraft),
    Update { row: usize, patch: EntryDraft },
    Remove(Vec<usize>),
    Import(Vec<EntryDraft>),
}

impl GridEdit {
    fn apply(self, grid: &mut Grid) -> Result<(), GridError> {
        match self {
            GridEdit::Add(draft) => grid.add_row(draft).map(|_| ()),
            GridEdit::Update { row, patch } => grid.update_row(row, &patch),
            GridEdit::Remove(rows) => grid.remove_rows(&rows).map(|_| ()),
            GridEdit::Import(rows) => {
                grid.replace_rows(rows);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SaveSummary {
    pub rows_before: usize,
    pub rows_saved: usize,
}

impl<S: RowStore> App<S> {
    pub fn new(store: S, draft_path: PathBuf) -> Self {
        Self { store, draft_path }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_entries(&self) -> Result<Vec<WorkoutEntry>, AppError> {
        self.store.load().map_err(AppError::Load)
    }

    pub fn render(&self, state: &ViewState) -> Result<Screen, AppError> {
        let Some(view) = state.selected() else {
            tracing::debug!("no view selected; nothing to render");
            return Ok(Screen::Nothing);
        };

        match view {
            View::Planner => Ok(Screen::Planner),
            View::Logger => Ok(Screen::Logger(self.open_grid()?)),
            View::Insights => {
                let entries = self.load_entries()?;
                let charts = build_charts(&Insights::compute(&entries));
                Ok(Screen::Insights { entries, charts })
            }
        }
    }

    pub fn open_grid(&self) -> Result<Grid, AppError> {
        Ok(Grid::from_entries(&self.load_entries()?))
    }

    /// Loads the grid, applies one edit, and writes the whole grid back.
    pub fn edit(&mut self, edit: GridEdit) -> Result<SaveSummary, AppError> {
        let mut grid = self.open_grid()?;
        let rows_before = grid.len();
        edit.apply(&mut grid)?;
        let rows_saved = self.save_grid(&grid)?;
        Ok(SaveSummary {
            rows_before,
            rows_saved,
        })
    }

    /// Validates and persists `grid`. When the write fails the rows are
    /// kept in the draft file so the edit can be retried.
    pub fn save_grid(&mut self, grid: &Grid) -> Result<usize, AppError> {
        let entries = grid.commit()?;
        match self.store.save(&entries) {
            Ok(()) => Ok(entries.len()),
            Err(source) => {
                let draft = match csv_io::write_drafts_to_path(&self.draft_path, grid.rows()) {
                    Ok(()) => Some(self.draft_path.clone()),
                    Err(err) => {
                        tracing::warn!(
                            path = %self.draft_path.display(),
                            error = %err,
                            "could not keep unsaved rows"
                        );
                        None
                    }
                };
                tracing::warn!(error = %source, "save failed; unsaved rows kept");
                Err(AppError::Save { source, draft })
            }
        }
    }

    pub fn export<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let entries = self.load_entries()?;
        csv_io::write_entries(writer, &entries)?;
        Ok(entries.len())
    }
}

pub fn read_import(path: &Path) -> Result<Vec<EntryDraft>, AppError> {
    let drafts = csv_io::read_drafts_from_path(path)?;
    if drafts.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "{} contains no rows",
            path.display()
        )));
    }
    Ok(drafts)
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Config(ConfigError),
    Session(rusqlite::Error),
    Load(StorageError),
    Save {
        source: StorageError,
        draft: Option<PathBuf>,
    },
    Grid(GridError),
    Csv(CsvError),
    InvalidArgument(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Session(err) => write!(f, "session state error: {}", err),
            AppError::Load(err) => write!(f, "cannot read the workout log: {}", err),
            AppError::Save {
                source,
                draft: Some(path),
            } => write!(
                f,
                "save failed: {}; unsaved rows kept in {} (retry with `liftlog logger import {}`)",
                source,
                path.display(),
                path.display()
            ),
            AppError::Save {
                source,
                draft: None,
            } => write!(f, "save failed: {}", source),
            AppError::Grid(err) => write!(f, "{}", err),
            AppError::Csv(err) => write!(f, "{}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Load(err) => Some(err),
            AppError::Save { source, .. } => Some(source),
            AppError::Grid(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::InvalidArgument(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<GridError> for AppError {
    fn from(value: GridError) -> Self {
        AppError::Grid(value)
    }
}

impl From<CsvError> for AppError {
    fn from(value: CsvError) -> Self {
        AppError::Csv(value)
    }
}
