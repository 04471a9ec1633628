use std::error::Error;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::domain::entry::WorkoutEntry;
use crate::domain::validation::EntryDraft;

#[derive(Debug)]
pub enum CsvError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingHeaders,
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::Io(err) => write!(f, "I/O error: {}", err),
            CsvError::Csv(err) => write!(f, "CSV error: {}", err),
            CsvError::MissingHeaders => write!(
                f,
                "CSV has no recognised columns; expected a header row such as Date,Workout,Exercise,..."
            ),
        }
    }
}

impl Error for CsvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CsvError::Io(err) => Some(err),
            CsvError::Csv(err) => Some(err),
            CsvError::MissingHeaders => None,
        }
    }
}

impl From<std::io::Error> for CsvError {
    fn from(value: std::io::Error) -> Self {
        CsvError::Io(value)
    }
}

impl From<csv::Error> for CsvError {
    fn from(value: csv::Error) -> Self {
        CsvError::Csv(value)
    }
}

const EXPORT_HEADERS: [&str; 11] = [
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

/// Reads grid rows from CSV. Cells stay untyped so that bad values surface
/// later as validation errors with their row and column.
pub fn read_drafts<R: Read>(reader: R) -> Result<Vec<EntryDraft>, CsvError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let known = headers
        .iter()
        .any(|header| EXPORT_HEADERS[..10].contains(&header));
    if !known {
        return Err(CsvError::MissingHeaders);
    }

    let mut drafts = Vec::new();
    for result in csv_reader.deserialize::<EntryDraft>() {
        let draft = result?;
        if !draft.is_blank() {
            drafts.push(draft);
        }
    }
    Ok(drafts)
}

pub fn read_drafts_from_path(path: &Path) -> Result<Vec<EntryDraft>, CsvError> {
    let file = std::fs::File::open(path)?;
    read_drafts(std::io::BufReader::new(file))
}

/// Writes the log with its derived `Workout_Exercise` column.
pub fn write_entries<W: Write>(writer: W, entries: &[WorkoutEntry]) -> Result<(), CsvError> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for entry in entries {
        csv_writer.write_record([
            entry.date.to_string(),
            entry.workout.clone(),
            entry.exercise.clone(),
            entry.position.clone(),
            entry.weight.to_string(),
            entry.set_number.to_string(),
            entry.target_reps.to_string(),
            entry.number_of_reps.to_string(),
            entry.is_compound.as_str().to_string(),
            entry.muscle.clone(),
            entry.workout_exercise(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes unsaved grid rows as-is, blanks included.
pub fn write_drafts<W: Write>(writer: W, drafts: &[EntryDraft]) -> Result<(), CsvError> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for draft in drafts {
        csv_writer.serialize(draft)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_drafts_to_path(path: &Path, drafts: &[EntryDraft]) -> Result<(), CsvError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_drafts(std::io::BufWriter::new(file), drafts)
}
