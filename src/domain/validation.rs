use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entry::{
    Compound, WorkoutDate, WorkoutEntry, EXERCISE_MAX_CHARS, REPS_RANGE, SET_NUMBER_RANGE,
    WEIGHT_RANGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Workout,
    Exercise,
    Position,
    Weight,
    SetNumber,
    TargetReps,
    NumberOfReps,
    IsCompound,
    Muscle,
}

impl Column {
    pub const EDITABLE: [Column; 10] = [
        Column::Date,
        Column::Workout,
        Column::Exercise,
        Column::Position,
        Column::Weight,
        Column::SetNumber,
        Column::TargetReps,
        Column::NumberOfReps,
        Column::IsCompound,
        Column::Muscle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Workout => "Workout",
            Column::Exercise => "Exercise",
            Column::Position => "Position",
            Column::Weight => "Weight",
            Column::SetNumber => "Set_Number",
            Column::TargetReps => "Target_Reps",
            Column::NumberOfReps => "Number_Of_Reps",
            Column::IsCompound => "Is_Compound",
            Column::Muscle => "Muscle",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grid row as typed by the user: every cell is optional text until
/// the row is validated into a [`WorkoutEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Workout", default)]
    pub workout: Option<String>,
    #[serde(rename = "Exercise", default)]
    pub exercise: Option<String>,
    #[serde(rename = "Position", default)]
    pub position: Option<String>,
    #[serde(rename = "Weight", default)]
    pub weight: Option<String>,
    #[serde(rename = "Set_Number", default)]
    pub set_number: Option<String>,
    #[serde(rename = "Target_Reps", default)]
    pub target_reps: Option<String>,
    #[serde(rename = "Number_Of_Reps", default)]
    pub number_of_reps: Option<String>,
    #[serde(rename = "Is_Compound", default)]
    pub is_compound: Option<String>,
    #[serde(rename = "Muscle", default)]
    pub muscle: Option<String>,
}

impl EntryDraft {
    pub fn cell(&self, column: Column) -> Option<&str> {
        let raw = match column {
            Column::Date => &self.date,
            Column::Workout => &self.workout,
            Column::Exercise => &self.exercise,
            Column::Position => &self.position,
            Column::Weight => &self.weight,
            Column::SetNumber => &self.set_number,
            Column::TargetReps => &self.target_reps,
            Column::NumberOfReps => &self.number_of_reps,
            Column::IsCompound => &self.is_compound,
            Column::Muscle => &self.muscle,
        };
        raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
    }

    /// Overwrites every cell that `patch` sets, leaving the rest alone.
    pub fn apply_patch(&mut self, patch: &EntryDraft) {
        let merge = |target: &mut Option<String>, source: &Option<String>| {
            if source.is_some() {
                target.clone_from(source);
            }
        };
        merge(&mut self.date, &patch.date);
        merge(&mut self.workout, &patch.workout);
        merge(&mut self.exercise, &patch.exercise);
        merge(&mut self.position, &patch.position);
        merge(&mut self.weight, &patch.weight);
        merge(&mut self.set_number, &patch.set_number);
        merge(&mut self.target_reps, &patch.target_reps);
        merge(&mut self.number_of_reps, &patch.number_of_reps);
        merge(&mut self.is_compound, &patch.is_compound);
        merge(&mut self.muscle, &patch.muscle);
    }

    pub fn is_blank(&self) -> bool {
        Column::EDITABLE
            .iter()
            .all(|column| self.cell(*column).is_none())
    }
}

impl From<&WorkoutEntry> for EntryDraft {
    fn from(entry: &WorkoutEntry) -> Self {
        Self {
            date: Some(entry.date.to_string()),
            workout: Some(entry.workout.clone()),
            exercise: Some(entry.exercise.clone()),
            position: Some(entry.position.clone()),
            weight: Some(entry.weight.to_string()),
            set_number: Some(entry.set_number.to_string()),
            target_reps: Some(entry.target_reps.to_string()),
            number_of_reps: Some(entry.number_of_reps.to_string()),
            is_compound: Some(entry.is_compound.as_str().to_string()),
            muscle: Some(entry.muscle.clone()),
        }
    }
}

/// Category values already present in the persisted log. Grid edits may
/// only pick from these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub workouts: BTreeSet<String>,
    pub positions: BTreeSet<String>,
    pub muscles: BTreeSet<String>,
}

impl Catalog {
    pub fn observe(entries: &[WorkoutEntry]) -> Self {
        let mut catalog = Catalog::default();
        for entry in entries {
            catalog.workouts.insert(entry.workout.clone());
            catalog.positions.insert(entry.position.clone());
            catalog.muscles.insert(entry.muscle.clone());
        }
        catalog
    }

    fn options(&self, column: Column) -> Option<&BTreeSet<String>> {
        match column {
            Column::Workout => Some(&self.workouts),
            Column::Position => Some(&self.positions),
            Column::Muscle => Some(&self.muscles),
            _ => None,
        }
    }
}

/// How category cells are checked.
#[derive(Debug, Clone, Copy)]
pub enum CategoryPolicy<'a> {
    Closed(&'a Catalog),
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing,
    NotANumber(String),
    NotAnInteger(String),
    OutOfRange { value: f64, min: f64, max: f64 },
    InvalidDate(String),
    NotAnOption { value: String, allowed: Vec<String> },
    TooLong { len: usize, max: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "value is required"),
            Violation::NotANumber(raw) => write!(f, "'{}' is not a number", raw),
            Violation::NotAnInteger(raw) => write!(f, "'{}' is not a whole number", raw),
            Violation::OutOfRange { value, min, max } => {
                write!(f, "{} is outside [{}, {}]", value, min, max)
            }
            Violation::InvalidDate(raw) => write!(f, "'{}' is not a YYYY-MM-DD date", raw),
            Violation::NotAnOption { value, allowed } if allowed.is_empty() => write!(
                f,
                "'{}' is not a known option (the log has none yet; seed it with an import)",
                value
            ),
            Violation::NotAnOption { value, allowed } => write!(
                f,
                "'{}' is not one of: {}",
                value,
                allowed.join(", ")
            ),
            Violation::TooLong { len, max } => {
                write!(f, "{} characters exceeds the limit of {}", len, max)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// 1-based grid row, when the cell belongs to a grid.
    pub row: Option<usize>,
    pub column: Column,
    pub violation: Violation,
}

impl ValidationError {
    fn new(column: Column, violation: Violation) -> Self {
        Self {
            row: None,
            column,
            violation,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {} {}: {}", row, self.column, self.violation),
            None => write!(f, "{}: {}", self.column, self.violation),
        }
    }
}

impl Error for ValidationError {}

/// Checks every cell of `draft`, collecting all violations rather than
/// stopping at the first.
pub fn validate_draft(
    draft: &EntryDraft,
    policy: CategoryPolicy<'_>,
) -> Result<WorkoutEntry, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let date = collect(&mut errors, parse_date(draft));
    let workout = collect(&mut errors, parse_category(draft, Column::Workout, policy));
    let exercise = collect(&mut errors, parse_exercise(draft));
    let position = collect(&mut errors, parse_category(draft, Column::Position, policy));
    let weight = collect(&mut errors, parse_weight(draft));
    let set_number = collect(
        &mut errors,
        parse_bounded_int(draft, Column::SetNumber, SET_NUMBER_RANGE),
    );
    let target_reps = collect(
        &mut errors,
        parse_bounded_int(draft, Column::TargetReps, REPS_RANGE),
    );
    let number_of_reps = collect(
        &mut errors,
        parse_bounded_int(draft, Column::NumberOfReps, REPS_RANGE),
    );
    let is_compound = collect(&mut errors, parse_compound(draft));
    let muscle = collect(&mut errors, parse_category(draft, Column::Muscle, policy));

    match (
        date,
        workout,
        exercise,
        position,
        weight,
        set_number,
        target_reps,
        number_of_reps,
        is_compound,
        muscle,
    ) {
        (
            Some(date),
            Some(workout),
            Some(exercise),
            Some(position),
            Some(weight),
            Some(set_number),
            Some(target_reps),
            Some(number_of_reps),
            Some(is_compound),
            Some(muscle),
        ) => Ok(WorkoutEntry {
            date,
            workout,
            exercise,
            position,
            weight,
            set_number,
            target_reps,
            number_of_reps,
            is_compound,
            muscle,
        }),
        _ => Err(errors),
    }
}

fn collect<T>(errors: &mut Vec<ValidationError>, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn required(draft: &EntryDraft, column: Column) -> Result<&str, ValidationError> {
    draft
        .cell(column)
        .ok_or_else(|| ValidationError::new(column, Violation::Missing))
}

fn parse_date(draft: &EntryDraft) -> Result<WorkoutDate, ValidationError> {
    let raw = required(draft, Column::Date)?;
    WorkoutDate::from_str(raw)
        .map_err(|_| ValidationError::new(Column::Date, Violation::InvalidDate(raw.to_string())))
}

fn parse_category(
    draft: &EntryDraft,
    column: Column,
    policy: CategoryPolicy<'_>,
) -> Result<String, ValidationError> {
    let raw = required(draft, column)?;
    if let CategoryPolicy::Closed(catalog) = policy {
        if let Some(options) = catalog.options(column) {
            if !options.contains(raw) {
                return Err(ValidationError::new(
                    column,
                    Violation::NotAnOption {
                        value: raw.to_string(),
                        allowed: options.iter().cloned().collect(),
                    },
                ));
            }
        }
    }
    Ok(raw.to_string())
}

fn parse_exercise(draft: &EntryDraft) -> Result<String, ValidationError> {
    let raw = required(draft, Column::Exercise)?;
    let len = raw.chars().count();
    if len > EXERCISE_MAX_CHARS {
        return Err(ValidationError::new(
            Column::Exercise,
            Violation::TooLong {
                len,
                max: EXERCISE_MAX_CHARS,
            },
        ));
    }
    Ok(raw.to_string())
}

fn parse_weight(draft: &EntryDraft) -> Result<f64, ValidationError> {
    let raw = required(draft, Column::Weight)?;
    let value: f64 = raw.parse().map_err(|_| {
        ValidationError::new(Column::Weight, Violation::NotANumber(raw.to_string()))
    })?;
    if !value.is_finite() {
        return Err(ValidationError::new(
            Column::Weight,
            Violation::NotANumber(raw.to_string()),
        ));
    }
    let (min, max) = WEIGHT_RANGE;
    if value < min || value > max {
        return Err(ValidationError::new(
            Column::Weight,
            Violation::OutOfRange { value, min, max },
        ));
    }
    Ok(value)
}

fn parse_bounded_int(
    draft: &EntryDraft,
    column: Column,
    (min, max): (u32, u32),
) -> Result<u32, ValidationError> {
    let raw = required(draft, column)?;
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::new(column, Violation::NotAnInteger(raw.to_string())))?;
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ValidationError::new(
            column,
            Violation::OutOfRange {
                value: value as f64,
                min: f64::from(min),
                max: f64::from(max),
            },
        ));
    }
    u32::try_from(value)
        .map_err(|_| ValidationError::new(column, Violation::NotAnInteger(raw.to_string())))
}

fn parse_compound(draft: &EntryDraft) -> Result<Compound, ValidationError> {
    let raw = required(draft, Column::IsCompound)?;
    Compound::from_str(raw).map_err(|_| {
        ValidationError::new(
            Column::IsCompound,
            Violation::NotAnOption {
                value: raw.to_string(),
                allowed: Compound::ALL
                    .iter()
                    .map(|value| value.as_str().to_string())
                    .collect(),
            },
        )
    })
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
