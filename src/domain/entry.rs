use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub const WEIGHT_RANGE: (f64, f64) = (0.0, 300.0);
pub const SET_NUMBER_RANGE: (u32, u32) = (1, 10);
pub const REPS_RANGE: (u32, u32) = (1, 50);
pub const EXERCISE_MAX_CHARS: usize = 75;

/// Calendar day of a logged set, rendered as `YYYY-MM-DD` everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutDate(Date);

impl fmt::Display for WorkoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl FromStr for WorkoutDate {
    type Err = ParseDateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Date::parse(value.trim(), DATE_FORMAT)
            .map(WorkoutDate)
            .map_err(|_| ParseDateError {
                value: value.to_string(),
            })
    }
}

impl Serialize for WorkoutDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkoutDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WorkoutDate::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateError {
    value: String,
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date '{}': expected YYYY-MM-DD", self.value)
    }
}

impl Error for ParseDateError {}

/// Whether an exercise is a compound lift. Variant order matches the
/// stored text so grouped output lists `No` before `Yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compound {
    No,
    Yes,
}

impl Compound {
    pub const ALL: [Compound; 2] = [Compound::Yes, Compound::No];

    pub fn as_str(self) -> &'static str {
        match self {
            Compound::Yes => "Yes",
            Compound::No => "No",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compound {
    type Err = ParseCompoundError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Compound::Yes),
            "no" => Ok(Compound::No),
            _ => Err(ParseCompoundError {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for Compound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Compound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Compound::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCompoundError {
    value: String,
}

impl fmt::Display for ParseCompoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid Is_Compound value '{}': expected one of {}",
            self.value,
            Compound::ALL
                .iter()
                .map(|value| value.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseCompoundError {}

/// One logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    #[serde(rename = "Workout")]
    pub workout: String,
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Set_Number")]
    pub set_number: u32,
    #[serde(rename = "Target_Reps")]
    pub target_reps: u32,
    #[serde(rename = "Number_Of_Reps")]
    pub number_of_reps: u32,
    #[serde(rename = "Is_Compound")]
    pub is_compound: Compound,
    #[serde(rename = "Muscle")]
    pub muscle: String,
}

impl WorkoutEntry {
    /// `Workout-Exercise`, recomputed on every save.
    pub fn workout_exercise(&self) -> String {
        format!("{}-{}", self.workout, self.exercise)
    }

    pub fn volume_load(&self) -> f64 {
        self.weight * f64::from(self.number_of_reps)
    }

    pub fn met_target(&self) -> bool {
        self.number_of_reps >= self.target_reps
    }
}
