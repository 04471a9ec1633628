//! Derived metrics for the insights view.
//!
//! Each derivation is a pure function over the full log. Groups come out
//! of an ordered map, so unranked output is sorted by key; ranked output
//! is then stably sorted by value, which keeps key order among ties.
//! Keys with no rows never appear.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entry::{Compound, WorkoutDate, WorkoutEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    #[serde(rename = "Total_Workouts")]
    pub total_workouts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    #[serde(rename = "Frequency")]
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint<T> {
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyVolume {
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    pub group: String,
    #[serde(rename = "Volume_Load")]
    pub volume_load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundVolume {
    #[serde(rename = "Is_Compound")]
    pub is_compound: Compound,
    #[serde(rename = "Volume_Load")]
    pub volume_load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVolume {
    pub name: String,
    #[serde(rename = "Volume_Load")]
    pub volume_load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepsComparison {
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    #[serde(rename = "Target_Reps")]
    pub target_reps: u64,
    #[serde(rename = "Number_Of_Reps")]
    pub number_of_reps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCompletion {
    #[serde(rename = "Date")]
    pub date: WorkoutDate,
    #[serde(rename = "Completion_Rate")]
    pub completion_rate: f64,
}

/// All twelve derivations for one render, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub workouts_per_day: Vec<DailyCount>,
    pub exercise_frequency: Vec<CategoryCount>,
    pub muscle_split: Vec<CategoryCount>,
    pub weight_progression: Vec<ProgressPoint<f64>>,
    pub reps_progression: Vec<ProgressPoint<u32>>,
    pub exercise_volume: Vec<DailyVolume>,
    pub muscle_focus: Vec<DailyVolume>,
    pub compound_split: Vec<CompoundVolume>,
    pub muscle_volume_ranking: Vec<RankedVolume>,
    pub exercise_volume_ranking: Vec<RankedVolume>,
    pub planned_vs_actual: Vec<RepsComparison>,
    pub completion_rate: Vec<DailyCompletion>,
}

impl Insights {
    pub fn compute(entries: &[WorkoutEntry]) -> Self {
        Self {
            workouts_per_day: workouts_per_day(entries),
            exercise_frequency: exercise_frequency(entries),
            muscle_split: muscle_split(entries),
            weight_progression: weight_progression(entries),
            reps_progression: reps_progression(entries),
            exercise_volume: exercise_volume(entries),
            muscle_focus: muscle_focus(entries),
            compound_split: compound_split(entries),
            muscle_volume_ranking: muscle_volume_ranking(entries),
            exercise_volume_ranking: exercise_volume_ranking(entries),
            planned_vs_actual: planned_vs_actual(entries),
            completion_rate: completion_rate(entries),
        }
    }
}

fn group_by<'a, K, A>(
    entries: &'a [WorkoutEntry],
    key: impl Fn(&'a WorkoutEntry) -> K,
    mut fold: impl FnMut(&mut A, &'a WorkoutEntry),
) -> BTreeMap<K, A>
where
    K: Ord,
    A: Default,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for entry in entries {
        fold(groups.entry(key(entry)).or_default(), entry);
    }
    groups
}

fn count_by<'a, K: Ord>(
    entries: &'a [WorkoutEntry],
    key: impl Fn(&'a WorkoutEntry) -> K,
) -> BTreeMap<K, usize> {
    group_by(entries, key, |count: &mut usize, _| *count += 1)
}

fn sum_volume_by<'a, K: Ord>(
    entries: &'a [WorkoutEntry],
    key: impl Fn(&'a WorkoutEntry) -> K,
) -> BTreeMap<K, f64> {
    group_by(entries, key, |total: &mut f64, entry| {
        *total += entry.volume_load()
    })
}

fn ranked_counts(groups: BTreeMap<&str, usize>) -> Vec<CategoryCount> {
    let mut rows: Vec<CategoryCount> = groups
        .into_iter()
        .map(|(name, frequency)| CategoryCount {
            name: name.to_string(),
            frequency,
        })
        .collect();
    rows.sort_by(|left, right| right.frequency.cmp(&left.frequency));
    rows
}

fn ranked_volumes<K: AsRef<str>>(groups: BTreeMap<K, f64>) -> Vec<RankedVolume> {
    let mut rows: Vec<RankedVolume> = groups
        .into_iter()
        .map(|(name, volume_load)| RankedVolume {
            name: name.as_ref().to_string(),
            volume_load,
        })
        .collect();
    rows.sort_by(|left, right| right.volume_load.total_cmp(&left.volume_load));
    rows
}

fn daily_volumes(groups: BTreeMap<(WorkoutDate, &str), f64>) -> Vec<DailyVolume> {
    groups
        .into_iter()
        .map(|((date, group), volume_load)| DailyVolume {
            date,
            group: group.to_string(),
            volume_load,
        })
        .collect()
}

/// Sets logged per day.
pub fn workouts_per_day(entries: &[WorkoutEntry]) -> Vec<DailyCount> {
    count_by(entries, |entry| entry.date)
        .into_iter()
        .map(|(date, total_workouts)| DailyCount {
            date,
            total_workouts,
        })
        .collect()
}

pub fn exercise_frequency(entries: &[WorkoutEntry]) -> Vec<CategoryCount> {
    ranked_counts(count_by(entries, |entry| entry.exercise.as_str()))
}

pub fn muscle_split(entries: &[WorkoutEntry]) -> Vec<CategoryCount> {
    ranked_counts(count_by(entries, |entry| entry.muscle.as_str()))
}

/// Heaviest set per exercise and day.
pub fn weight_progression(entries: &[WorkoutEntry]) -> Vec<ProgressPoint<f64>> {
    group_by(
        entries,
        |entry| (entry.exercise.as_str(), entry.date),
        |best: &mut Option<f64>, entry| {
            *best = Some(best.map_or(entry.weight, |current| current.max(entry.weight)));
        },
    )
    .into_iter()
    .filter_map(|((exercise, date), best)| {
        best.map(|value| ProgressPoint {
            exercise: exercise.to_string(),
            date,
            value,
        })
    })
    .collect()
}

/// Most reps in one set per exercise and day.
pub fn reps_progression(entries: &[WorkoutEntry]) -> Vec<ProgressPoint<u32>> {
    group_by(
        entries,
        |entry| (entry.exercise.as_str(), entry.date),
        |best: &mut u32, entry| *best = (*best).max(entry.number_of_reps),
    )
    .into_iter()
    .map(|((exercise, date), value)| ProgressPoint {
        exercise: exercise.to_string(),
        date,
        value,
    })
    .collect()
}

pub fn exercise_volume(entries: &[WorkoutEntry]) -> Vec<DailyVolume> {
    daily_volumes(sum_volume_by(entries, |entry| {
        (entry.date, entry.exercise.as_str())
    }))
}

pub fn muscle_focus(entries: &[WorkoutEntry]) -> Vec<DailyVolume> {
    daily_volumes(sum_volume_by(entries, |entry| {
        (entry.date, entry.muscle.as_str())
    }))
}

pub fn compound_split(entries: &[WorkoutEntry]) -> Vec<CompoundVolume> {
    sum_volume_by(entries, |entry| entry.is_compound)
        .into_iter()
        .map(|(is_compound, volume_load)| CompoundVolume {
            is_compound,
            volume_load,
        })
        .collect()
}

pub fn muscle_volume_ranking(entries: &[WorkoutEntry]) -> Vec<RankedVolume> {
    ranked_volumes(sum_volume_by(entries, |entry| entry.muscle.as_str()))
}

pub fn exercise_volume_ranking(entries: &[WorkoutEntry]) -> Vec<RankedVolume> {
    ranked_volumes(sum_volume_by(entries, WorkoutEntry::workout_exercise))
}

pub fn planned_vs_actual(entries: &[WorkoutEntry]) -> Vec<RepsComparison> {
    group_by(
        entries,
        |entry| entry.date,
        |totals: &mut (u64, u64), entry| {
            totals.0 += u64::from(entry.target_reps);
            totals.1 += u64::from(entry.number_of_reps);
        },
    )
    .into_iter()
    .map(|(date, (target_reps, number_of_reps))| RepsComparison {
        date,
        target_reps,
        number_of_reps,
    })
    .collect()
}

/// Share of each day's sets that reached their target reps.
pub fn completion_rate(entries: &[WorkoutEntry]) -> Vec<DailyCompletion> {
    group_by(
        entries,
        |entry| entry.date,
        |tally: &mut (usize, usize), entry| {
            tally.0 += usize::from(entry.met_target());
            tally.1 += 1;
        },
    )
    .into_iter()
    .map(|(date, (met, total))| DailyCompletion {
        date,
        completion_rate: met as f64 / total as f64,
    })
    .collect()
}
