use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::insights::Insights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

/// A renderer-neutral chart: which fields of `data` go on which axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub position: usize,
    pub title: &'static str,
    pub kind: ChartKind,
    pub x: &'static str,
    pub y: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub labels: BTreeMap<&'static str, &'static str>,
    pub data: Vec<Value>,
}

pub const CHART_COUNT: usize = 12;

struct Layout {
    title: &'static str,
    kind: ChartKind,
    x: &'static str,
    y: &'static [&'static str],
    color: Option<&'static str>,
    labels: &'static [(&'static str, &'static str)],
}

const LAYOUTS: [Layout; CHART_COUNT] = [
    Layout {
        title: "Total Workouts Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Total_Workouts"],
        color: None,
        labels: &[("Total_Workouts", "Number of Workouts")],
    },
    Layout {
        title: "Exercise Frequency",
        kind: ChartKind::Bar,
        x: "Exercise",
        y: &["Frequency"],
        color: None,
        labels: &[("Frequency", "Number of Sessions")],
    },
    Layout {
        title: "Workout Split by Muscle Group",
        kind: ChartKind::Pie,
        x: "Muscle",
        y: &["Frequency"],
        color: None,
        labels: &[],
    },
    Layout {
        title: "Weight Progression Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Weight"],
        color: Some("Exercise"),
        labels: &[("Weight", "Weight Lifted (kg)")],
    },
    Layout {
        title: "Reps Progression Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Number_Of_Reps"],
        color: Some("Exercise"),
        labels: &[("Number_Of_Reps", "Number of Reps")],
    },
    Layout {
        title: "Volume Load Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Volume_Load"],
        color: Some("Exercise"),
        labels: &[("Volume_Load", "Total Volume Load (kg)")],
    },
    Layout {
        title: "Muscle Group Focus Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Volume_Load"],
        color: Some("Muscle"),
        labels: &[("Volume_Load", "Total Volume Load (kg)")],
    },
    Layout {
        title: "Compound vs Isolation Volume Load",
        kind: ChartKind::Bar,
        x: "Is_Compound",
        y: &["Volume_Load"],
        color: None,
        labels: &[
            ("Is_Compound", "Exercise Type"),
            ("Volume_Load", "Total Volume Load (kg)"),
        ],
    },
    Layout {
        title: "Total Volume per Muscle Group",
        kind: ChartKind::Bar,
        x: "Muscle",
        y: &["Volume_Load"],
        color: None,
        labels: &[("Volume_Load", "Total Volume Load (kg)")],
    },
    Layout {
        title: "Total Volume per Exercise",
        kind: ChartKind::Bar,
        x: "Workout_Exercise",
        y: &["Volume_Load"],
        color: None,
        labels: &[
            ("Workout_Exercise", "Exercise"),
            ("Volume_Load", "Total Volume Load (kg)"),
        ],
    },
    Layout {
        title: "Target Reps vs. Actual Reps Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Target_Reps", "Number_Of_Reps"],
        color: None,
        labels: &[("value", "Reps"), ("variable", "Type")],
    },
    Layout {
        title: "Exercise Completion Rate Over Time",
        kind: ChartKind::Line,
        x: "Date",
        y: &["Completion_Rate"],
        color: None,
        labels: &[("Completion_Rate", "Completion Rate (%)")],
    },
];

/// Maps the twelve derived sequences onto chart specs, in panel order.
pub fn build_charts(insights: &Insights) -> Vec<ChartSpec> {
    let datasets: [Vec<Value>; CHART_COUNT] = [
        rows(&insights.workouts_per_day, &[]),
        rows(&insights.exercise_frequency, &[("name", "Exercise")]),
        rows(&insights.muscle_split, &[("name", "Muscle")]),
        rows(&insights.weight_progression, &[("value", "Weight")]),
        rows(&insights.reps_progression, &[("value", "Number_Of_Reps")]),
        rows(&insights.exercise_volume, &[("group", "Exercise")]),
        rows(&insights.muscle_focus, &[("group", "Muscle")]),
        rows(&insights.compound_split, &[]),
        rows(&insights.muscle_volume_ranking, &[("name", "Muscle")]),
        rows(&insights.exercise_volume_ranking, &[("name", "Workout_Exercise")]),
        rows(&insights.planned_vs_actual, &[]),
        rows(&insights.completion_rate, &[]),
    ];

    LAYOUTS
        .iter()
        .zip(datasets)
        .enumerate()
        .map(|(index, (layout, data))| ChartSpec {
            position: index + 1,
            title: layout.title,
            kind: layout.kind,
            x: layout.x,
            y: layout.y.to_vec(),
            color: layout.color,
            labels: layout.labels.iter().copied().collect(),
            data,
        })
        .collect()
}

/// Serialises derived rows to JSON objects, renaming generic fields to
/// the column the chart binds.
fn rows<T: Serialize>(items: &[T], renames: &[(&str, &str)]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .map(|value| match value {
            Value::Object(mut object) => {
                for (from, to) in renames {
                    if let Some(field) = object.remove(*from) {
                        object.insert((*to).to_string(), field);
                    }
                }
                Value::Object(object)
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{build_charts, ChartKind, CHART_COUNT};
    use crate::domain::entry::{Compound, WorkoutDate, WorkoutEntry};
    use crate::insights::Insights;
    use std::str::FromStr;

    fn log() -> Vec<WorkoutEntry> {
        vec![WorkoutEntry {
            date: WorkoutDate::from_str("2026-09-01").expect("date should parse"),
            workout: "Push".to_string(),
            exercise: "Bench".to_string(),
            position: "Flat".to_string(),
            weight: 100.0,
            set_number: 1,
            target_reps: 10,
            number_of_reps: 8,
            is_compound: Compound::Yes,
            muscle: "Chest".to_string(),
        }]
    }

    #[test]
    fn twelve_panels_in_fixed_order() {
        let charts = build_charts(&Insights::compute(&log()));
        assert_eq!(charts.len(), CHART_COUNT);
        assert_eq!(
            charts.iter().map(|chart| chart.position).collect::<Vec<_>>(),
            (1..=CHART_COUNT).collect::<Vec<_>>()
        );
        assert_eq!(charts[0].title, "Total Workouts Over Time");
        assert_eq!(charts[2].kind, ChartKind::Pie);
        assert_eq!(charts[11].title, "Exercise Completion Rate Over Time");
    }

    #[test]
    fn every_bound_field_exists_in_the_data() {
        let charts = build_charts(&Insights::compute(&log()));
        for chart in &charts {
            assert_eq!(chart.data.len(), 1, "{} should have one row", chart.title);
            let row = chart.data[0].as_object().expect("rows should be objects");
            assert!(row.contains_key(chart.x), "{} lacks {}", chart.title, chart.x);
            for y in &chart.y {
                assert!(row.contains_key(*y), "{} lacks {}", chart.title, y);
            }
            if let Some(color) = chart.color {
                assert!(row.contains_key(color), "{} lacks {}", chart.title, color);
            }
        }
    }

    #[test]
    fn renamed_values_keep_their_numbers() {
        let charts = build_charts(&Insights::compute(&log()));
        assert_eq!(charts[3].data[0]["Weight"], 100.0);
        assert_eq!(charts[5].data[0]["Volume_Load"], 800.0);
        assert_eq!(charts[9].data[0]["Workout_Exercise"], "Push-Bench");
        assert_eq!(charts[11].data[0]["Completion_Rate"], 0.0);
    }

    #[test]
    fn specs_serialize_for_external_renderers() {
        let charts = build_charts(&Insights::compute(&log()));
        let json = serde_json::to_value(&charts[10]).expect("chart should serialize");
        assert_eq!(json["kind"], "line");
        assert_eq!(json["y"][1], "Number_Of_Reps");
        assert!(json.get("color").is_none());
        assert_eq!(json["labels"]["value"], "Reps");
    }
}
