use std::io::{self, IsTerminal};

use serde_json::Value;

use crate::charts::ChartSpec;
use crate::domain::entry::WorkoutEntry;
use crate::domain::validation::{Column, EntryDraft};
use crate::domain::view::View;
use crate::grid::Grid;

const BAR_WIDTH: usize = 30;

pub fn print_header(view: View) {
    let palette = Palette::auto();
    println!("{}", palette.title("My Workout Tracker"));
    println!("{}", palette.heading(view.title()));
}

pub fn print_planner() {
    let palette = Palette::auto();
    println!("{}", palette.dim("WIP"));
}

pub fn print_logger(grid: &Grid) {
    let palette = Palette::auto();
    println!(
        "{}",
        palette.dim("Easily track and edit your workout data with custom inputs for each exercise.")
    );
    if grid.is_empty() {
        println!(
            "{}",
            palette.dim("no rows yet; seed the log with `liftlog logger import <csv>`")
        );
        return;
    }
    for line in render_table(&grid_headers(), &draft_cells(grid.rows())) {
        println!("{line}");
    }

    let catalog = grid.catalog();
    println!(
        "{}",
        palette.dim(&format!(
            "options: Workout [{}]  Position [{}]  Muscle [{}]  Is_Compound [Yes, No]",
            join(&catalog.workouts),
            join(&catalog.positions),
            join(&catalog.muscles)
        ))
    );
    println!("{}", palette.dim(&format!("{} row(s)", grid.len())));
}

pub fn print_entries(entries: &[WorkoutEntry]) {
    let palette = Palette::auto();
    println!(
        "{}",
        palette.dim(
            "Here's a detailed log of your workout history, tracking exercises, sets, reps, \
             and progression over time"
        )
    );
    if entries.is_empty() {
        println!("{}", palette.dim("no workouts logged"));
        return;
    }
    let mut headers: Vec<&str> = Column::EDITABLE.iter().map(|column| column.as_str()).collect();
    headers.push("Workout_Exercise");
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.date.to_string(),
                entry.workout.clone(),
                entry.exercise.clone(),
                entry.position.clone(),
                format_number(entry.weight),
                entry.set_number.to_string(),
                entry.target_reps.to_string(),
                entry.number_of_reps.to_string(),
                entry.is_compound.to_string(),
                entry.muscle.clone(),
                entry.workout_exercise(),
            ]
        })
        .collect();
    for line in render_table(&headers, &rows) {
        println!("{line}");
    }
}

pub fn print_chart(chart: &ChartSpec) {
    let palette = Palette::auto();
    println!();
    println!(
        "{} {}",
        palette.heading(&format!("[{}] {}", chart.position, chart.title)),
        palette.dim(&format!("({})", chart.kind.as_str()))
    );
    if chart.data.is_empty() {
        println!("{}", palette.dim("no data"));
        return;
    }
    for line in chart_lines(chart) {
        println!("{line}");
    }
}

fn grid_headers() -> Vec<&'static str> {
    let mut headers = vec!["#"];
    headers.extend(Column::EDITABLE.iter().map(|column| column.as_str()));
    headers
}

fn draft_cells(rows: &[EntryDraft]) -> Vec<Vec<String>> {
    rows.iter()
        .enumerate()
        .map(|(index, draft)| {
            let mut cells = vec![(index + 1).to_string()];
            cells.extend(
                Column::EDITABLE
                    .iter()
                    .map(|column| draft.cell(*column).unwrap_or("").to_string()),
            );
            cells
        })
        .collect()
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Lays out the chart's bound columns, with a proportional bar when the
/// chart has a single value series.
fn chart_lines(chart: &ChartSpec) -> Vec<String> {
    let mut fields = vec![chart.x];
    if let Some(color) = chart.color {
        fields.push(color);
    }
    fields.extend(chart.y.iter().copied());

    let bar_field = match chart.y.as_slice() {
        [single] => Some(*single),
        _ => None,
    };
    let max = bar_field
        .map(|field| {
            chart
                .data
                .iter()
                .filter_map(|row| row.get(field).and_then(Value::as_f64))
                .fold(0.0_f64, f64::max)
        })
        .unwrap_or(0.0);

    let mut headers = fields.clone();
    if bar_field.is_some() {
        headers.push("");
    }
    let rows: Vec<Vec<String>> = chart
        .data
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = fields
                .iter()
                .map(|field| row.get(*field).map(format_value).unwrap_or_default())
                .collect();
            if let Some(field) = bar_field {
                let value = row.get(field).and_then(Value::as_f64).unwrap_or(0.0);
                cells.push(bar(value, max));
            }
            cells
        })
        .collect();
    render_table(&headers, &rows)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(width.min(BAR_WIDTH))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number
            .as_u64()
            .map(|whole| whole.to_string())
            .or_else(|| number.as_f64().map(format_number))
            .unwrap_or_else(|| number.to_string()),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Left-aligned text table with a header rule.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string(),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn title(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }
}
