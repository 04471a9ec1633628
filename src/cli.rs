use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::charts::CHART_COUNT;
use crate::domain::validation::EntryDraft;
use crate::domain::view::View;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "liftlog")]
#[command(bin_name = "liftlog")]
#[command(version)]
#[command(about = "Plan, log, and chart strength workouts from a local SQLite log")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "LIFTLOG_DB_PATH",
        help = "Path to the SQLite database holding the workout log."
    )]
    pub db: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        env = "LIFTLOG_TABLE",
        help = "Name of the workout table."
    )]
    pub table: Option<String>,

    #[arg(
        short = 'c',
        long,
        env = "LIFTLOG_CONFIG",
        help = "Config file (defaults to ./liftlog.toml when present)."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Open the workout planner.")]
    Planner,
    #[command(about = "Show or edit the workout log.")]
    Logger(LoggerArgs),
    #[command(about = "Show the workout insights dashboard.")]
    Insights(InsightsArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

impl Commands {
    /// The view a command navigates to, if any.
    pub fn view(&self) -> Option<View> {
        match self {
            Commands::Planner => Some(View::Planner),
            Commands::Logger(_) => Some(View::Logger),
            Commands::Insights(_) => Some(View::Insights),
            Commands::Completions(_) => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct LoggerArgs {
    #[arg(long, help = "Print the grid rows as JSON.")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<LoggerSubcommands>,
}

#[derive(Debug, Subcommand)]
pub enum LoggerSubcommands {
    #[command(about = "Append a row and save the log.")]
    Add(EntryFieldArgs),
    #[command(about = "Edit cells of one row and save the log.")]
    Set(SetArgs),
    #[command(about = "Remove rows and save the log.")]
    Rm(RemoveArgs),
    #[command(about = "Replace the log with rows from a CSV file.")]
    Import(ImportArgs),
    #[command(about = "Write the log as CSV.")]
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(help = "Row number as shown by `liftlog logger` (1-based).")]
    pub row: usize,

    #[command(flatten)]
    pub fields: EntryFieldArgs,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(required = true, help = "Row numbers to remove (1-based).")]
    pub rows: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "CSV file with a header row of column names.")]
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(short = 'o', long, help = "Write to this file instead of stdout.")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
pub struct EntryFieldArgs {
    #[arg(long, help = "Workout date (YYYY-MM-DD).")]
    pub date: Option<String>,

    #[arg(long, help = "Workout name.")]
    pub workout: Option<String>,

    #[arg(long, help = "Exercise name.")]
    pub exercise: Option<String>,

    #[arg(long, help = "Body position.")]
    pub position: Option<String>,

    #[arg(long, help = "Weight lifted (0-300).")]
    pub weight: Option<String>,

    #[arg(long = "set", help = "Set number (1-10).")]
    pub set_number: Option<String>,

    #[arg(long, help = "Target reps (1-50).")]
    pub target_reps: Option<String>,

    #[arg(long = "reps", help = "Reps completed (1-50).")]
    pub number_of_reps: Option<String>,

    #[arg(long = "compound", help = "Compound lift: Yes or No.")]
    pub is_compound: Option<String>,

    #[arg(long, help = "Target muscle group.")]
    pub muscle: Option<String>,
}

impl EntryFieldArgs {
    pub fn into_draft(self) -> EntryDraft {
        EntryDraft {
            date: self.date,
            workout: self.workout,
            exercise: self.exercise,
            position: self.position,
            weight: self.weight,
            set_number: self.set_number,
            target_reps: self.target_reps,
            number_of_reps: self.number_of_reps,
            is_compound: self.is_compound,
            muscle: self.muscle,
        }
    }
}

#[derive(Debug, Args)]
pub struct InsightsArgs {
    #[arg(long, help = "Print the chart specs as JSON.")]
    pub json: bool,

    #[arg(
        long,
        value_parser = clap::value_parser!(u16).range(1..=CHART_COUNT as i64),
        help = "Show only chart N (1-12)."
    )]
    pub chart: Option<u16>,

    #[arg(long = "no-table", help = "Skip the workout log table.")]
    pub no_table: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
