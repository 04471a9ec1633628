mod app;
mod charts;
mod cli;
mod completions;
mod config;
mod csv_io;
mod db;
mod domain;
mod grid;
mod insights;
mod session;
mod store;
mod ui;

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use app::{App, AppError, GridEdit, Screen};
use charts::ChartSpec;
use cli::{Commands, InsightsArgs, LoggerSubcommands};
use config::{Overrides, Settings};
use store::SqliteRowStore;

const LOG_ENV: &str = "LIFTLOG_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::InvalidArgument(format!("cannot encode JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn run() -> Result<(), AppError> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    if let Some(Commands::Completions(args)) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let settings = Settings::load(&Overrides {
        config_path: cli.config,
        db_path: cli.db,
        table: cli.table,
    })?;
    init_tracing(&settings.log_filter);

    ensure_parent_dir(&settings.db_path)?;
    let store = SqliteRowStore::open(settings.db_path_str()?, &settings.table)
        .map_err(AppError::Load)?;

    let mut state = session::restore(store.connection()).map_err(AppError::Session)?;
    if let Some(view) = cli.command.as_ref().and_then(Commands::view) {
        state.select(view);
    }
    session::persist(store.connection(), state).map_err(AppError::Session)?;
    tracing::debug!(view = ?state.selected(), "view resolved");

    let mut app = App::new(store, settings.draft_path);

    match cli.command {
        Some(Commands::Logger(args)) => match args.command {
            None => {
                let grid = app.open_grid()?;
                if args.json {
                    print_json(&grid.rows())?;
                } else {
                    ui::print_header(domain::view::View::Logger);
                    ui::print_logger(&grid);
                }
            }
            Some(LoggerSubcommands::Export(export)) => export_log(&app, export.output)?,
            Some(LoggerSubcommands::Add(fields)) => {
                save_edit(&mut app, GridEdit::Add(fields.into_draft()), args.json)?
            }
            Some(LoggerSubcommands::Set(set)) => save_edit(
                &mut app,
                GridEdit::Update {
                    row: set.row,
                    patch: set.fields.into_draft(),
                },
                args.json,
            )?,
            Some(LoggerSubcommands::Rm(rm)) => {
                save_edit(&mut app, GridEdit::Remove(rm.rows), args.json)?
            }
            Some(LoggerSubcommands::Import(import)) => {
                let rows = app::read_import(&import.path)?;
                save_edit(&mut app, GridEdit::Import(rows), args.json)?
            }
        },
        Some(Commands::Insights(args)) => render_insights(&app, &state, &args)?,
        _ => render_screen(app.render(&state)?),
    }
    Ok(())
}

fn save_edit<S: store::RowStore>(
    app: &mut App<S>,
    edit: GridEdit,
    json: bool,
) -> Result<(), AppError> {
    let summary = app.edit(edit)?;
    if json {
        return print_json(&summary);
    }
    println!(
        "saved {} row(s) (was {})",
        summary.rows_saved, summary.rows_before
    );
    Ok(())
}

fn export_log<S: store::RowStore>(app: &App<S>, output: Option<PathBuf>) -> Result<(), AppError> {
    let count = match output {
        Some(path) => {
            ensure_parent_dir(&path)?;
            let count = app.export(std::fs::File::create(&path)?)?;
            eprintln!("exported {} row(s) to {}", count, path.display());
            count
        }
        None => app.export(std::io::stdout().lock())?,
    };
    tracing::info!(rows = count, "log exported");
    Ok(())
}

fn render_screen(screen: Screen) {
    match screen {
        Screen::Nothing => {}
        Screen::Planner => {
            ui::print_header(domain::view::View::Planner);
            ui::print_planner();
        }
        Screen::Logger(grid) => {
            ui::print_header(domain::view::View::Logger);
            ui::print_logger(&grid);
        }
        Screen::Insights { entries, charts } => {
            ui::print_header(domain::view::View::Insights);
            ui::print_entries(&entries);
            for chart in &charts {
                ui::print_chart(chart);
            }
        }
    }
}

fn render_insights<S: store::RowStore>(
    app: &App<S>,
    state: &domain::view::ViewState,
    args: &InsightsArgs,
) -> Result<(), AppError> {
    let Screen::Insights { entries, charts } = app.render(state)? else {
        return Ok(());
    };
    let charts = select_charts(charts, args.chart);
    if args.json {
        return print_json(&charts);
    }

    ui::print_header(domain::view::View::Insights);
    if !args.no_table {
        ui::print_entries(&entries);
    }
    for chart in &charts {
        ui::print_chart(chart);
    }
    Ok(())
}

fn select_charts(charts: Vec<ChartSpec>, position: Option<u16>) -> Vec<ChartSpec> {
    match position {
        Some(position) => charts
            .into_iter()
            .filter(|chart| chart.position == usize::from(position))
            .collect(),
        None => charts,
    }
}
