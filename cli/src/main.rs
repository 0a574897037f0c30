use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use script_migrate_discovery::ScriptSet;
use script_migrate_sqlite::{ScriptEngine, history};
use serde::Serialize;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "script-migrate")]
#[command(about = "Apply versioned SQL migration scripts to a SQLite database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show pending scripts and whether an update is needed.
    Status(StatusArgs),
    /// Apply all pending migration scripts in one atomic batch.
    Apply(ApplyArgs),
    /// List scripts recorded in the migration history.
    History(HistoryArgs),
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Directory containing .sql migration scripts.
    #[arg(long)]
    scripts: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Directory containing .sql migration scripts.
    #[arg(long)]
    scripts: PathBuf,
}

#[derive(Debug, Args)]
struct HistoryArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    needs_update: bool,
    pending: Vec<String>,
    applied_count: usize,
}

#[derive(Debug, Serialize)]
struct HistoryRow {
    script_id: String,
    applied_at: String,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Status(args) => run_status(args),
        Command::Apply(args) => run_apply(args),
        Command::History(args) => run_history(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_status(args: StatusArgs) -> Result<(), String> {
    let engine = build_engine(&args.db, &args.scripts)?;

    let needs_update = engine
        .needs_updating()
        .map_err(|e| format!("Reconciliation failed: {e}"))?;
    let pending = engine.pending();

    let (conn, _) = engine.into_parts();
    let applied_count = history::applied_ids(&conn)
        .map_err(|e| format!("Failed to read migration history: {e}"))?
        .len();

    let report = StatusReport {
        needs_update,
        pending,
        applied_count,
    };

    match args.format {
        CliOutputFormat::Json => println!("{}", to_json(&report)?),
        CliOutputFormat::Table => {
            println!("Migration status:");
            println!("  Applied scripts: {}", report.applied_count);
            println!(
                "  Needs update: {}",
                if report.needs_update { "yes" } else { "no" }
            );
            if report.pending.is_empty() {
                println!("  Pending: none");
            } else {
                println!("  Pending:");
                for name in &report.pending {
                    println!("    {name}");
                }
            }
        }
    }
    Ok(())
}

fn run_apply(args: ApplyArgs) -> Result<(), String> {
    let engine = build_engine(&args.db, &args.scripts)?;

    let needs_update = engine
        .needs_updating()
        .map_err(|e| format!("Reconciliation failed: {e}"))?;
    if !needs_update {
        println!("Database is up to date.");
        return Ok(());
    }

    let pending = engine.pending();
    engine.update().map_err(|e| format!("Update failed: {e}"))?;

    println!("Applied {} script(s):", pending.len());
    for name in &pending {
        println!("  {name}");
    }
    Ok(())
}

fn run_history(args: HistoryArgs) -> Result<(), String> {
    let conn = open_db(&args.db)?;

    let table_exists =
        history::exists(&conn).map_err(|e| format!("Failed to read migration history: {e}"))?;
    let rows: Vec<HistoryRow> = if table_exists {
        history::applied(&conn)
            .map_err(|e| format!("Failed to read migration history: {e}"))?
            .into_iter()
            .map(|row| HistoryRow {
                script_id: row.script_id,
                applied_at: format_timestamp(&row.applied_at),
            })
            .collect()
    } else {
        Vec::new()
    };

    match args.format {
        CliOutputFormat::Json => println!("{}", to_json(&rows)?),
        CliOutputFormat::Table => {
            if rows.is_empty() {
                println!("No migrations have been applied.");
            } else {
                println!("Applied migrations:");
                for row in &rows {
                    println!("  {}  {}", row.applied_at, row.script_id);
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_db(path: &Path) -> Result<rusqlite::Connection, String> {
    rusqlite::Connection::open(path)
        .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))
}

fn build_engine(db: &Path, scripts: &Path) -> Result<ScriptEngine, String> {
    let conn = open_db(db)?;
    let repo = ScriptSet::from_dir(scripts)
        .map_err(|e| format!("Failed to load scripts from '{}': {e}", scripts.display()))?
        .into_repository();
    Ok(ScriptEngine::new(conn, repo))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Renders a stored `DateApplied` value (UTC, `YYYY-MM-DD HH:MM:SS`) as
/// RFC 3339; values in any other shape pass through unchanged.
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc().to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}
