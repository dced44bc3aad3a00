//! Media Renamer - sortable capture-time names for photos and videos
//!
//! A CLI tool that renames media files using the capture time found in
//! camera filename conventions, EXIF metadata, or file system timestamps.

use anyhow::{Context, Result};
use clap::Parser;
use media_renamer::process::ProcessingStats;
use media_renamer::{Cli, Command, Config, FileResult, ProcessingStatus, Processor, Renumberer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored status lines for the console

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::DarkYellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    /// Print a separator line
    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    /// Print `path [status] detail`
    pub fn print_status(path: &str, status: &str, color: Color, detail: &str) {
        let mut out = stdout();
        let _ = out.execute(Print(path));
        let _ = out.execute(Print(" ["));
        let _ = out.execute(Print(style(status).with(color).bold()));
        let _ = out.execute(Print("]"));
        if !detail.is_empty() {
            let _ = out.execute(Print(" "));
            let _ = out.execute(Print(style(detail).with(color)));
        }
        let _ = out.execute(Print("\n"));
    }

    /// Print one statistic
    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print a warning message
    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config first: its `verbose` decides the log level
    let config = load_config(&cli)?;

    // Keep the guard alive so the file writer flushes on exit
    let _guard = setup_logging(&cli, log_level(config.verbose))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Media Renamer starting");

    match &cli.command {
        Command::Hw { name, count } => {
            for _ in 0..*count {
                println!("Hello {name}!");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::SampleConfig => {
            print!("{}", Config::sample_config());
            Ok(ExitCode::SUCCESS)
        }
        Command::FixNames { path, .. } => {
            if let Some(config_file) = &cli.config {
                info!(config_file = %config_file.display(), "Loaded configuration from file");
            }
            if config.verbose {
                info!(?config, "Configuration loaded");
            }
            let dir = resolve_dir(path.as_deref())?;
            let dry_run = config.dry_run;
            let processor = Processor::new(config);
            let outcome = processor.run(&dir);
            Ok(finish(outcome, processor.stats(), dry_run))
        }
        Command::OrderedNames { path, .. } => {
            if let Some(config_file) = &cli.config {
                info!(config_file = %config_file.display(), "Loaded configuration from file");
            }
            let dir = resolve_dir(path.as_deref())?;
            let renumberer = Renumberer::new(config.dry_run);
            let outcome = renumberer.run(&dir);
            Ok(finish(outcome, renumberer.stats(), config.dry_run))
        }
    }
}

/// Report the results, or fail with a non-zero status when the whole
/// command could not run
fn finish(
    outcome: media_renamer::Result<Vec<FileResult>>,
    stats: &ProcessingStats,
    dry_run: bool,
) -> ExitCode {
    match outcome {
        Ok(results) => {
            report(&results, stats, dry_run);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// The directory argument, or the current directory
fn resolve_dir(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => std::env::current_dir().context("Cannot determine current directory"),
    }
}

/// Load configuration from file (if given) and apply CLI overrides.
/// Only the renaming commands read the file.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match (&cli.command, &cli.config) {
        (Command::FixNames { .. } | Command::OrderedNames { .. }, Some(path)) => {
            Config::load_from_file(path)
                .with_context(|| format!("Cannot load config {}", path.display()))?
        }
        _ => Config::default(),
    };
    Ok(cli.merge_with_config(config))
}

fn log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// `-> destination` for results that have one
fn destination_label(result: &FileResult) -> String {
    result
        .destination
        .as_ref()
        .map(|p| format!("-> {}", p.display()))
        .unwrap_or_default()
}

/// Print one status line per file and a summary
fn report(results: &[FileResult], stats: &ProcessingStats, dry_run: bool) {
    use cli_output::*;

    for result in results {
        let source = result.source.display().to_string();
        let destination = destination_label(result);
        match result.status {
            ProcessingStatus::Renamed => {
                print_status(&source, "OK", CliTheme::SUCCESS, &destination)
            }
            ProcessingStatus::DryRun => {
                print_status(&source, "Dry run", CliTheme::ACCENT, &destination)
            }
            ProcessingStatus::Skipped => print_status(&source, "Skip", CliTheme::WARNING, ""),
            ProcessingStatus::Unresolved => {
                print_status(&source, "Unresolved", CliTheme::WARNING, "no capture time found")
            }
            ProcessingStatus::Failed => print_status(
                &source,
                "Error",
                CliTheme::ERROR,
                result.error.as_deref().unwrap_or("unknown error"),
            ),
        }
    }

    print_separator();
    print_stat("Total", stats.total_files.load(Ordering::Relaxed), CliTheme::ACCENT);
    print_stat("Renamed", stats.renamed.load(Ordering::Relaxed), CliTheme::SUCCESS);
    print_stat("Skipped", stats.skipped.load(Ordering::Relaxed), CliTheme::WARNING);
    print_stat("Unresolved", stats.unresolved.load(Ordering::Relaxed), CliTheme::WARNING);
    print_stat("Failed", stats.failed.load(Ordering::Relaxed), CliTheme::ERROR);

    if dry_run {
        print_separator();
        print_warning("Dry run: no files were renamed");
    }
}

/// Setup logging: stderr always, plus an optional file layer
fn setup_logging(cli: &Cli, level: Level) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    let Some(log_path) = &cli.log_file else {
        subscriber.init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Cannot open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
