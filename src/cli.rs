//! CLI argument parsing with clap

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Media Renamer - give photos and videos sortable capture-time names
///
/// Renames files to "YYYY-MM-DD HH-MM-SS.ext", taking the capture time from
/// camera filename conventions, EXIF data, or the file modification time.
#[derive(Parser, Debug)]
#[command(name = "media-renamer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long, global = true, env = "MEDIA_RENAMER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON
    #[arg(long, global = true, requires = "log_file")]
    pub json_log: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Gives proper names to images and videos
    FixNames {
        /// Folder to process. Runs on current folder if empty.
        path: Option<PathBuf>,

        /// Show what would be renamed without renaming
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Number of threads used to inspect files (0 = auto)
        #[arg(short = 't', long)]
        threads: Option<usize>,
    },

    /// Renames files to img0000001.ext, img0000002.ext, ...
    OrderedNames {
        /// Folder to process. Runs on current folder if empty.
        path: Option<PathBuf>,

        /// Show what would be renamed without renaming
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Displays greetings message
    Hw {
        /// Name for greeting
        #[arg(default_value = "world")]
        name: String,

        /// Number of greetings
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },

    /// Prints a sample configuration file
    SampleConfig,
}

impl Cli {
    /// Merge CLI arguments with config from file (or defaults).
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        match &self.command {
            Command::FixNames {
                dry_run, threads, ..
            } => {
                if *dry_run {
                    config.dry_run = true;
                }
                if let Some(threads) = threads {
                    config.threads = *threads;
                }
            }
            Command::OrderedNames { dry_run, .. } => {
                if *dry_run {
                    config.dry_run = true;
                }
            }
            Command::Hw { .. } | Command::SampleConfig => {}
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_names_defaults() {
        let cli = Cli::parse_from(["media-renamer", "fix-names"]);
        match cli.command {
            Command::FixNames {
                path,
                dry_run,
                threads,
            } => {
                assert!(path.is_none());
                assert!(!dry_run);
                assert!(threads.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_merge_overrides_file_config() {
        let cli = Cli::parse_from(["media-renamer", "fix-names", "photos", "-n", "-t", "3"]);
        let config = cli.merge_with_config(Config::default());
        assert!(config.dry_run);
        assert_eq!(config.threads, 3);
        assert!(!config.verbose);

        let cli = Cli::parse_from(["media-renamer", "-v", "ordered-names"]);
        let config = cli.merge_with_config(Config {
            threads: 8,
            ..Config::default()
        });
        assert!(config.verbose);
        assert_eq!(config.threads, 8);
    }

    #[test]
    fn test_ordered_names_dry_run_from_config_or_flag() {
        let cli = Cli::parse_from(["media-renamer", "ordered-names", "photos"]);
        let config = cli.merge_with_config(Config {
            dry_run: true,
            ..Config::default()
        });
        assert!(config.dry_run);

        let config = cli.merge_with_config(Config::default());
        assert!(!config.dry_run);

        let cli = Cli::parse_from(["media-renamer", "ordered-names", "-n"]);
        let config = cli.merge_with_config(Config::default());
        assert!(config.dry_run);
    }

    #[test]
    fn test_hw_defaults() {
        let cli = Cli::parse_from(["media-renamer", "hw"]);
        let Command::Hw { name, count } = cli.command else {
            panic!("expected hw");
        };
        assert_eq!(name, "world");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_json_log_requires_file() {
        assert!(Cli::try_parse_from(["media-renamer", "--json-log", "hw"]).is_err());
        assert!(
            Cli::try_parse_from(["media-renamer", "--json-log", "--log-file", "x.log", "hw"])
                .is_ok()
        );
    }
}
