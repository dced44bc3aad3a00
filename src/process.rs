//! Batch processor with Rayon parallel inspection
//!
//! Handles the core logic of:
//! - Enumerating the files directly inside a directory
//! - Inspecting each file for a capture time (in parallel)
//! - Resolving target names and renaming (sequentially)

use crate::config::Config;
use crate::error::{Error, Result};
use crate::rename::{Inspection, RenameDecision, Resolver};
use crate::time::ExtractedTime;
use crate::time::exif::{ExifReader, MetadataReader};

use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Level, debug, error, info, span, warn};
use walkdir::WalkDir;

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination file path (if renamed)
    pub destination: Option<PathBuf>,
    /// Extracted time information
    pub time_info: Option<ExtractedTime>,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl FileResult {
    fn new(source: &Path, status: ProcessingStatus) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: None,
            time_info: None,
            status,
            error: None,
        }
    }

    pub(crate) fn failed(source: &Path, error: &Error) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(source, ProcessingStatus::Failed)
        }
    }

    pub(crate) fn moved(source: &Path, destination: PathBuf, dry_run: bool) -> Self {
        let status = if dry_run {
            ProcessingStatus::DryRun
        } else {
            ProcessingStatus::Renamed
        };
        Self {
            destination: Some(destination),
            ..Self::new(source, status)
        }
    }

    pub(crate) fn skipped(source: &Path) -> Self {
        Self::new(source, ProcessingStatus::Skipped)
    }
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// File was renamed
    Renamed,
    /// File was skipped (name already final)
    Skipped,
    /// No capture time could be determined
    Unresolved,
    /// Processing failed
    Failed,
    /// Dry run - would have renamed
    DryRun,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub total_files: AtomicUsize,
    pub renamed: AtomicUsize,
    pub skipped: AtomicUsize,
    pub unresolved: AtomicUsize,
    pub failed: AtomicUsize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished file
    pub fn record(&self, status: ProcessingStatus) {
        let counter = match status {
            ProcessingStatus::Renamed | ProcessingStatus::DryRun => &self.renamed,
            ProcessingStatus::Skipped => &self.skipped,
            ProcessingStatus::Unresolved => &self.unresolved,
            ProcessingStatus::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Renamed: {}, Skipped: {}, Unresolved: {}, Failed: {}",
            self.total_files.load(Ordering::Relaxed),
            self.renamed.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
            self.unresolved.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }
}

/// Renames media files in one directory to their capture time
pub struct Processor {
    config: Config,
    reader: Box<dyn MetadataReader>,
    stats: ProcessingStats,
}

impl Processor {
    /// Create a new processor reading metadata with kamadak-exif
    pub fn new(config: Config) -> Self {
        Self::with_reader(config, Box::new(ExifReader))
    }

    /// Create a processor with a custom metadata reader
    pub fn with_reader(config: Config, reader: Box<dyn MetadataReader>) -> Self {
        Self {
            config,
            reader,
            stats: ProcessingStats::new(),
        }
    }

    /// Run the rename pipeline over the files directly inside `dir`.
    ///
    /// Only a missing or unreadable directory is an error; per-file problems
    /// are reported in the returned results.
    pub fn run(&self, dir: &Path) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "fix_names", ?dir).entered();

        let files = collect_files(dir)?;
        info!(count = files.len(), "Found files");
        self.stats.total_files.store(files.len(), Ordering::Relaxed);

        if files.is_empty() {
            info!("No files to process");
            return Ok(Vec::new());
        }

        let resolver = Resolver::new(&self.config, self.reader.as_ref());

        // Phase 1: read-only inspection, safe to parallelize
        let inspections = self.inspect_all(&resolver, &files)?;

        // Phase 2: collision checks and renames, one file at a time
        let mut claimed = HashSet::new();
        let results: Vec<FileResult> = files
            .iter()
            .zip(inspections)
            .map(|(path, inspection)| {
                let _file_span = span!(Level::DEBUG, "process_file", ?path).entered();
                let result = match inspection {
                    Ok(inspection) => self.commit(&resolver, path, inspection, &mut claimed),
                    Err(e) => {
                        error!(?path, error = %e, "Failed to inspect file");
                        FileResult::failed(path, &e)
                    }
                };
                self.stats.record(result.status);
                result
            })
            .collect();

        info!("{}", self.stats.summary());
        Ok(results)
    }

    fn inspect_all(
        &self,
        resolver: &Resolver<'_>,
        files: &[PathBuf],
    ) -> Result<Vec<Result<Inspection>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build thread pool: {e}")))?;

        Ok(pool.install(|| files.par_iter().map(|path| resolver.inspect(path)).collect()))
    }

    /// Decide and apply one rename. Targets handed out are recorded in
    /// `claimed` so later files in the batch see them as taken in dry runs too.
    fn commit(
        &self,
        resolver: &Resolver<'_>,
        path: &Path,
        inspection: Inspection,
        claimed: &mut HashSet<PathBuf>,
    ) -> FileResult {
        let decision = match resolver.decide(path, inspection, claimed) {
            Ok(decision) => decision,
            Err(e) => {
                error!(?path, error = %e, "Failed to resolve target name");
                return FileResult::failed(path, &e);
            }
        };

        match decision {
            RenameDecision::Skip => FileResult::skipped(path),
            RenameDecision::Unresolved => {
                warn!(?path, "No capture time found, leaving file unchanged");
                FileResult::new(path, ProcessingStatus::Unresolved)
            }
            RenameDecision::Renamed { from, to, time } => {
                if !self.config.dry_run
                    && let Err(e) = move_file(&from, &to)
                {
                    error!(?from, ?to, error = %e, "Failed to rename file");
                    return FileResult::failed(&from, &e);
                }
                debug!(?from, ?to, source = ?time.source, "Renamed file");
                claimed.insert(to.clone());
                FileResult {
                    time_info: Some(time),
                    ..FileResult::moved(&from, to, self.config.dry_run)
                }
            }
        }
    }

    /// Get processing statistics
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

/// Collect the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(count = files.len(), ?dir, "Collected files");
    Ok(files)
}

/// Rename `from` to `to`, refusing to replace an existing file
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        return Err(Error::TargetExists {
            path: to.to_path_buf(),
        });
    }
    fs::rename(from, to)?;
    Ok(())
}
