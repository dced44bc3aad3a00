//! Sequential renumbering: `img0000001.jpg`, `img0000002.png`, ...

use crate::error::Result;
use crate::process::{FileResult, ProcessingStats, collect_files, move_file};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span};

/// Target name for the `number`-th file, keeping its original extension
pub fn ordered_name(number: usize, path: &Path) -> OsString {
    let mut name = OsString::from(format!("img{number:07}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Renames the files directly inside a directory to a numbered sequence
pub struct Renumberer {
    dry_run: bool,
    stats: ProcessingStats,
}

impl Renumberer {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            stats: ProcessingStats::new(),
        }
    }

    /// Renumber files in name order, starting at 1
    pub fn run(&self, dir: &Path) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "ordered_names", ?dir).entered();

        let files = collect_files(dir)?;
        info!(count = files.len(), "Found files");
        self.stats
            .total_files
            .store(files.len(), std::sync::atomic::Ordering::Relaxed);

        let results: Vec<FileResult> = files
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let result = self.renumber_one(index + 1, path);
                self.stats.record(result.status);
                result
            })
            .collect();

        info!("{}", self.stats.summary());
        Ok(results)
    }

    fn renumber_one(&self, number: usize, path: &Path) -> FileResult {
        let target: PathBuf = path.with_file_name(ordered_name(number, path));

        let same = target
            .to_string_lossy()
            .eq_ignore_ascii_case(&path.to_string_lossy());
        if same {
            debug!(?path, "Already numbered, skipping");
            return FileResult::skipped(path);
        }

        if !self.dry_run
            && let Err(e) = move_file(path, &target)
        {
            error!(?path, ?target, error = %e, "Failed to rename file");
            return FileResult::failed(path, &e);
        }
        FileResult::moved(path, target, self.dry_run)
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessingStatus;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_ordered_name() {
        assert_eq!(ordered_name(1, Path::new("a/b.JPG")), "img0000001.JPG");
        assert_eq!(ordered_name(1234567, Path::new("notes")), "img1234567");
    }

    #[test]
    fn test_renumbers_in_name_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.png");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "c.mp4");

        let renumberer = Renumberer::new(false);
        let results = renumberer.run(dir.path()).unwrap();

        assert!(results.iter().all(|r| r.status == ProcessingStatus::Renamed));
        assert_eq!(
            names(dir.path()),
            vec!["img0000001.jpg", "img0000002.png", "img0000003.mp4"]
        );
        assert_eq!(fs::read(dir.path().join("img0000002.png")).unwrap(), b"b.png");
    }

    #[test]
    fn test_existing_number_is_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "IMG0000001.jpg");
        touch(dir.path(), "z.jpg");

        let results = Renumberer::new(false).run(dir.path()).unwrap();
        assert_eq!(results[0].status, ProcessingStatus::Skipped);
        assert_eq!(results[1].status, ProcessingStatus::Renamed);
        assert_eq!(names(dir.path()), vec!["IMG0000001.jpg", "img0000002.jpg"]);
    }

    #[test]
    fn test_occupied_target_fails_without_overwrite() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "img0000001.jpg");

        let renumberer = Renumberer::new(false);
        let results = renumberer.run(dir.path()).unwrap();

        assert_eq!(results[0].status, ProcessingStatus::Failed);
        assert_eq!(results[1].status, ProcessingStatus::Renamed);
        assert_eq!(names(dir.path()), vec!["a.jpg", "img0000002.jpg"]);
        assert_eq!(renumberer.stats().failed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn test_dry_run() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.jpg");

        let results = Renumberer::new(true).run(dir.path()).unwrap();
        assert_eq!(results[0].status, ProcessingStatus::DryRun);
        assert_eq!(names(dir.path()), vec!["a.jpg"]);
    }
}
