//! Rename resolution
//!
//! Turns a file path into a [`RenameDecision`]. Resolution is split into a
//! read-only inspection step, safe to run on many files at once, and a
//! decision step that consults the live directory for collisions.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::time::exif::MetadataReader;
use crate::time::{ExtractedTime, extract_time, filename};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format of canonical file names, before the extension
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// What inspection found out about a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// Name is already canonical
    Canonical,
    /// A capture time was found
    Dated(ExtractedTime),
    /// No source produced a capture time
    Undated,
}

/// Outcome of resolving one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameDecision {
    /// Already canonical, leave alone
    Skip,
    /// Move `from` to `to`
    Renamed {
        from: PathBuf,
        to: PathBuf,
        time: ExtractedTime,
    },
    /// No date source succeeded
    Unresolved,
}

/// Resolves canonical names for files
pub struct Resolver<'a> {
    config: &'a Config,
    reader: &'a dyn MetadataReader,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config, reader: &'a dyn MetadataReader) -> Self {
        Self { config, reader }
    }

    /// Inspect a file without touching the file system beyond reads
    pub fn inspect(&self, path: &Path) -> Result<Inspection> {
        let file_name = path.file_name().ok_or_else(|| Error::InvalidFileName {
            path: path.to_path_buf(),
        })?;

        if filename::is_canonical(&file_name.to_string_lossy()) {
            debug!(?path, "Already canonical, skipping");
            return Ok(Inspection::Canonical);
        }

        Ok(match extract_time(path, self.config, self.reader)? {
            Some(time) => Inspection::Dated(time),
            None => Inspection::Undated,
        })
    }

    /// Turn an inspection into a decision, checking the directory for collisions.
    ///
    /// `claimed` holds targets already handed out in this run; they count as
    /// taken even when nothing has been moved yet (dry run).
    pub fn decide(
        &self,
        path: &Path,
        inspection: Inspection,
        claimed: &HashSet<PathBuf>,
    ) -> Result<RenameDecision> {
        let time = match inspection {
            Inspection::Canonical => return Ok(RenameDecision::Skip),
            Inspection::Undated => return Ok(RenameDecision::Unresolved),
            Inspection::Dated(time) => time,
        };

        let extension = match &time.extension {
            Some(ext) => format!(".{ext}"),
            None => original_extension(path),
        };
        let name = canonical_name(&time.timestamp, &extension);
        let to = resolve_collision(path, &name, &extension, claimed)?;

        Ok(RenameDecision::Renamed {
            from: path.to_path_buf(),
            to,
            time,
        })
    }

    /// Inspect and decide in one step
    pub fn resolve(&self, path: &Path) -> Result<RenameDecision> {
        let inspection = self.inspect(path)?;
        self.decide(path, inspection, &HashSet::new())
    }
}

/// Build `YYYY-MM-DD HH-MM-SS<extension>`
pub fn canonical_name(timestamp: &NaiveDateTime, extension: &str) -> String {
    format!("{}{}", timestamp.format(CANONICAL_FORMAT), extension.to_lowercase())
}

/// Lower-cased extension of `path` including the leading dot, or empty
fn original_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Pick the target path for `name` next to `source`.
///
/// A name is taken when it exists on disk or is in `claimed`. When `name` is
/// taken, the original stem is appended after an underscore. If that is
/// taken too the file is refused rather than overwritten.
fn resolve_collision(
    source: &Path,
    name: &str,
    extension: &str,
    claimed: &HashSet<PathBuf>,
) -> Result<PathBuf> {
    let is_taken = |path: &Path| path.exists() || claimed.contains(path);

    let folder = source.parent().unwrap_or_else(|| Path::new(""));
    let target = folder.join(name);
    if !is_taken(&target) {
        return Ok(target);
    }

    let stem = source.file_stem().ok_or_else(|| Error::InvalidFileName {
        path: source.to_path_buf(),
    })?;
    let base = name.strip_suffix(extension).unwrap_or(name);

    let mut alternative = OsString::from(base);
    alternative.push("_");
    alternative.push(stem);
    alternative.push(extension);

    let target = folder.join(alternative);
    debug!(?source, ?target, "Target name taken, disambiguating");
    if is_taken(&target) {
        return Err(Error::TargetExists { path: target });
    }
    Ok(target)
}
