//! Time extraction module
//!
//! Capture timestamps are inferred from, in order:
//! - Vendor filename patterns
//! - EXIF metadata in still images
//! - File system modification time

pub mod exif;
pub mod filename;
pub mod filesystem;

use crate::config::Config;
use crate::error::Result;
use chrono::NaiveDateTime;
use self::exif::MetadataReader;
use std::path::Path;
use tracing::debug;

/// Source of the extracted timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Parsed from filename
    Filename,
    /// Extracted from EXIF metadata
    Exif,
    /// From file system modification time
    FileSystem,
}

/// Result of timestamp extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTime {
    /// The extracted timestamp
    pub timestamp: NaiveDateTime,
    /// Source of the timestamp
    pub source: TimeSource,
    /// Extension implied by the source, lower-cased without the dot.
    /// Only filename patterns ever set this.
    pub extension: Option<String>,
}

/// Extract creation time from a media file using multiple strategies.
///
/// Returns `Ok(None)` when no source yields a date. Only a failure to stat
/// the file is an error.
pub fn extract_time(
    path: &Path,
    config: &Config,
    reader: &dyn MetadataReader,
) -> Result<Option<ExtractedTime>> {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();

    if let Some(found) = filename::parse_filename_time(&file_name) {
        debug!(?path, "Extracted time from filename");
        return Ok(Some(ExtractedTime {
            timestamp: found.timestamp,
            source: TimeSource::Filename,
            extension: found.extension,
        }));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if config.is_metadata_candidate(ext) {
        if let Some(timestamp) = exif::extract_exif_time(reader, path) {
            debug!(?path, "Extracted time from EXIF");
            return Ok(Some(ExtractedTime {
                timestamp,
                source: TimeSource::Exif,
                extension: None,
            }));
        }
        debug!(?path, "No EXIF time found, using file system time");
    }

    Ok(filesystem::extract_modified_time(path)?.map(|timestamp| {
        debug!(?path, "Using file system modification time as fallback");
        ExtractedTime {
            timestamp,
            source: TimeSource::FileSystem,
            extension: None,
        }
    }))
}
