//! File system modification time fallback

use crate::error::Result;
use chrono::{Local, NaiveDateTime, TimeZone};
use filetime::FileTime;
use std::fs;
use std::path::Path;

/// Read a file's last-write time as local wall-clock time.
///
/// Returns `Ok(None)` when the timestamp is unset (at or before the Unix
/// epoch). Failing to stat the file is an error.
pub fn extract_modified_time(path: &Path) -> Result<Option<NaiveDateTime>> {
    let metadata = fs::metadata(path)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    Ok(to_local(mtime))
}

fn to_local(mtime: FileTime) -> Option<NaiveDateTime> {
    if mtime.unix_seconds() <= 0 {
        return None;
    }
    Local
        .timestamp_opt(mtime.unix_seconds(), 0)
        .earliest()
        .map(|dt| dt.naive_local())
}
