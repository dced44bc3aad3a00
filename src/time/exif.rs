//! EXIF time extraction for images

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Date fields consulted in metadata, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTag {
    /// When the original image was taken
    Original,
    /// When the image was digitized
    Digitized,
    /// Generic modification date/time
    Modified,
}

impl DateTag {
    pub const PRIORITY: [DateTag; 3] = [DateTag::Original, DateTag::Digitized, DateTag::Modified];

    fn exif_tag(self) -> Tag {
        match self {
            DateTag::Original => Tag::DateTimeOriginal,
            DateTag::Digitized => Tag::DateTimeDigitized,
            DateTag::Modified => Tag::DateTime,
        }
    }
}

/// One raw date value read from a file's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub tag: DateTag,
    pub value: String,
}

/// Reads embedded date metadata from a file
pub trait MetadataReader: Send + Sync {
    /// Return the date entries present in the file. Fails when the file
    /// cannot be opened or decoded.
    fn read_dates(&self, path: &Path) -> Result<Vec<MetadataEntry>>;
}

/// Metadata reader backed by kamadak-exif
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_dates(&self, path: &Path) -> Result<Vec<MetadataEntry>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| Error::MetadataRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let entries = DateTag::PRIORITY
            .iter()
            .filter_map(|&tag| {
                let field = exif.get_field(tag.exif_tag(), In::PRIMARY)?;
                let Value::Ascii(ref values) = field.value else {
                    return None;
                };
                let raw = values.first()?;
                Some(MetadataEntry {
                    tag,
                    value: String::from_utf8_lossy(raw).into_owned(),
                })
            })
            .collect();

        Ok(entries)
    }
}

/// Extract capture time from embedded metadata.
///
/// Any read or decode failure counts as "no metadata date". A value that
/// does not parse is skipped in favour of the next field.
pub fn extract_exif_time(reader: &dyn MetadataReader, path: &Path) -> Option<NaiveDateTime> {
    let entries = match reader.read_dates(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(?path, error = %e, "Metadata unavailable");
            return None;
        }
    };

    for tag in DateTag::PRIORITY {
        let Some(entry) = entries.iter().find(|e| e.tag == tag) else {
            continue;
        };
        match parse_exif_datetime(&entry.value) {
            Some(datetime) => {
                trace!(?path, ?tag, "Found EXIF date");
                return Some(datetime);
            }
            None => debug!(?path, ?tag, value = %entry.value, "Unparseable EXIF date"),
        }
    }

    None
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_matches(|c: char| c == '\0' || c == '"' || c.is_whitespace());
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").ok()
}
