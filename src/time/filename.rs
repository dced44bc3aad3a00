//! Filename timestamp parsing
//!
//! Vendor patterns are tried in a fixed order; the first one that yields a
//! valid date wins. The canonical pattern is kept apart and only answers
//! whether a file has already been renamed.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Timestamp recovered from a filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Capture time encoded in the name
    pub timestamp: NaiveDateTime,
    /// Lower-cased extension captured by the pattern, without the dot
    pub extension: Option<String>,
}

/// A recognizer for one filename convention
pub trait NamePattern: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Try to extract a timestamp from a bare file name (no directories)
    fn attempt(&self, file_name: &str) -> Option<PatternMatch>;
}

/// Regex-backed pattern whose capture groups map to date-time fields
pub struct RegexPattern {
    name: &'static str,
    regex: Regex,
    /// Group indices for year, month, day, hour, minute, second
    fields: [usize; 6],
    extension_group: Option<usize>,
}

impl RegexPattern {
    pub fn new(
        name: &'static str,
        pattern: &str,
        fields: [usize; 6],
        extension_group: Option<usize>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            fields,
            extension_group,
        })
    }

    /// Whether the name matches structurally, regardless of date validity
    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

impl NamePattern for RegexPattern {
    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, file_name: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(file_name)?;
        let [y, mo, d, h, mi, s] = self.fields.map(|i| caps.get(i).map(|m| m.as_str()));
        let timestamp = build_datetime(y?, mo?, d?, h?, mi?, s?);
        if timestamp.is_none() {
            trace!(file_name, pattern = self.name, "Pattern matched but date is invalid");
        }
        let extension = self
            .extension_group
            .and_then(|i| caps.get(i))
            .map(|m| m.as_str().to_lowercase());

        Some(PatternMatch {
            timestamp: timestamp?,
            extension,
        })
    }
}

/// Android camera: IMG_YYYYMMDD_HHmmss.jpg / VID_YYYYMMDD_HHmmss.mp4,
/// with the extension ending the name
static ANDROID: LazyLock<RegexPattern> = LazyLock::new(|| {
    RegexPattern::new(
        "android",
        r"(?i)(?:VID|IMG)_(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})\.(mp4|jpg)$",
        [1, 2, 3, 4, 5, 6],
        Some(7),
    )
    .expect("android pattern is valid")
});

/// Samsung camera: YYYYMMDD_HHmmss prefix
static SAMSUNG: LazyLock<RegexPattern> = LazyLock::new(|| {
    RegexPattern::new(
        "samsung",
        r"^(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})",
        [1, 2, 3, 4, 5, 6],
        None,
    )
    .expect("samsung pattern is valid")
});

/// Already renamed: "YYYY-MM-DD HH-mm-ss" prefix
static CANONICAL: LazyLock<RegexPattern> = LazyLock::new(|| {
    RegexPattern::new(
        "canonical",
        r"^(\d{4})-(\d{2})-(\d{2}) (\d{2})-(\d{2})-(\d{2})",
        [1, 2, 3, 4, 5, 6],
        None,
    )
    .expect("canonical pattern is valid")
});

/// Vendor patterns in priority order
pub fn vendor_patterns() -> [&'static dyn NamePattern; 2] {
    [&*ANDROID, &*SAMSUNG]
}

/// Check whether a file name is already in canonical form
pub fn is_canonical(file_name: &str) -> bool {
    CANONICAL.is_match(file_name)
}

/// Parse timestamp from filename using the vendor patterns
pub fn parse_filename_time(file_name: &str) -> Option<PatternMatch> {
    match_patterns(&vendor_patterns(), file_name)
}

/// Return the first successful match among `patterns`, tried in order
pub fn match_patterns(patterns: &[&dyn NamePattern], file_name: &str) -> Option<PatternMatch> {
    patterns.iter().find_map(|pattern| {
        let found = pattern.attempt(file_name)?;
        trace!(file_name, pattern = pattern.name(), "Matched filename pattern");
        Some(found)
    })
}

fn build_datetime(
    year: &str,
    month: &str,
    day: &str,
    hour: &str,
    minute: &str,
    second: &str,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?
        .and_hms_opt(hour.parse().ok()?, minute.parse().ok()?, second.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_android_format() {
        let m = parse_filename_time("IMG_20230115_153045.jpg").unwrap();
        assert_eq!(m.timestamp.year(), 2023);
        assert_eq!(m.timestamp.month(), 1);
        assert_eq!(m.timestamp.day(), 15);
        assert_eq!(m.timestamp.hour(), 15);
        assert_eq!(m.timestamp.minute(), 30);
        assert_eq!(m.timestamp.second(), 45);
        assert_eq!(m.extension.as_deref(), Some("jpg"));

        let m = parse_filename_time("vid_20230115_153045.MP4").unwrap();
        assert_eq!(m.extension.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_samsung_format() {
        let m = parse_filename_time("20230115_153045.mp4").unwrap();
        assert_eq!(m.timestamp.to_string(), "2023-01-15 15:30:45");
        assert!(m.extension.is_none());

        // Prefix only: trailing text is allowed
        assert!(parse_filename_time("20230115_153045(1).jpg").is_some());
        // Not at the start of the name
        assert!(parse_filename_time("x20230115_153045.jpg").is_none());
    }

    #[test]
    fn test_android_wins_over_samsung() {
        // Both shapes present; the Android capture is the one used
        let m = parse_filename_time("20230115_153045 VID_20220101_101010.mp4").unwrap();
        assert_eq!(m.timestamp.to_string(), "2022-01-01 10:10:10");
        assert_eq!(m.extension.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(parse_filename_time("IMG_20231315_153045.jpg").is_none());
        assert!(parse_filename_time("IMG_20230230_120000.jpg").is_none());
        assert!(parse_filename_time("20230115_256045.mp4").is_none());
    }

    #[test]
    fn test_invalid_android_falls_through_to_next_pattern() {
        struct Fixed;
        impl NamePattern for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn attempt(&self, _: &str) -> Option<PatternMatch> {
                Some(PatternMatch {
                    timestamp: NaiveDate::from_ymd_opt(2020, 1, 1)?.and_hms_opt(0, 0, 0)?,
                    extension: None,
                })
            }
        }

        let fixed = Fixed;
        let patterns: [&dyn NamePattern; 2] = [&*ANDROID, &fixed];
        let m = match_patterns(&patterns, "IMG_20231399_153045.jpg").unwrap();
        assert_eq!(m.timestamp.year(), 2020);
    }

    #[test]
    fn test_canonical_detection() {
        assert!(is_canonical("2023-01-15 15-30-45.jpg"));
        assert!(is_canonical("2023-01-15 15-30-45_IMG_20230115_153045.jpg"));
        assert!(!is_canonical("2023-01-15_15-30-45.jpg"));
        assert!(!is_canonical("IMG_20230115_153045.jpg"));
    }

    #[test]
    fn test_no_match() {
        assert!(parse_filename_time("photo1.png").is_none());
        assert!(parse_filename_time("IMG_2023_0115.jpg").is_none());
        assert!(parse_filename_time("IMG_20230115_153045.png").is_none());
    }

    #[test]
    fn test_android_extension_must_end_name() {
        assert!(parse_filename_time("IMG_20230115_153045.jpg.xmp").is_none());
        assert!(parse_filename_time("VID_20230115_153045.mp4.bak").is_none());
        assert!(parse_filename_time("IMG_20230115_153045.jpgx").is_none());
    }
}
