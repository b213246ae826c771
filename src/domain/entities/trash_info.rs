//! `.trashinfo` record decoding.
//!
//! A record looks like:
//!
//! ```text
//! [Trash Info]
//! Path=/home/alice/foo%20bar.txt
//! DeletionDate=2004-08-31T22:32:08
//! ```
//!
//! Only decoding lives here; records are written by whoever trashes the file.

use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Extension (without the dot) of metadata records in `info/`
pub const TRASHINFO_EXTENSION: &str = "trashinfo";

/// Group header opening the record
pub const TRASH_INFO_GROUP: &str = "[Trash Info]";

/// Local time, second precision, no timezone
pub const DELETION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const PATH_KEY: &str = "Path";
const DELETION_DATE_KEY: &str = "DeletionDate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrashInfoError {
    #[error("missing DeletionDate field")]
    MissingDeletionDate,

    #[error("invalid DeletionDate '{value}': {reason}")]
    InvalidDeletionDate { value: String, reason: String },

    #[error("record is not valid UTF-8")]
    NotUtf8,

    #[error("record could not be read: {0}")]
    Unreadable(String),
}

/// A decoded trashinfo record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashInfo {
    /// Original location, percent-decoded. Absent in some legacy records.
    pub original_path: Option<PathBuf>,
    pub deletion_date: NaiveDateTime,
}

impl TrashInfo {
    /// Decodes raw record bytes.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, TrashInfoError> {
        let content = std::str::from_utf8(bytes).map_err(|_| TrashInfoError::NotUtf8)?;
        Self::parse(content)
    }

    /// Decodes record text.
    ///
    /// When the `[Trash Info]` header is present only keys inside that group
    /// are read. Without any header the whole file is read as one group, which
    /// accepts older writers that emit bare `DeletionDate=` lines. The first
    /// occurrence of a key wins.
    pub fn parse(content: &str) -> Result<Self, TrashInfoError> {
        let has_group_header = content.lines().any(|line| line.trim() == TRASH_INFO_GROUP);
        let mut in_group = !has_group_header;

        let mut original_path = None;
        let mut deletion_date = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_group = trimmed == TRASH_INFO_GROUP;
                continue;
            }
            if !in_group {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            match key.trim() {
                PATH_KEY if original_path.is_none() => {
                    original_path = Some(decode_path(value.trim()));
                }
                DELETION_DATE_KEY if deletion_date.is_none() => {
                    deletion_date = Some(value.trim());
                }
                _ => {}
            }
        }

        let deletion_date =
            parse_deletion_date(deletion_date.ok_or(TrashInfoError::MissingDeletionDate)?)?;

        Ok(Self {
            original_path,
            deletion_date,
        })
    }
}

/// Parses a `DeletionDate` value in `YYYY-MM-DDThh:mm:ss` form.
pub fn parse_deletion_date(value: &str) -> Result<NaiveDateTime, TrashInfoError> {
    NaiveDateTime::parse_from_str(value, DELETION_DATE_FORMAT).map_err(|e| {
        TrashInfoError::InvalidDeletionDate {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Formats a timestamp the way it appears in a record.
pub fn format_deletion_date(date: &NaiveDateTime) -> String {
    date.format(DELETION_DATE_FORMAT).to_string()
}

fn decode_path(value: &str) -> PathBuf {
    let bytes = percent_decode(value);

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        PathBuf::from(std::ffi::OsString::from_vec(bytes))
    }
    #[cfg(not(unix))]
    {
        PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Decodes `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(value: &str) -> Vec<u8> {
    let input = value.as_bytes();
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' && i + 2 < input.len() {
            if let (Some(hi), Some(lo)) = (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_full_record() {
        let info = TrashInfo::parse(
            "[Trash Info]\nPath=/home/alice/foo%20bar.txt\nDeletionDate=2004-08-31T22:32:08\n",
        )
        .unwrap();

        assert_eq!(info.deletion_date, date(2004, 8, 31, 22, 32, 8));
        assert_eq!(
            info.original_path,
            Some(PathBuf::from("/home/alice/foo bar.txt"))
        );
    }

    #[test]
    fn test_parse_headerless_record() {
        let info = TrashInfo::parse("DeletionDate=2000-01-01T00:00:00\n").unwrap();
        assert_eq!(info.deletion_date, date(2000, 1, 1, 0, 0, 0));
        assert!(info.original_path.is_none());
    }

    #[test]
    fn test_keys_outside_group_are_ignored() {
        let content = "[Other]\nDeletionDate=1999-01-01T00:00:00\n\
                       [Trash Info]\nDeletionDate=2001-02-03T04:05:06\n";
        let info = TrashInfo::parse(content).unwrap();
        assert_eq!(info.deletion_date, date(2001, 2, 3, 4, 5, 6));
    }

    #[test]
    fn test_first_deletion_date_wins() {
        let content = "[Trash Info]\nDeletionDate=2001-01-01T00:00:00\nDeletionDate=2002-01-01T00:00:00\n";
        let info = TrashInfo::parse(content).unwrap();
        assert_eq!(info.deletion_date, date(2001, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_crlf_and_whitespace_tolerated() {
        let info =
            TrashInfo::parse("[Trash Info]\r\n  DeletionDate = 2010-05-06T07:08:09 \r\n").unwrap();
        assert_eq!(info.deletion_date, date(2010, 5, 6, 7, 8, 9));
    }

    #[test]
    fn test_missing_deletion_date() {
        let err = TrashInfo::parse("[Trash Info]\nPath=/tmp/foo\n").unwrap_err();
        assert_eq!(err, TrashInfoError::MissingDeletionDate);

        assert_eq!(
            TrashInfo::parse("").unwrap_err(),
            TrashInfoError::MissingDeletionDate
        );
    }

    #[test]
    fn test_malformed_deletion_date() {
        for value in ["2000-01-01", "yesterday", "2000-13-01T00:00:00", "2000-01-01T00:00:00Z"] {
            let err = TrashInfo::parse(&format!("DeletionDate={}\n", value)).unwrap_err();
            assert!(
                matches!(err, TrashInfoError::InvalidDeletionDate { .. }),
                "{} should be rejected, got {:?}",
                value,
                err
            );
        }
    }

    #[test]
    fn test_non_utf8_bytes() {
        let err = TrashInfo::parse_bytes(&[0xff, 0xfe, b'\n']).unwrap_err();
        assert_eq!(err, TrashInfoError::NotUtf8);
    }

    #[test]
    fn test_percent_decode_keeps_malformed_escapes() {
        assert_eq!(percent_decode("a%2Fb"), b"a/b".to_vec());
        assert_eq!(percent_decode("100%"), b"100%".to_vec());
        assert_eq!(percent_decode("%zz"), b"%zz".to_vec());
        assert_eq!(percent_decode("%4"), b"%4".to_vec());
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let original = date(2024, 2, 29, 23, 59, 59);
        let text = format_deletion_date(&original);
        assert_eq!(text, "2024-02-29T23:59:59");
        assert_eq!(parse_deletion_date(&text).unwrap(), original);
    }
}
