use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::domain::entities::trash_info::TRASHINFO_EXTENSION;

/// A `info/<id>.trashinfo` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub id: OsString,
    pub path: PathBuf,
}

impl MetadataRecord {
    /// Builds a record from an `info/` entry, or `None` for foreign entries
    /// (anything not named `<id>.trashinfo` with a non-empty id).
    pub fn from_info_entry(file_name: &OsStr, path: PathBuf) -> Option<Self> {
        let id = record_id(file_name)?;
        Some(Self { id, path })
    }
}

/// A `files/<id>` entry, file or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub id: OsString,
    pub path: PathBuf,
}

impl ContentEntry {
    pub fn new(id: impl Into<OsString>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Extracts `<id>` from `<id>.trashinfo`.
pub fn record_id(file_name: &OsStr) -> Option<OsString> {
    let name = Path::new(file_name);
    if name.extension()? != TRASHINFO_EXTENSION {
        return None;
    }
    let stem = name.file_stem()?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_os_string())
}

/// Outcome of joining `info/` records with `files/` entries by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// Record and content share an id
    Matched {
        record: MetadataRecord,
        content: ContentEntry,
    },
    /// Record whose content is already gone
    DanglingMetadata { record: MetadataRecord },
    /// Content without a record
    OrphanContent { content: ContentEntry },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_from_trashinfo_name() {
        assert_eq!(
            record_id(OsStr::new("foo.trashinfo")),
            Some(OsString::from("foo"))
        );
        assert_eq!(
            record_id(OsStr::new("archive.tar.gz.trashinfo")),
            Some(OsString::from("archive.tar.gz"))
        );
    }

    #[test]
    fn test_foreign_names_have_no_id() {
        for name in [
            "not-a-trashinfo",
            "foo.trashinfo.bak",
            "foo.TRASHINFO",
            ".trashinfo",
            "foo.",
        ] {
            assert_eq!(record_id(OsStr::new(name)), None, "{}", name);
        }
    }
}
