use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use crate::domain::entities::trash_info::TRASHINFO_EXTENSION;

/// Subdirectory holding `.trashinfo` records
pub const INFO_DIR: &str = "info";
/// Subdirectory holding trashed content
pub const FILES_DIR: &str = "files";
/// Shared per-volume trash directory, one owner subdirectory per uid
pub const VOLUME_SHARED_TRASH_DIR: &str = ".Trash";
/// Prefix of the per-user volume trash directory (`.Trash-<uid>`)
pub const VOLUME_USER_TRASH_PREFIX: &str = ".Trash-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrashDirectoryKind {
    /// `<data-home>/Trash`
    Home,
    /// `<mount>/.Trash/<uid>`
    VolumeShared { mount_point: PathBuf, owner_id: u32 },
    /// `<mount>/.Trash-<uid>`
    VolumeUser { mount_point: PathBuf, owner_id: u32 },
}

impl TrashDirectoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            TrashDirectoryKind::Home => "home",
            TrashDirectoryKind::VolumeShared { .. } => "volume-shared",
            TrashDirectoryKind::VolumeUser { .. } => "volume-user",
        }
    }
}

/// A trash root with its `info/` and `files/` subdirectories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashDirectory {
    root: PathBuf,
    kind: TrashDirectoryKind,
}

impl TrashDirectory {
    /// Home trash rooted at `root` (already including the `Trash` component).
    pub fn home(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kind: TrashDirectoryKind::Home,
        }
    }

    pub fn volume_shared(mount_point: &Path, owner_id: u32) -> Self {
        Self {
            root: mount_point
                .join(VOLUME_SHARED_TRASH_DIR)
                .join(owner_id.to_string()),
            kind: TrashDirectoryKind::VolumeShared {
                mount_point: mount_point.to_path_buf(),
                owner_id,
            },
        }
    }

    pub fn volume_user(mount_point: &Path, owner_id: u32) -> Self {
        Self {
            root: mount_point.join(format!("{}{}", VOLUME_USER_TRASH_PREFIX, owner_id)),
            kind: TrashDirectoryKind::VolumeUser {
                mount_point: mount_point.to_path_buf(),
                owner_id,
            },
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> &TrashDirectoryKind {
        &self.kind
    }

    /// `<mount>/.Trash` for a shared volume trash, which must be a sticky
    /// directory and not a symbolic link before its owner subdirectory is used.
    pub fn shared_trash_dir(&self) -> Option<PathBuf> {
        match &self.kind {
            TrashDirectoryKind::VolumeShared { mount_point, .. } => {
                Some(mount_point.join(VOLUME_SHARED_TRASH_DIR))
            }
            _ => None,
        }
    }

    pub fn info_dir(&self) -> PathBuf {
        self.root.join(INFO_DIR)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    /// `info/<id>.trashinfo`
    pub fn info_path(&self, id: &OsStr) -> PathBuf {
        let mut name = OsString::from(id);
        name.push(".");
        name.push(TRASHINFO_EXTENSION);
        self.info_dir().join(name)
    }

    /// `files/<id>`
    pub fn content_path(&self, id: &OsStr) -> PathBuf {
        self.files_dir().join(id)
    }
}

impl Display for TrashDirectory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.root.display(), self.kind.label())
    }
}
