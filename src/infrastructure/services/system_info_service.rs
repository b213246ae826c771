use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument};

use crate::application::ports::system_ports::SystemInfoPort;
use crate::common::errors::{ErrorContext, Result};

/// Kernel mount table for the current process
pub const PROC_SELF_MOUNTS: &str = "/proc/self/mounts";

/// Pseudo filesystems that never carry a trash directory
const VIRTUAL_FILESYSTEMS: &[&str] = &[
    "autofs",
    "binfmt_misc",
    "bpf",
    "cgroup",
    "cgroup2",
    "configfs",
    "debugfs",
    "devpts",
    "fusectl",
    "hugetlbfs",
    "mqueue",
    "proc",
    "pstore",
    "securityfs",
    "sysfs",
    "tracefs",
];

/// Reads identity and mounts from the running system
#[derive(Debug, Clone)]
pub struct SystemInfoService {
    mount_table: Option<PathBuf>,
}

impl Default for SystemInfoService {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoService {
    /// Uses `/proc/self/mounts` on Linux; reports no volumes elsewhere.
    pub fn new() -> Self {
        let mount_table = if cfg!(target_os = "linux") {
            Some(PathBuf::from(PROC_SELF_MOUNTS))
        } else {
            None
        };
        Self { mount_table }
    }

    /// Reads mounts from a fstab-formatted file instead of the kernel table.
    pub fn with_mount_table(path: impl Into<PathBuf>) -> Self {
        Self {
            mount_table: Some(path.into()),
        }
    }
}

#[async_trait]
impl SystemInfoPort for SystemInfoService {
    fn current_owner_id(&self) -> u32 {
        #[cfg(unix)]
        {
            // SAFETY: getuid has no preconditions and cannot fail
            unsafe { libc::getuid() }
        }
        #[cfg(not(unix))]
        {
            0
        }
    }

    #[instrument(skip(self))]
    async fn list_mounted_volumes(&self) -> Result<Vec<PathBuf>> {
        let Some(path) = &self.mount_table else {
            return Ok(Vec::new());
        };

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read mount table {}", path.display()))?;

        let volumes = parse_mount_table(&content);
        debug!(count = volumes.len(), "Mounted volumes listed");
        Ok(volumes)
    }
}

/// Extracts mount points from `/proc/mounts`-style content, skipping pseudo
/// filesystems. Order follows the table.
pub fn parse_mount_table(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            if VIRTUAL_FILESYSTEMS.contains(&fs_type) {
                return None;
            }
            Some(unescape_mount_field(mount_point))
        })
        .collect()
}

/// Decodes the `\ooo` octal escapes the kernel uses for blanks and backslashes.
fn unescape_mount_field(field: &str) -> PathBuf {
    let input = field.as_bytes();
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'\\' && i + 3 < input.len() {
            let digits = &input[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(input[i]);
        i += 1;
    }

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        PathBuf::from(std::ffi::OsString::from_vec(out))
    }
    #[cfg(not(unix))]
    {
        PathBuf::from(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/sda2 / ext4 rw,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev 0 0
/dev/sdb1 /media/alice/USB\\040Stick vfat rw,nosuid 0 0
/dev/sdc1 /mnt/back\\134slash ext4 rw 0 0
";

    #[test]
    fn test_parse_mount_table_skips_pseudo_filesystems() {
        let volumes = parse_mount_table(SAMPLE);
        assert_eq!(
            volumes,
            vec![
                PathBuf::from("/"),
                PathBuf::from("/run"),
                PathBuf::from("/media/alice/USB Stick"),
                PathBuf::from("/mnt/back\\slash"),
            ]
        );
    }

    #[test]
    fn test_parse_mount_table_ignores_short_lines() {
        assert!(parse_mount_table("garbage\n\n/dev/sda1 /only-two\n").is_empty());
    }

    #[test]
    fn test_unescape_keeps_invalid_sequences() {
        assert_eq!(unescape_mount_field("a\\9zz"), PathBuf::from("a\\9zz"));
        assert_eq!(unescape_mount_field("tail\\04"), PathBuf::from("tail\\04"));
    }

    #[tokio::test]
    async fn test_list_mounted_volumes_from_file() {
        let temp_dir = tempdir().unwrap();
        let table = temp_dir.path().join("mounts");
        std::fs::write(&table, SAMPLE).unwrap();

        let service = SystemInfoService::with_mount_table(&table);
        let volumes = service.list_mounted_volumes().await.unwrap();
        assert_eq!(volumes.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_mount_table_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let service = SystemInfoService::with_mount_table(temp_dir.path().join("absent"));
        assert!(service.list_mounted_volumes().await.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_current_owner_id_matches_libc() {
        let expected = unsafe { libc::getuid() };
        assert_eq!(SystemInfoService::new().current_owner_id(), expected);
    }
}
