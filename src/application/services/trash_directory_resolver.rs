use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::application::ports::system_ports::SystemInfoPort;
use crate::common::config::TrashConfig;
use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::repositories::trash_repository::TrashRepository;

/// Works out which trash directories an empty run visits
pub struct TrashDirectoryResolver {
    repository: Arc<dyn TrashRepository>,
    system_info: Arc<dyn SystemInfoPort>,
    home_trash_root: Option<PathBuf>,
    scan_volumes: bool,
}

impl TrashDirectoryResolver {
    pub fn new(
        repository: Arc<dyn TrashRepository>,
        system_info: Arc<dyn SystemInfoPort>,
        config: &TrashConfig,
    ) -> Self {
        Self {
            repository,
            system_info,
            home_trash_root: config.home_trash_root(),
            scan_volumes: config.scan_volumes,
        }
    }

    /// Existing trash directories: home trash first, then for every mounted
    /// volume except `/`, in mount order, `.Trash/<uid>` and `.Trash-<uid>`.
    ///
    /// Symlinked roots are never used. `.Trash/<uid>` is used only when
    /// `.Trash` itself is a real directory with the sticky bit set.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Vec<TrashDirectory> {
        let mut candidates = Vec::new();

        match &self.home_trash_root {
            Some(root) => candidates.push(TrashDirectory::home(root.clone())),
            None => warn!("No data home available, skipping the home trash"),
        }

        if self.scan_volumes {
            let owner_id = self.system_info.current_owner_id();
            match self.system_info.list_mounted_volumes().await {
                Ok(volumes) => {
                    for mount_point in volumes.iter().filter(|m| m.as_path() != Path::new("/")) {
                        candidates.push(TrashDirectory::volume_shared(mount_point, owner_id));
                        candidates.push(TrashDirectory::volume_user(mount_point, owner_id));
                    }
                }
                Err(e) => warn!(error = %e, "Cannot list mounted volumes, only the home trash is visited"),
            }
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for candidate in candidates {
            if !seen.insert(candidate.root().to_path_buf()) {
                continue;
            }
            if !self.repository.is_trash_directory(candidate.root()).await {
                debug!(trash_dir = %candidate, "No trash directory here");
                continue;
            }
            if let Some(shared) = candidate.shared_trash_dir() {
                if !self.repository.is_sticky_directory(&shared).await {
                    warn!(
                        trash_dir = %candidate,
                        shared = %shared.display(),
                        "Shared volume trash is a symbolic link or lacks the sticky bit, skipping it"
                    );
                    continue;
                }
            }
            debug!(trash_dir = %candidate, "Trash directory found");
            resolved.push(candidate);
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::system_ports::MockSystemInfoPort;
    use crate::common::errors::DomainError;
    use crate::domain::entities::trash_directory::TrashDirectoryKind;
    use crate::infrastructure::repositories::trash_fs_repository::TrashFsRepository;
    use tempfile::tempdir;

    fn system_info(uid: u32, volumes: Vec<PathBuf>) -> Arc<MockSystemInfoPort> {
        let mut mock = MockSystemInfoPort::new();
        mock.expect_current_owner_id().return_const(uid);
        mock.expect_list_mounted_volumes()
            .returning(move || Ok(volumes.clone()));
        Arc::new(mock)
    }

    /// Creates `<mount>/.Trash/<uid>` with a sticky `.Trash`.
    fn shared_trash(mount_point: &Path, uid: u32) -> PathBuf {
        let shared = mount_point.join(".Trash");
        std::fs::create_dir_all(shared.join(uid.to_string())).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o1777)).unwrap();
        }
        shared
    }

    async fn resolved_roots(resolver: &TrashDirectoryResolver) -> Vec<PathBuf> {
        resolver
            .resolve()
            .await
            .into_iter()
            .map(|dir| dir.root().to_path_buf())
            .collect()
    }

    fn config(data_home: &Path) -> TrashConfig {
        TrashConfig {
            data_home: Some(data_home.to_path_buf()),
            scan_volumes: true,
        }
    }

    #[tokio::test]
    async fn test_missing_home_trash_is_not_resolved() {
        let temp_dir = tempdir().unwrap();
        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(1000, Vec::new()),
            &config(&temp_dir.path().join(".local")),
        );

        assert!(resolver.resolve().await.is_empty());
    }

    #[tokio::test]
    async fn test_home_first_then_volumes_in_order() {
        let temp_dir = tempdir().unwrap();
        let data_home = temp_dir.path().join(".local");
        let disk_a = temp_dir.path().join("media/disk-a");
        let disk_b = temp_dir.path().join("media/disk-b");
        std::fs::create_dir_all(data_home.join("Trash")).unwrap();
        std::fs::create_dir_all(disk_a.join(".Trash-123")).unwrap();
        shared_trash(&disk_b, 123);
        std::fs::create_dir_all(disk_b.join(".Trash-123")).unwrap();
        // another user's trash is not ours
        std::fs::create_dir_all(disk_a.join(".Trash/456")).unwrap();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(123, vec![disk_b.clone(), disk_a.clone()]),
            &config(&data_home),
        );

        assert_eq!(
            resolved_roots(&resolver).await,
            vec![
                data_home.join("Trash"),
                disk_b.join(".Trash/123"),
                disk_b.join(".Trash-123"),
                disk_a.join(".Trash-123"),
            ]
        );
    }

    #[tokio::test]
    async fn test_root_filesystem_and_duplicates_skipped() {
        let temp_dir = tempdir().unwrap();
        let disk = temp_dir.path().join("disk");
        std::fs::create_dir_all(disk.join(".Trash-7")).unwrap();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(7, vec![PathBuf::from("/"), disk.clone(), disk.clone()]),
            &TrashConfig {
                data_home: None,
                scan_volumes: true,
            },
        );

        let resolved = resolver.resolve().await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].kind(),
            &TrashDirectoryKind::VolumeUser {
                mount_point: disk,
                owner_id: 7
            }
        );
    }

    #[tokio::test]
    async fn test_volume_listing_failure_keeps_home_trash() {
        let temp_dir = tempdir().unwrap();
        let data_home = temp_dir.path().join(".local");
        std::fs::create_dir_all(data_home.join("Trash")).unwrap();

        let mut mock = MockSystemInfoPort::new();
        mock.expect_current_owner_id().return_const(1000u32);
        mock.expect_list_mounted_volumes()
            .returning(|| Err(DomainError::internal_error("Volume", "mount table unavailable")));

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            Arc::new(mock),
            &config(&data_home),
        );

        let resolved = resolver.resolve().await;
        assert_eq!(resolved, vec![TrashDirectory::home(data_home.join("Trash"))]);
    }

    #[tokio::test]
    async fn test_volumes_not_consulted_when_disabled() {
        let temp_dir = tempdir().unwrap();
        let data_home = temp_dir.path().join(".local");
        std::fs::create_dir_all(data_home.join("Trash")).unwrap();

        let mut mock = MockSystemInfoPort::new();
        mock.expect_current_owner_id().never();
        mock.expect_list_mounted_volumes().never();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            Arc::new(mock),
            &TrashConfig {
                data_home: Some(data_home.clone()),
                scan_volumes: false,
            },
        );

        assert_eq!(resolver.resolve().await.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_shared_trash_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let disk = temp_dir.path().join("disk");
        // the link target is a sticky directory holding a uid subdirectory
        let victim = shared_trash(&temp_dir.path().join("victim"), 123);
        std::fs::create_dir_all(&disk).unwrap();
        std::os::unix::fs::symlink(&victim, disk.join(".Trash")).unwrap();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(123, vec![disk]),
            &TrashConfig {
                data_home: None,
                scan_volumes: true,
            },
        );

        assert!(resolved_roots(&resolver).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shared_trash_without_sticky_bit_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let disk = temp_dir.path().join("disk");
        std::fs::create_dir_all(disk.join(".Trash/123")).unwrap();
        std::fs::create_dir_all(disk.join(".Trash-123")).unwrap();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(123, vec![disk.clone()]),
            &TrashConfig {
                data_home: None,
                scan_volumes: true,
            },
        );

        assert_eq!(resolved_roots(&resolver).await, vec![disk.join(".Trash-123")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_user_volume_trash_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let disk = temp_dir.path().join("disk");
        let elsewhere = temp_dir.path().join("elsewhere");
        std::fs::create_dir_all(elsewhere.join("files")).unwrap();
        std::fs::create_dir_all(&disk).unwrap();
        std::os::unix::fs::symlink(&elsewhere, disk.join(".Trash-123")).unwrap();

        let resolver = TrashDirectoryResolver::new(
            Arc::new(TrashFsRepository::new()),
            system_info(123, vec![disk]),
            &TrashConfig {
                data_home: None,
                scan_volumes: true,
            },
        );

        assert!(resolved_roots(&resolver).await.is_empty());
    }
}
