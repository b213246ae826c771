pub mod trash_fs_repository;

pub use trash_fs_repository::TrashFsRepository;
