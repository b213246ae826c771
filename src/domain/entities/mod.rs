pub mod selection;
pub mod trash_directory;
pub mod trash_entry;
pub mod trash_info;
