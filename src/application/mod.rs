pub mod dtos;
pub mod ports;
pub mod services;

pub use ports::system_ports::{Clock, SystemInfoPort};
pub use ports::trash_ports::EmptyTrashUseCase;
