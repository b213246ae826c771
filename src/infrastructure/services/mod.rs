pub mod system_clock;
pub mod system_info_service;

pub use system_clock::{FixedClock, SystemClock};
pub use system_info_service::SystemInfoService;
