pub mod system_ports;
pub mod trash_ports;
