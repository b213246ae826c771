pub mod correlation_service;
pub mod expiry_policy;
