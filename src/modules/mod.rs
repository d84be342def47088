pub mod accounts;
pub mod devices;
pub mod identity;
pub mod metrics;
pub mod vault;
