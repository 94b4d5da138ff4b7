mod config;
mod vehicle;

pub use config::{Config, Stage};
pub use vehicle::VehicleRecord;
