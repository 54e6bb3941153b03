pub mod availability;
pub mod schedule_config;
pub mod staff;
