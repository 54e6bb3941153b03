//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that take part in an aggregate mutation accept a
//! `&mut PgConnection` so the caller can run them inside one transaction.

pub mod block_repo;
pub mod schedule_config_repo;
pub mod staff_repo;

pub use block_repo::BlockRepo;
pub use schedule_config_repo::ScheduleConfigRepo;
pub use staff_repo::StaffRepo;
