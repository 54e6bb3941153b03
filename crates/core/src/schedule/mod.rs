//! Scheduling configuration: operating hours, recurring breaks, temporary
//! blocks, booking policy, and the availability rules built on them.

pub mod availability;
pub mod booking;
pub mod defaults;
pub mod model;
pub mod validation;

pub use availability::{
    can_cancel, can_reschedule, is_bookable, is_holiday, is_weekday_permitted, is_within_break,
    is_within_lead_window,
};
pub use booking::{available_slots, evaluate_booking, BookingRejection, BookingRequest, BookingVerdict};
pub use model::{
    BlockCategory, BlockInput, BlockPatch, BookingPolicy, OperatingHours, ScheduleConfiguration,
    StaffMember, TemporaryBlock, WorkBreak, WorkBreakInput,
};
