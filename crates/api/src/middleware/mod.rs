//! Request extractors shared by the handlers.

pub mod concurrency;
pub mod payload;
