//! Database row structs and their conversions into domain types.
//!
//! Each submodule contains a `FromRow` struct matching the table row and the
//! mapping into the `barbershop_core` model it stores.

pub mod schedule;
pub mod staff;
