//! Domain logic for barbershop scheduling configuration.
//!
//! This crate has zero internal dependencies so that both the store layer
//! and the HTTP layer can share the same model, validation rules, and
//! availability evaluator.

pub mod error;
pub mod schedule;
pub mod time;
pub mod types;
