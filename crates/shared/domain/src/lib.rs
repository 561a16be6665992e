//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, networking, or heavy logic—just data and simple helpers.
//!
//! * [`catalog`] — the shape of a configurable product as the catalog publishes it.
//! * [`money`] — signed amounts in minor currency units.
//! * [`config`] — application configuration structures.

pub mod catalog;
pub mod config;
pub mod money;
