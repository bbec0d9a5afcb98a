//! # Domain Models
//!
//! Pure types with a single dependency (`serde`). No I/O, networking, or
//! heavy logic here, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
