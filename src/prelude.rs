//! Prelude module for the wheel_date crate.
//!
//! Re-exports the derive_more macros used by the value types.

pub use derive_more::Display;
