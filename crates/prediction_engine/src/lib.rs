//! Expiry prediction engine.
//!
//! Maps a product, a manufacture date and a shelf-life table to an expiry
//! verdict. Pure: the current date is always passed in.

pub mod engine;

pub use engine::{expiry_date, predict};
