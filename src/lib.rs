//! Expiry predictor: shelf-life based expiry prediction with a persistent
//! history.
//!
//! The binary in `main.rs` is a thin command-line front end over
//! [`service::ExpiryService`].

pub mod clock;
pub mod config;
pub mod render;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config, AppConfig};
pub use service::ExpiryService;
