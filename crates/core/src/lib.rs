//! Core utilities shared across the renderer workspace:
//! - Error types and result aliases for the platform/app layers
//! - Logging initialization
//! - Frame timing

mod error;
mod logging;
mod timer;

pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::Timer;
