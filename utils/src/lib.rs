//! Shared utilities for the Assize workspace.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat, LoggingError};
pub use stats::StatsCounter;
pub use time::{format_duration, parse_duration};
