//! # distscan Utilities
//!
//! Shared settings and logging for distscan.
//!
//! Settings are read from `DISTSCAN_*` environment variables and can be
//! overridden on the command line. Logging is built on `tracing` and always
//! writes to stderr, so stdout stays reserved for the catalog itself.

pub mod config;
pub mod logging;

pub use config::{Settings, SettingsError};
// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, LogFormat, LogGuard, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
