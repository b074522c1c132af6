//! Logging for violetear services.
//!
//! Wraps `tracing-subscriber` setup behind a serializable [`LogConfig`]
//! so the same `[log]` table can sit in a server's TOML config.
//!
//! ```rust,no_run
//! use violetear_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production().with_service_name("hosts"))?;
//! # Ok::<(), violetear_telemetry::TelemetryError>(())
//! ```

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, DEFAULT_SERVICE_NAME};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
