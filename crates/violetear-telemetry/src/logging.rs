//! Logging setup.
//!
//! A single `fmt` layer over the registry, either JSON lines or the
//! pretty multi-line format, filtered by an [`EnvFilter`] directive
//! string such as `"info"` or `"violetear_router=trace,info"`.
//!
//! # Example
//!
//! ```rust,no_run
//! use violetear_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!(http.path = "/hosts", "serving");
//! ```

use serde::Deserialize;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Default service name attached to configurations.
pub const DEFAULT_SERVICE_NAME: &str = "violetear";

/// Logging configuration.
///
/// Deserializes from a `[log]` table; missing keys take their
/// [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "violetear_server=debug,warn").
    pub level: String,

    /// Emit JSON lines instead of the pretty format.
    pub json_format: bool,

    /// Emit span open/close events.
    pub span_events: bool,

    /// Include file and line of the callsite.
    pub file_line_info: bool,

    /// Include thread IDs.
    pub thread_ids: bool,

    /// Include the target (module path).
    pub include_target: bool,

    /// Service name for log fields.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at `debug`.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    /// Sets the filter directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Checks the configuration without installing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidConfig`] when the filter does not
    /// parse or the service name is empty.
    pub fn validate(&self) -> TelemetryResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::InvalidConfig(
                "service_name must not be empty".to_string(),
            ));
        }
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| TelemetryError::InvalidConfig(format!("invalid log level: {e}")))
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] for a bad filter and
/// [`TelemetryError::LoggingInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }
    config.validate()?;

    let filter = create_env_filter(&config.level)?;
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_thread_ids(config.thread_ids)
        .with_target(config.include_target);

    let layer = if config.json_format {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.pretty().with_filter(filter).boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service.name = %config.service_name,
        json = config.json_format,
        "logging initialized"
    );
    Ok(())
}

/// Parses filter directives into an [`EnvFilter`].
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] if the directives don't parse.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidConfig(e.to_string()))
}

/// Field names shared by request logs.
pub mod fields {
    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Matched route pattern field name.
    pub const ROUTE: &str = "http.route";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Error field name.
    pub const ERROR: &str = "error";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}

/// Logs a completed request at `info`.
///
/// The calling crate must depend on `tracing`.
#[macro_export]
macro_rules! log_request {
    ($method:expr, $path:expr, $status:expr, $duration_ms:expr, $request_id:expr) => {
        tracing::info!(
            http.method = %$method,
            http.path = %$path,
            http.status_code = $status,
            duration_ms = $duration_ms,
            request_id = %$request_id,
            "request completed"
        );
    };
}

/// Logs a failed request at `error`.
#[macro_export]
macro_rules! log_request_error {
    ($method:expr, $path:expr, $error:expr) => {
        tracing::error!(
            http.method = %$method,
            http.path = %$path,
            error = %$error,
            "request failed"
        );
    };
}
