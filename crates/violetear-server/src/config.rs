//! Server configuration.
//!
//! Built in code with [`ServerConfig::builder()`] or loaded from TOML.
//! Durations are whole seconds in TOML.
//!
//! ```toml
//! http_addr = "127.0.0.1:8080"
//! request_timeout = 10
//! verbose = true
//! request_id_header = "Request-ID"
//!
//! [default_headers]
//! X-app-epazote = "1.1"
//!
//! [log]
//! level = "debug"
//! json_format = false
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use violetear_telemetry::LogConfig;

use crate::error::{Result, ServerError};

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Server configuration.
///
/// # Example
///
/// ```rust
/// use violetear_server::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::builder()
///     .http_addr("127.0.0.1:3000")
///     .request_timeout(Duration::from_secs(5))
///     .default_header("X-app-epazote", "1.1")
///     .build();
///
/// assert_eq!(config.http_addr(), "127.0.0.1:3000");
/// assert_eq!(config.default_headers().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    keep_alive: bool,
    verbose: bool,
    default_headers: IndexMap<String, String>,
    request_id_header: Option<String>,
    log: LogConfig,
}

impl ServerConfig {
    /// Creates a configuration builder with default values.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Parses a configuration from a TOML document.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the document is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the file can't be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the HTTP address as a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// How long to wait for open connections after a shutdown signal.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Upper bound for reading a request body and for running its handler.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether HTTP/1.1 keep-alive is enabled.
    #[must_use]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Whether every request is logged at `info`.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Headers written onto every response unless the handler set them.
    #[must_use]
    pub fn default_headers(&self) -> &IndexMap<String, String> {
        &self.default_headers
    }

    /// Request header echoed back on the response, if any.
    #[must_use]
    pub fn request_id_header(&self) -> Option<&str> {
        self.request_id_header.as_deref()
    }

    /// Logging configuration.
    #[must_use]
    pub fn log(&self) -> &LogConfig {
        &self.log
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// TOML shape of [`ServerConfig`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    http_addr: String,
    shutdown_timeout: u64,
    request_timeout: u64,
    keep_alive: bool,
    verbose: bool,
    default_headers: IndexMap<String, String>,
    request_id_header: Option<String>,
    log: LogConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            keep_alive: true,
            verbose: false,
            default_headers: IndexMap::new(),
            request_id_header: None,
            log: LogConfig::default(),
        }
    }
}

impl From<ConfigFile> for ServerConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            http_addr: file.http_addr,
            shutdown_timeout: Duration::from_secs(file.shutdown_timeout),
            request_timeout: Duration::from_secs(file.request_timeout),
            keep_alive: file.keep_alive,
            verbose: file.verbose,
            default_headers: file.default_headers,
            request_id_header: file.request_id_header,
            log: file.log,
        }
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            config: ConfigFile::default().into(),
        }
    }
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Enables or disables HTTP/1.1 keep-alive.
    #[must_use]
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.config.keep_alive = enabled;
        self
    }

    /// Enables per-request `info` logging.
    #[must_use]
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    /// Adds a default response header. A later call with the same name
    /// replaces the earlier value.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request header to echo back on responses.
    #[must_use]
    pub fn request_id_header(mut self, name: impl Into<String>) -> Self {
        self.config.request_id_header = Some(name.into());
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn log(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}
