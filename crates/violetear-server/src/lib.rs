//! HTTP dispatch and server for the violetear router.
//!
//! - [`Mux`]: registers handlers on a [`violetear_router::Router`] and turns
//!   match outcomes into responses, with default headers, `404`/`405`
//!   handling and request-ID echo
//! - [`Server`]: hyper HTTP/1.1 server with graceful shutdown
//! - [`ServerConfig`]: builder and TOML configuration
//!
//! ```rust,no_run
//! use violetear_server::{handler::{text, RequestParams}, Mux, Server, ServerConfig};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), violetear_server::ServerError> {
//!     let config = ServerConfig::from_file("violetear.toml")?;
//!     violetear_telemetry::init_logging(config.log())
//!         .map_err(|e| violetear_server::ServerError::Config(e.to_string()))?;
//!
//!     let mux = Mux::from_config(&config)?;
//!     mux.add_pattern(":ip", r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}")?;
//!     mux.handle_fn(
//!         "/hosts/:ip",
//!         |req| async move {
//!             let ip = req.param("ip").unwrap_or_default().to_string();
//!             text(StatusCode::OK, ip)
//!         },
//!         "GET, HEAD",
//!     )?;
//!
//!     Server::new(config, mux).run().await
//! }
//! ```

mod config;
mod error;
pub mod handler;
mod mux;
mod server;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::{Result, ServerError};
pub use handler::{handler_fn, ErasedHandler, HttpRequest, HttpResponse, RequestParams};
pub use mux::Mux;
pub use server::Server;
pub use shutdown::{ConnectionGuard, ConnectionTracker, ShutdownSignal};
