//! # violetear
//!
//! HTTP router built on a trie of static, regex-constrained dynamic and
//! wildcard segments.
//!
//! - [`router`]: the routing tree and matcher, usable without any server
//! - [`server`]: request dispatch, default headers and a hyper server
//! - [`telemetry`]: logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use violetear::prelude::*;
//!
//! async fn get_host(req: HttpRequest) -> HttpResponse {
//!     let ip = req.param("ip").unwrap_or_default().to_string();
//!     text(StatusCode::OK, ip)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let config = ServerConfig::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .default_header("X-app-epazote", "1.1")
//!         .verbose(true)
//!         .build();
//!
//!     let mux = Mux::from_config(&config)?;
//!     mux.add_pattern(":ip", r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}")?;
//!     mux.handle_fn("/hosts/:ip", get_host, "GET, HEAD")?;
//!     mux.handle_fn("*", |_req| async { text(StatusCode::OK, "catch-all") }, "ALL")?;
//!
//!     Server::new(config, mux).run().await
//! }
//! ```
//!
//! ## Matching
//!
//! ```text
//! GET /hosts/10.0.0.1
//!   root ─► "hosts" (static) ─► ":ip" (regex) ─► terminal { GET, HEAD }
//!                                                   └─► Matched
//! ```
//!
//! At each level a static child beats the dynamic child, which beats the
//! wildcard. The first child that accepts a segment is final; a later miss
//! never retries a sibling.

pub use violetear_router as router;
pub use violetear_server as server;
pub use violetear_telemetry as telemetry;

pub use violetear_router::{Outcome, Params, Router, RouterError};
pub use violetear_server::{Mux, Server, ServerConfig, ServerError};

/// Common imports.
///
/// ```rust
/// use violetear::prelude::*;
///
/// let router: Router<&str> = Router::new();
/// router.add_route("/", "index", ALL).unwrap();
/// assert_eq!(router.len(), 1);
/// ```
pub mod prelude {
    pub use violetear_router::{
        MethodRouter, MethodSet, Outcome, Params, RouteMatch, Router, RouterError, ALL,
    };

    pub use violetear_server::handler::{handler_fn, status_response, text};
    pub use violetear_server::{
        ErasedHandler, HttpRequest, HttpResponse, Mux, RequestParams, Server, ServerConfig,
        ServerError, ShutdownSignal,
    };

    pub use violetear_telemetry::{init_logging, LogConfig};

    pub use http::StatusCode;
}
