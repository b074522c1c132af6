//! HTTP/1.1 server.
//!
//! Accepts TCP connections, serves each on its own task with hyper, and
//! hands every request to a shared [`Mux`]. On shutdown the listener
//! stops accepting, open connections are asked to finish their current
//! request, and the server waits for them up to the configured timeout.
//!
//! ```rust,no_run
//! use violetear_server::{handler::text, Mux, Server, ServerConfig};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), violetear_server::ServerError> {
//!     let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
//!     let mux = Mux::from_config(&config)?;
//!     mux.handle_fn("/", |_req| async { text(StatusCode::OK, "hello") }, "GET")?;
//!
//!     Server::new(config, mux).run().await
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::handler::{status_response, HttpResponse};
use crate::mux::Mux;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// HTTP server around a [`Mux`].
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    mux: Arc<Mux>,
}

impl Server {
    /// Creates a server.
    #[must_use]
    pub fn new(config: ServerConfig, mux: Mux) -> Self {
        Self::with_shared_mux(config, Arc::new(mux))
    }

    /// Creates a server over a mux that is also held elsewhere, so routes
    /// can still be registered while it runs.
    #[must_use]
    pub fn with_shared_mux(config: ServerConfig, mux: Arc<Mux>) -> Self {
        Self { config, mux }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The request multiplexer.
    #[must_use]
    pub fn mux(&self) -> &Arc<Mux> {
        &self.mux
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is invalid or in use.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("Invalid address '{}': {e}", self.config.http_addr()))
        })?;
        TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("Failed to bind to {addr}: {e}")))
    }

    /// Runs until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address can't be bound.
    pub async fn run(self) -> Result<()> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Runs until `shutdown` is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if the address can't be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// is triggered.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener's address can't be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.mux.router().len(), "listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();
        let stop = shutdown.recv();
        tokio::pin!(stop);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let guard = tracker.track();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.serve_connection(stream, shutdown).await {
                                tracing::error!(remote_addr = %remote_addr, error = %e, "connection error");
                            }
                            drop(guard);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = &mut stop => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }
        drop(listener);

        let timeout = server.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active(),
            timeout_secs = timeout.as_secs(),
            "draining connections"
        );
        if tokio::time::timeout(timeout, tracker.wait_idle()).await.is_err() {
            tracing::warn!(active = tracker.active(), "shutdown timeout reached");
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        shutdown: ShutdownSignal,
    ) -> std::result::Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(req).await) }
        });

        let conn = http1::Builder::new()
            .keep_alive(self.config.keep_alive())
            .serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> HttpResponse {
        let timeout = self.config.request_timeout();
        let (parts, body) = req.into_parts();
        let request_id = self.mux.request_id(&parts.headers);

        let body = match tokio::time::timeout(timeout, body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => {
                violetear_telemetry::log_request_error!(parts.method, parts.uri.path(), e);
                return self.error_response(StatusCode::BAD_REQUEST, request_id);
            }
            Err(_) => {
                tracing::warn!(http.path = %parts.uri.path(), "request body timed out");
                return self.error_response(StatusCode::REQUEST_TIMEOUT, request_id);
            }
        };

        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();
        let req = Request::<Bytes>::from_parts(parts, body);

        match tokio::time::timeout(timeout, self.mux.dispatch(req)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(http.method = %method, http.path = %path, "handler timed out");
                self.error_response(StatusCode::GATEWAY_TIMEOUT, request_id)
            }
        }
    }

    /// Builds a response the server produces without reaching a handler.
    fn error_response(
        &self,
        status: StatusCode,
        request_id: Option<(HeaderName, HeaderValue)>,
    ) -> HttpResponse {
        let mut response = status_response(status);
        self.mux.decorate(&mut response, request_id);
        response
    }
}

