//! Handler types.
//!
//! A handler is any async function from a buffered request to a response.
//! Handlers are stored type-erased so one router can hold many of them.
//!
//! ```rust
//! use violetear_server::handler::{handler_fn, text, HttpRequest, HttpResponse, RequestParams};
//! use http::StatusCode;
//!
//! async fn get_host(req: HttpRequest) -> HttpResponse {
//!     let ip = req.param("ip").unwrap_or("unknown").to_string();
//!     text(StatusCode::OK, ip)
//! }
//!
//! let handler = handler_fn(get_host);
//! # let _ = handler;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use violetear_router::Params;

/// Request with its body collected.
pub type HttpRequest = Request<Bytes>;

/// Response body type.
pub type ResponseBody = Full<Bytes>;

/// Response type produced by handlers.
pub type HttpResponse = Response<ResponseBody>;

/// Boxed future returned by an erased handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;

/// A type-erased handler.
pub type ErasedHandler = Arc<dyn Fn(HttpRequest) -> HandlerFuture + Send + Sync>;

/// Wraps an async function as an [`ErasedHandler`].
pub fn handler_fn<F, Fut>(f: F) -> ErasedHandler
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// Builds a `text/plain` response.
pub fn text(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Builds the plain-text response for a bare status, e.g.
/// `405 Method Not Allowed` with body `Method Not Allowed\n`.
pub fn status_response(status: StatusCode) -> HttpResponse {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    text(status, format!("{reason}\n"))
}

/// Access to path parameters captured by the router.
///
/// The dispatcher inserts [`Params`] into the request extensions before a
/// matched handler runs.
pub trait RequestParams {
    /// All captured parameters, if the request went through the router.
    fn params(&self) -> Option<&Params>;

    /// First value captured under `name`.
    fn param(&self, name: &str) -> Option<&str> {
        self.params().and_then(|params| params.get(name))
    }

    /// Remainder absorbed by a trailing wildcard.
    fn wildcard(&self) -> Option<&str> {
        self.params().and_then(Params::wildcard)
    }
}

impl<B> RequestParams for Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }
}
