//! Request dispatch.
//!
//! [`Mux`] owns a [`Router`] of erased handlers and turns each match
//! outcome into a response: matched requests run their handler with the
//! captured [`Params`](violetear_router::Params) in the request
//! extensions, misses get `404`, and method mismatches get `405` with an
//! `Allow` header. Default headers and the request-ID echo are applied
//! to every response afterwards.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use http::header::{HeaderName, HeaderValue, ALLOW};
use http::{HeaderMap, Method, StatusCode};
use violetear_router::{Outcome, RouteMatch, Router};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::handler::{handler_fn, status_response, ErasedHandler, HttpRequest, HttpResponse};

/// HTTP request multiplexer.
///
/// # Example
///
/// ```rust
/// use violetear_server::{handler::text, Mux};
/// use http::{Request, StatusCode};
/// use bytes::Bytes;
///
/// # tokio_test::block_on(async {
/// let mut mux = Mux::new();
/// mux.set_header("X-app-epazote", "1.1").unwrap();
/// mux.add_pattern(":ip", r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}").unwrap();
/// mux.handle_fn("/hosts/:ip", |_req| async { text(StatusCode::OK, "host") }, "GET")
///     .unwrap();
///
/// let req = Request::get("/hosts/10.0.0.1").body(Bytes::new()).unwrap();
/// let res = mux.dispatch(req).await;
/// assert_eq!(res.status(), StatusCode::OK);
/// assert_eq!(res.headers()["X-app-epazote"], "1.1");
/// # });
/// ```
pub struct Mux {
    router: Router<ErasedHandler>,
    default_headers: HeaderMap,
    request_id_header: Option<HeaderName>,
    not_found: Option<ErasedHandler>,
    not_allowed: Option<ErasedHandler>,
    verbose: bool,
}

impl Mux {
    /// Creates an empty multiplexer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            default_headers: HeaderMap::new(),
            request_id_header: None,
            not_found: None,
            not_allowed: None,
            verbose: false,
        }
    }

    /// Creates a multiplexer with the headers, request-ID header and
    /// verbosity from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidHeader`] for a header name or value
    /// that is not valid HTTP.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut mux = Self::new();
        for (name, value) in config.default_headers() {
            mux.set_header(name, value)?;
        }
        if let Some(name) = config.request_id_header() {
            mux.set_request_id_header(name)?;
        }
        mux.set_verbose(config.verbose());
        Ok(mux)
    }

    /// Registers a named regular expression for dynamic segments.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Router`] if the expression does not compile.
    pub fn add_pattern(&self, name: &str, regex: &str) -> Result<()> {
        Ok(self.router.add_pattern(name, regex)?)
    }

    /// Registers `handler` for `pattern` under a comma or space separated
    /// method list. An empty list or `ALL` accepts any method.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Router`] for a malformed pattern or an
    /// unknown method token.
    pub fn handle(&self, pattern: &str, handler: ErasedHandler, methods: &str) -> Result<()> {
        Ok(self.router.add_route(pattern, handler, methods)?)
    }

    /// Registers an async function as the handler for `pattern`.
    ///
    /// # Errors
    ///
    /// Same as [`Mux::handle`].
    pub fn handle_fn<F, Fut>(&self, pattern: &str, f: F, methods: &str) -> Result<()>
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HttpResponse> + Send + 'static,
    {
        self.handle(pattern, handler_fn(f), methods)
    }

    /// Adds a header written onto every response the handler didn't set
    /// itself. Setting the same name again replaces the value.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidHeader`] if the name or value is not
    /// valid HTTP.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name = parse_header_name(name)?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| ServerError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.default_headers.insert(header_name, header_value);
        Ok(())
    }

    /// Copies the request header `name`, when present, onto the response.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidHeader`] if `name` is not a valid
    /// header name.
    pub fn set_request_id_header(&mut self, name: &str) -> Result<()> {
        self.request_id_header = Some(parse_header_name(name)?);
        Ok(())
    }

    /// Logs every request at `info` when enabled.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Replaces the default `404` response.
    pub fn not_found_handler(&mut self, handler: ErasedHandler) {
        self.not_found = Some(handler);
    }

    /// Replaces the default `405` response. The `Allow` header is still
    /// added unless the handler sets one.
    pub fn not_allowed_handler(&mut self, handler: ErasedHandler) {
        self.not_allowed = Some(handler);
    }

    /// The underlying router.
    #[must_use]
    pub fn router(&self) -> &Router<ErasedHandler> {
        &self.router
    }

    /// Routes `req` and produces its response.
    pub async fn dispatch(&self, mut req: HttpRequest) -> HttpResponse {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let request_id = self.request_id(req.headers());

        let mut response = match self.router.match_route(&method, &path) {
            Outcome::Matched(RouteMatch { handler, params }) => {
                req.extensions_mut().insert(params);
                handler(req).await
            }
            Outcome::MethodNotAllowed { allowed } => {
                let mut response = match &self.not_allowed {
                    Some(handler) => handler(req).await,
                    None => status_response(StatusCode::METHOD_NOT_ALLOWED),
                };
                if let Some(allow) = allow_header(&allowed) {
                    response.headers_mut().entry(ALLOW).or_insert(allow);
                }
                response
            }
            Outcome::NotFound => match &self.not_found {
                Some(handler) => handler(req).await,
                None => status_response(StatusCode::NOT_FOUND),
            },
        };

        let request_id = self.decorate(&mut response, request_id);

        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(http.method = %method, http.path = %path, http.status_code = status, "dispatched");
        if self.verbose {
            violetear_telemetry::log_request!(
                method,
                path,
                status,
                duration_ms,
                request_id.as_deref().unwrap_or("-")
            );
        }

        response
    }

    /// Picks the configured request-id header out of the request headers.
    pub(crate) fn request_id(&self, headers: &HeaderMap) -> Option<(HeaderName, HeaderValue)> {
        let name = self.request_id_header.as_ref()?;
        Some((name.clone(), headers.get(name)?.clone()))
    }

    /// Adds the default headers and the echoed request id to a response.
    ///
    /// Headers the response already carries are left alone. Returns the
    /// request id as text for logging.
    pub(crate) fn decorate(
        &self,
        response: &mut HttpResponse,
        request_id: Option<(HeaderName, HeaderValue)>,
    ) -> Option<String> {
        let headers = response.headers_mut();
        for (name, value) in &self.default_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        request_id.map(|(name, value)| {
            let display = value.to_str().unwrap_or_default().to_owned();
            headers.entry(name).or_insert(value);
            display
        })
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("routes", &self.router.len())
            .field("patterns", &self.router.pattern_names())
            .field("default_headers", &self.default_headers)
            .field("request_id_header", &self.request_id_header)
            .field("custom_not_found", &self.not_found.is_some())
            .field("custom_not_allowed", &self.not_allowed.is_some())
            .field("verbose", &self.verbose)
            .finish()
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ServerError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn allow_header(allowed: &[Method]) -> Option<HeaderValue> {
    if allowed.is_empty() {
        return None;
    }
    let joined = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&joined).ok()
}
