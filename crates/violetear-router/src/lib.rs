//! Trie router with regex-constrained dynamic segments.
//!
//! Route patterns are made of `/`-separated segments:
//!
//! - **Static**: `users` matches exactly `users`
//! - **Dynamic**: `:uuid` matches one segment accepted by the regular
//!   expression registered under the name `uuid`
//! - **Wildcard**: `*` as the last segment absorbs everything that follows
//!
//! Each route binds one or more HTTP methods (or `ALL`) to a handler. The
//! handler type is generic; the router only clones it out on a match.
//!
//! # Example
//!
//! ```rust
//! use violetear_router::{Outcome, Router};
//! use http::Method;
//!
//! let router = Router::new();
//! router.add_pattern(":ip", r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}").unwrap();
//!
//! router.add_route("/hosts/:ip", "getHost", "GET, HEAD").unwrap();
//! router.add_route("/static/*", "serveFile", "GET").unwrap();
//!
//! let Outcome::Matched(route_match) = router.match_route(&Method::GET, "/hosts/10.0.0.1") else {
//!     panic!("expected a match");
//! };
//! assert_eq!(route_match.handler, "getHost");
//! assert_eq!(route_match.params.get("ip"), Some("10.0.0.1"));
//!
//! let outcome = router.match_route(&Method::GET, "/static/css/site.css");
//! assert_eq!(outcome.into_match().unwrap().params.wildcard(), Some("css/site.css"));
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!           "hosts"        "static"
//!              │               │
//!            ":ip"            "*"
//!              │               │
//!           [GET,HEAD]       [GET]
//! ```
//!
//! Matching commits to one child per level (static, then dynamic, then
//! wildcard) and never backtracks. See [`Node`] for the exact policy.

mod error;
mod method_router;
mod node;
mod params;
mod patterns;
mod router;
mod segment;

pub use error::{Result, RouterError};
pub use method_router::{MethodRouter, MethodSet, ALL};
pub use node::Node;
pub use params::Params;
pub use patterns::PatternRegistry;
pub use router::{Outcome, Router};
pub use segment::{tokenize, Segment, WILDCARD_PARAM};

/// A matched route with its handler and captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<H> {
    /// The handler bound to the request method
    pub handler: H,
    /// Values captured by dynamic and wildcard segments
    pub params: Params,
}

impl<H> RouteMatch<H> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(handler: H, params: Params) -> Self {
        Self { handler, params }
    }
}
