//! High-level router API.
//!
//! This module provides [`Router`], which owns the routing tree and the
//! named-pattern registry behind a single reader/writer lock. Every lookup
//! takes the read side and every registration takes the write side, so
//! routes may be added while requests are being matched.

use http::{Method, StatusCode};
use parking_lot::RwLock;

use crate::error::Result;
use crate::method_router::{MethodRouter, MethodSet};
use crate::node::Node;
use crate::params::Params;
use crate::patterns::PatternRegistry;
use crate::segment::{tokenize, Segment};
use crate::RouteMatch;

/// Result of matching a request against the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<H> {
    /// A terminal accepted the request method.
    Matched(RouteMatch<H>),
    /// The path reached a terminal that has no handler for the method.
    MethodNotAllowed {
        /// Methods registered explicitly at the terminal.
        allowed: Vec<Method>,
    },
    /// The path did not reach a terminal.
    NotFound,
}

impl<H> Outcome<H> {
    /// Returns the HTTP status this outcome maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Matched(_) => StatusCode::OK,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Returns true for [`Outcome::Matched`].
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Returns the route match, if any.
    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch<H>> {
        match self {
            Self::Matched(route_match) => Some(route_match),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct RouteTable<H> {
    root: Node<H>,
    patterns: PatternRegistry,
    route_count: usize,
}

/// A trie router with regex-constrained dynamic segments.
///
/// # Example
///
/// ```rust
/// use violetear_router::{Outcome, Router};
/// use http::{Method, StatusCode};
///
/// let router = Router::new();
/// router.add_pattern(":uuid", r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}").unwrap();
/// router.add_route("/:uuid", "getThing", "GET, HEAD").unwrap();
///
/// let path = "/3B96853C-EF0B-44BC-8820-A982A5756E25";
/// assert_eq!(router.match_route(&Method::GET, path).status(), StatusCode::OK);
/// assert_eq!(router.match_route(&Method::POST, path).status(), StatusCode::METHOD_NOT_ALLOWED);
/// assert_eq!(router.match_route(&Method::GET, "/nope").status(), StatusCode::NOT_FOUND);
/// ```
///
/// # Route Priority
///
/// At each path position the router tries, in order, a static child with
/// the same text, the dynamic child, and the wildcard child, and commits to
/// the first that accepts the segment. See [`Node`] for details.
#[derive(Debug)]
pub struct Router<H> {
    table: RwLock<RouteTable<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            table: RwLock::new(self.table.read().clone()),
        }
    }
}

impl<H> Router<H> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RouteTable {
                root: Node::root(),
                patterns: PatternRegistry::new(),
                route_count: 0,
            }),
        }
    }

    /// Registers the regular expression that dynamic segments named `name`
    /// must match.
    ///
    /// Routes refer to patterns by name and resolve them on every lookup,
    /// so registering before or after the routes that use it is equivalent,
    /// and re-registering a name affects routes already inserted.
    pub fn add_pattern(&self, name: &str, regex: &str) -> Result<()> {
        self.table.write().patterns.register(name, regex)
    }

    /// Inserts a route pattern with its handlers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use violetear_router::{MethodRouter, Router};
    ///
    /// let router = Router::new();
    /// router.insert("/users", MethodRouter::new().get("listUsers").post("createUser")).unwrap();
    /// assert_eq!(router.len(), 1);
    /// ```
    pub fn insert(&self, pattern: &str, methods: MethodRouter<H>) -> Result<()> {
        let segments = tokenize(pattern)?;
        let mut table = self.table.write();

        for segment in &segments {
            if let Segment::Dynamic(name) = segment {
                if !table.patterns.contains(name) {
                    tracing::debug!(
                        pattern,
                        name = %name,
                        "dynamic segment uses an unregistered pattern; any segment will match"
                    );
                }
            }
        }

        table.root.insert(&segments, methods);
        table.route_count += 1;
        tracing::debug!(pattern, "registered route");
        Ok(())
    }

    /// Registers `handler` for `pattern` under a method list such as
    /// `"GET, HEAD"`. An empty list or `"ALL"` accepts any method.
    pub fn add_route(&self, pattern: &str, handler: H, methods: &str) -> Result<()>
    where
        H: Clone,
    {
        let set = MethodSet::parse(methods)?;
        self.insert(pattern, MethodRouter::for_set(&set, handler))
    }

    /// Matches a request method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Outcome<H>
    where
        H: Clone,
    {
        let table = self.table.read();

        let outcome = match table.root.find(path, &table.patterns) {
            None => Outcome::NotFound,
            Some((methods, params)) => Self::resolve(methods, method, params),
        };

        tracing::trace!(%method, path, status = outcome.status().as_u16(), "route lookup");
        outcome
    }

    fn resolve(methods: &MethodRouter<H>, method: &Method, params: Params) -> Outcome<H>
    where
        H: Clone,
    {
        match methods.handler(method) {
            Some(handler) => Outcome::Matched(RouteMatch::new(handler.clone(), params)),
            None => Outcome::MethodNotAllowed {
                allowed: methods.allowed_methods(),
            },
        }
    }

    /// Returns true if a pattern is registered under `name`.
    #[must_use]
    pub fn has_pattern(&self, name: &str) -> bool {
        self.table.read().patterns.contains(name)
    }

    /// Returns the registered pattern names, sorted.
    #[must_use]
    pub fn pattern_names(&self) -> Vec<String> {
        let table = self.table.read();
        let mut names: Vec<String> = table.patterns.names().map(str::to_string).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of successful route registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
