//! HTTP method resolution at a terminal node.
//!
//! A [`MethodRouter`] maps HTTP methods to handlers for a single route. A
//! handler registered for `ALL` answers any method that has no handler of
//! its own.

use std::str::FromStr;

use http::Method;
use indexmap::IndexMap;

use crate::error::{Result, RouterError};

/// Method-list token meaning "every method".
pub const ALL: &str = "ALL";

/// The set of methods a route is registered for.
///
/// Parsed from a comma and/or whitespace separated list such as
/// `"GET, HEAD"`. An empty list or one containing `ALL` means any method.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use violetear_router::MethodSet;
///
/// let set: MethodSet = "get,HEAD".parse().unwrap();
/// assert_eq!(set, MethodSet::Only(vec![Method::GET, Method::HEAD]));
///
/// assert_eq!("".parse::<MethodSet>().unwrap(), MethodSet::Any);
/// assert_eq!("ALL".parse::<MethodSet>().unwrap(), MethodSet::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSet {
    /// Matches any method.
    Any,
    /// Matches only the listed methods.
    Only(Vec<Method>),
}

impl MethodSet {
    /// Parses a method list. Tokens are case-insensitive.
    pub fn parse(list: &str) -> Result<Self> {
        let mut methods: Vec<Method> = Vec::new();

        let tokens = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());

        for token in tokens {
            if token.eq_ignore_ascii_case(ALL) {
                return Ok(Self::Any);
            }
            let method = Method::from_bytes(token.to_ascii_uppercase().as_bytes())
                .map_err(|_| RouterError::InvalidMethod(token.to_string()))?;
            if !methods.contains(&method) {
                methods.push(method);
            }
        }

        if methods.is_empty() {
            Ok(Self::Any)
        } else {
            Ok(Self::Only(methods))
        }
    }
}

impl FromStr for MethodSet {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Maps HTTP methods to handlers for a single route.
///
/// # Example
///
/// ```rust
/// use violetear_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new()
///     .get("listUsers")
///     .post("createUser");
///
/// assert_eq!(router.handler(&Method::GET), Some(&"listUsers"));
/// assert_eq!(router.handler(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<H> {
    /// Handlers keyed by method, in registration order
    methods: IndexMap<Method, H>,
    /// Handler registered under `ALL`
    any: Option<H>,
}

impl<H> Default for MethodRouter<H> {
    fn default() -> Self {
        Self {
            methods: IndexMap::new(),
            any: None,
        }
    }
}

impl<H> MethodRouter<H> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a method router binding every method in `set` to `handler`.
    pub fn for_set(set: &MethodSet, handler: H) -> Self
    where
        H: Clone,
    {
        match set {
            MethodSet::Any => Self::new().any(handler),
            MethodSet::Only(methods) => methods
                .iter()
                .fold(Self::new(), |router, method| {
                    router.method(method.clone(), handler.clone())
                }),
        }
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(self, handler: H) -> Self {
        self.method(Method::GET, handler)
    }

    /// Registers a HEAD handler.
    #[must_use]
    pub fn head(self, handler: H) -> Self {
        self.method(Method::HEAD, handler)
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(self, handler: H) -> Self {
        self.method(Method::POST, handler)
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(self, handler: H) -> Self {
        self.method(Method::PUT, handler)
    }

    /// Registers a PATCH handler.
    #[must_use]
    pub fn patch(self, handler: H) -> Self {
        self.method(Method::PATCH, handler)
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(self, handler: H) -> Self {
        self.method(Method::DELETE, handler)
    }

    /// Registers a handler for a specific method.
    #[must_use]
    pub fn method(mut self, method: Method, handler: H) -> Self {
        self.methods.insert(method, handler);
        self
    }

    /// Registers a handler for any method (`ALL`).
    #[must_use]
    pub fn any(mut self, handler: H) -> Self {
        self.any = Some(handler);
        self
    }

    /// Resolves the handler for `method`, falling back to `ALL`.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&H> {
        self.methods.get(method).or(self.any.as_ref())
    }

    /// Merges another method router into this one.
    ///
    /// Methods present in both are overwritten by `other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use violetear_router::MethodRouter;
    /// use http::Method;
    ///
    /// let mut router = MethodRouter::new().get("old").head("head");
    /// router.merge(MethodRouter::new().get("new"));
    ///
    /// assert_eq!(router.handler(&Method::GET), Some(&"new"));
    /// assert_eq!(router.handler(&Method::HEAD), Some(&"head"));
    /// ```
    pub fn merge(&mut self, other: Self) {
        self.methods.extend(other.methods);
        if other.any.is_some() {
            self.any = other.any;
        }
    }

    /// Returns true if any handler is registered, i.e. the node is a terminal.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        self.any.is_some() || !self.methods.is_empty()
    }

    /// Returns true if a handler is registered under `ALL`.
    #[must_use]
    pub fn accepts_any(&self) -> bool {
        self.any.is_some()
    }

    /// Returns the explicitly registered methods, in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.methods.keys().cloned().collect()
    }
}
