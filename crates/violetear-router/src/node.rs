//! Routing tree nodes.
//!
//! Every node stands for one path position. A node has any number of
//! static children, at most one dynamic child and at most one wildcard
//! child. A node with handlers is a terminal.
//!
//! Matching walks the tree one segment at a time and commits to the first
//! child that accepts the segment, in this order:
//!
//! 1. static child with identical text
//! 2. dynamic child whose named pattern accepts the whole segment
//! 3. wildcard child, which absorbs the segment and everything after it
//!
//! A dead end deeper down is a miss. The walk never returns to try a lower
//! priority child at an earlier level, so `/a/b/c` against `/a/b` and
//! `/a/*` is a miss even though the wildcard alone would have matched.

use crate::method_router::MethodRouter;
use crate::params::Params;
use crate::patterns::PatternRegistry;
use crate::segment::{Segment, WILDCARD_PARAM};

/// A node in the routing tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    /// The segment this node matches
    segment: Segment,

    /// Handlers for this node (empty unless it is a terminal)
    methods: MethodRouter<H>,

    /// Static children, sorted by segment text for binary search
    static_children: Vec<Node<H>>,

    /// Dynamic child (at most one per node)
    dynamic_child: Option<Box<Node<H>>>,

    /// Wildcard child (at most one per node, never has children)
    wildcard_child: Option<Box<Node<H>>>,
}

impl<H> Node<H> {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            methods: MethodRouter::new(),
            static_children: Vec::new(),
            dynamic_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node, which stands for the empty path.
    #[must_use]
    pub fn root() -> Self {
        Self::new(Segment::Static(String::new()))
    }

    /// Returns the segment this node matches.
    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Returns the handlers registered at this node.
    #[must_use]
    pub fn methods(&self) -> &MethodRouter<H> {
        &self.methods
    }

    /// Returns true if this node carries at least one handler.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.methods.has_any_method()
    }

    /// Inserts a tokenized route, merging `methods` into its terminal.
    ///
    /// Shared prefixes reuse existing nodes. An existing dynamic child is
    /// always reused; if it was bound to a different pattern name it is
    /// rebound to `name` for all later matches.
    pub fn insert(&mut self, segments: &[Segment], methods: MethodRouter<H>) {
        let mut node = self;

        for segment in segments {
            node = match segment {
                Segment::Static(text) => node.static_child_mut(text),
                Segment::Dynamic(name) => node.dynamic_child_mut(name),
                Segment::Wildcard => {
                    node = node.wildcard_child_mut();
                    break;
                }
            };
        }

        node.methods.merge(methods);
    }

    fn static_child_mut(&mut self, text: &str) -> &mut Self {
        let index = match self.find_static_index(text) {
            Ok(index) => index,
            Err(index) => {
                self.static_children
                    .insert(index, Self::new(Segment::Static(text.to_string())));
                index
            }
        };
        &mut self.static_children[index]
    }

    fn dynamic_child_mut(&mut self, name: &str) -> &mut Self {
        let child = self
            .dynamic_child
            .get_or_insert_with(|| Box::new(Self::new(Segment::Dynamic(name.to_string()))));

        if let Segment::Dynamic(bound) = &mut child.segment {
            if bound != name {
                tracing::warn!(
                    previous = %bound,
                    current = name,
                    "dynamic segment rebound to a different pattern"
                );
                *bound = name.to_string();
            }
        }

        &mut **child
    }

    fn wildcard_child_mut(&mut self) -> &mut Self {
        &mut **self
            .wildcard_child
            .get_or_insert_with(|| Box::new(Self::new(Segment::Wildcard)))
    }

    fn find_static_index(&self, text: &str) -> Result<usize, usize> {
        self.static_children
            .binary_search_by(|child| child.segment.as_str().cmp(text))
    }

    fn find_static_child(&self, text: &str) -> Option<&Self> {
        self.find_static_index(text)
            .ok()
            .map(|index| &self.static_children[index])
    }

    /// Walks `path` down the tree and returns the terminal it lands on.
    ///
    /// One trailing `/` is ignored and empty segments are skipped, so
    /// `/root/` and `/root` land on the same node. Returns `None` when the
    /// walk dead-ends or stops on a node without handlers.
    #[must_use]
    pub fn find(&self, path: &str, patterns: &PatternRegistry) -> Option<(&MethodRouter<H>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let mut node = self;

        for (index, &segment) in segments.iter().enumerate() {
            if let Some(child) = node.find_static_child(segment) {
                node = child;
                continue;
            }

            if let Some(child) = node.dynamic_child.as_deref() {
                let name = child.segment.as_str();
                if patterns.is_match(name, segment) {
                    params.push(name, segment);
                    node = child;
                    continue;
                }
            }

            if let Some(child) = node.wildcard_child.as_deref() {
                params.push(WILDCARD_PARAM, segments[index..].join("/"));
                node = child;
                break;
            }

            return None;
        }

        node.is_terminal().then_some((&node.methods, params))
    }
}
