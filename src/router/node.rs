// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Compressed route trie node.
//!
//! A [`Node`] is one edge of a radix tree keyed by path bytes. Insertion lives
//! in `insert.rs` and lookup in `lookup.rs`; this file holds the node itself
//! and the structural operations both of them share: splitting a segment at a
//! common prefix and moving a frequently visited child forward among its
//! siblings.

use std::fmt;

/// Marker that starts a named parameter, `:name`.
pub(crate) const PARAM_MARKER: u8 = b':';
/// Marker that starts a trailing catch-all, `*name`.
pub(crate) const CATCH_ALL_MARKER: u8 = b'*';
/// Path separator.
pub(crate) const SLASH: u8 = b'/';

/// What kind of edge a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// A literal edge.
    #[default]
    Static,
    /// The root of a tree that was created from a single pattern.
    Root,
    /// A `:name` edge matching exactly one path segment.
    Param,
    /// A `*name` edge consuming the rest of the path.
    CatchAll,
}

/// A node of the route trie.
///
/// Invariants:
/// * if `wild_child` is set, `children` holds exactly one `Param` or
///   `CatchAll` node and `indices` is empty, except for the catch-all marker
///   node which is reached through the `/` index of its parent;
/// * otherwise `indices[i]` is the first byte of `children[i].segment`;
/// * children are ordered by descending `priority`.
#[derive(Clone)]
pub struct Node<T> {
    pub(crate) segment: Vec<u8>,
    pub(crate) kind: NodeKind,
    pub(crate) wild_child: bool,
    pub(crate) indices: Vec<u8>,
    pub(crate) children: Vec<Node<T>>,
    pub(crate) value: Option<T>,
    pub(crate) priority: u32,
    pub(crate) max_params: u8,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            segment: Vec::new(),
            kind: NodeKind::Static,
            wild_child: false,
            indices: Vec::new(),
            children: Vec::new(),
            value: None,
            priority: 0,
            max_params: 0,
        }
    }
}

impl<T> Node<T> {
    /// Creates an empty root node.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_kind(kind: NodeKind, max_params: u8) -> Self {
        Self {
            kind,
            max_params,
            ..Self::default()
        }
    }

    /// The edge label leading to this node, lossily decoded.
    pub fn segment(&self) -> String {
        String::from_utf8_lossy(&self.segment).into_owned()
    }

    /// The edge kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Number of insertions that passed through this node.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Upper bound on the parameters any path through this node captures.
    pub fn max_params(&self) -> u8 {
        self.max_params
    }

    /// Returns `true` if the sole child is a parameter or catch-all edge.
    pub fn has_wild_child(&self) -> bool {
        self.wild_child
    }

    /// First-byte dispatch table for the static children.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// The children in lookup order.
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// The value stored on this node, present only where a pattern ends.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns `true` if no pattern has been inserted.
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty() && self.children.is_empty() && self.value.is_none()
    }

    /// Splits this node at `at`, moving the tail of the segment together with
    /// the children and the value into a new sole child.
    pub(crate) fn split_at(&mut self, at: usize) {
        let suffix = self.segment.split_off(at);
        let first = suffix[0];

        let mut child = Node {
            segment: suffix,
            kind: NodeKind::Static,
            wild_child: self.wild_child,
            indices: std::mem::take(&mut self.indices),
            children: std::mem::take(&mut self.children),
            value: self.value.take(),
            priority: self.priority.saturating_sub(1),
            max_params: 0,
        };
        child.max_params = child
            .children
            .iter()
            .map(|node| node.max_params)
            .max()
            .unwrap_or(0);

        self.children = vec![child];
        self.indices = vec![first];
        self.wild_child = false;
    }

    /// Bumps the priority of the child at `index` and moves it forward past
    /// every sibling with a lower priority. Returns the child's new position.
    pub(crate) fn promote_child(&mut self, index: usize) -> usize {
        self.children[index].priority += 1;
        let priority = self.children[index].priority;

        let mut position = index;
        while position > 0 && self.children[position - 1].priority < priority {
            self.children.swap(position - 1, position);
            position -= 1;
        }

        if position != index {
            // keep the dispatch bytes aligned with the reordered children
            let moved = self.indices.remove(index);
            self.indices.insert(position, moved);
        }

        position
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("segment", &String::from_utf8_lossy(&self.segment))
            .field("kind", &self.kind)
            .field("wild_child", &self.wild_child)
            .field("indices", &String::from_utf8_lossy(&self.indices))
            .field("has_value", &self.value.is_some())
            .field("priority", &self.priority)
            .field("max_params", &self.max_params)
            .field("children", &self.children)
            .finish()
    }
}

/// Counts the parameter and catch-all markers in `path`. Validated patterns
/// never exceed [`MAX_PARAMS`](super::insert::MAX_PARAMS).
pub(crate) fn count_params(path: &[u8]) -> u8 {
    let n = path
        .iter()
        .filter(|&&b| b == PARAM_MARKER || b == CATCH_ALL_MARKER)
        .count();
    u8::try_from(n).unwrap_or(u8::MAX)
}

/// Length of the longest common prefix of `a` and `b`.
pub(crate) fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
