// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Route pattern insertion.
//!
//! Patterns are validated up front so that every structural error is caught
//! before the tree is touched. The only failures that can happen during the
//! walk itself are conflicts with routes that were inserted earlier and
//! duplicates.

use crate::error::{RouteError, RouteResult};

use super::node::{
    common_prefix, count_params, Node, NodeKind, CATCH_ALL_MARKER, PARAM_MARKER, SLASH,
};

/// Most wildcards a single pattern may bind.
pub const MAX_PARAMS: usize = u8::MAX as usize;

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn is_marker(b: u8) -> bool {
    b == PARAM_MARKER || b == CATCH_ALL_MARKER
}

/// Checks the syntax of a route pattern without touching any tree.
///
/// # Arguments
///
/// * `pattern` - The path pattern, e.g. `/users/:id/files/*path`.
///
/// # Returns
///
/// * `Ok(())` - If the pattern is well formed.
/// * `Err(RouteError)` - The first syntax problem found, scanning left to right.
pub fn validate_pattern(pattern: &str) -> RouteResult<()> {
    let path = pattern.as_bytes();
    if path.first() != Some(&SLASH) {
        return Err(RouteError::InvalidPath {
            pattern: pattern.to_string(),
        });
    }

    let mut names: Vec<&[u8]> = Vec::new();
    let mut i = 0;
    while i < path.len() {
        let c = path[i];
        if !is_marker(c) {
            i += 1;
            continue;
        }

        let end = wildcard_end(path, i, pattern)?;
        if end - i < 2 {
            return Err(RouteError::UnnamedWildcard {
                pattern: pattern.to_string(),
            });
        }

        let name = &path[i + 1..end];
        if names.contains(&name) {
            return Err(RouteError::DuplicateParam {
                name: lossy(name),
                pattern: pattern.to_string(),
            });
        }
        names.push(name);

        if c == CATCH_ALL_MARKER {
            if end != path.len() {
                return Err(RouteError::WildcardMisplaced {
                    pattern: pattern.to_string(),
                });
            }
            if path[i - 1] != SLASH {
                return Err(RouteError::WildcardMissingSlash {
                    pattern: pattern.to_string(),
                });
            }
        }

        i = end;
    }

    if names.len() > MAX_PARAMS {
        return Err(RouteError::TooManyParams {
            count: names.len(),
            max: MAX_PARAMS,
            pattern: pattern.to_string(),
        });
    }

    Ok(())
}

/// Finds the end of the wildcard starting at `start`: the next `/` or the end
/// of the path. A second marker before that point is an error.
fn wildcard_end(path: &[u8], start: usize, pattern: &str) -> RouteResult<usize> {
    let mut end = start + 1;
    while end < path.len() && path[end] != SLASH {
        if is_marker(path[end]) {
            return Err(RouteError::InvalidWildcard {
                segment: lossy(&path[start..]),
                pattern: pattern.to_string(),
            });
        }
        end += 1;
    }
    Ok(end)
}

impl<T> Node<T> {
    /// Inserts `pattern` into the tree rooted at this node and stores `value`
    /// where the pattern ends.
    ///
    /// # Arguments
    ///
    /// * `pattern` - A path pattern beginning with `/`. It may contain `:name`
    ///   parameters and a single trailing `*name` catch-all.
    /// * `value` - The value to store for the pattern.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the pattern was inserted.
    /// * `Err(RouteError)` - If the pattern is malformed, already present, or
    ///   conflicts with a wildcard registered at the same position.
    pub fn add(&mut self, pattern: &str, value: T) -> RouteResult<()> {
        validate_pattern(pattern)?;

        let mut path = pattern.as_bytes();
        let mut num_params = count_params(path);
        self.priority += 1;

        if self.segment.is_empty() && self.children.is_empty() {
            self.insert_wildcard_path(path, pattern, value)?;
            self.kind = NodeKind::Root;
            return Ok(());
        }

        let mut node = self;
        loop {
            node.max_params = node.max_params.max(num_params);

            let common = common_prefix(path, &node.segment);
            if common < node.segment.len() {
                node.split_at(common);
            }

            if common == path.len() {
                if node.value.is_some() {
                    return Err(RouteError::DuplicateRoute {
                        pattern: pattern.to_string(),
                    });
                }
                node.value = Some(value);
                return Ok(());
            }

            path = &path[common..];

            if node.wild_child {
                node = &mut node.children[0];
                node.priority += 1;
                node.max_params = node.max_params.max(num_params);
                num_params = num_params.saturating_sub(1);

                // the wildcard must match in full and end where the segment ends
                let len = node.segment.len();
                if path.starts_with(&node.segment) && (len >= path.len() || path[len] == SLASH) {
                    continue;
                }

                return Err(RouteError::WildcardConflict {
                    segment: lossy(path),
                    pattern: pattern.to_string(),
                });
            }

            let next = path[0];

            if node.kind == NodeKind::Param && next == SLASH && node.children.len() == 1 {
                node = &mut node.children[0];
                node.priority += 1;
                continue;
            }

            if let Some(index) = node.indices.iter().position(|&b| b == next) {
                let index = node.promote_child(index);
                node = &mut node.children[index];
                continue;
            }

            if !is_marker(next) {
                node.indices.push(next);
                node.children.push(Node::with_kind(NodeKind::Static, num_params));
                let last = node.children.len() - 1;
                let index = node.promote_child(last);
                node = &mut node.children[index];
            }

            return node.insert_wildcard_path(path, pattern, value);
        }
    }

    /// Builds the chain of nodes for the rest of a pattern below this node,
    /// creating parameter and catch-all edges as the markers appear.
    fn insert_wildcard_path(&mut self, path: &[u8], pattern: &str, value: T) -> RouteResult<()> {
        let mut num_params = count_params(path);
        let mut node = self;
        let mut offset = 0;
        let mut i = 0;

        while num_params > 0 && i < path.len() {
            let c = path[i];
            if !is_marker(c) {
                i += 1;
                continue;
            }

            let end = wildcard_end(path, i, pattern)?;

            if !node.children.is_empty() {
                return Err(RouteError::WildcardConflict {
                    segment: lossy(&path[i..end]),
                    pattern: pattern.to_string(),
                });
            }

            if end - i < 2 {
                return Err(RouteError::UnnamedWildcard {
                    pattern: pattern.to_string(),
                });
            }

            if c == PARAM_MARKER {
                if i > 0 {
                    node.segment = path[offset..i].to_vec();
                    offset = i;
                }

                node.children = vec![Node::with_kind(NodeKind::Param, num_params)];
                node.wild_child = true;
                node = &mut node.children[0];
                node.priority += 1;
                num_params -= 1;

                if end < path.len() {
                    node.segment = path[offset..end].to_vec();
                    offset = end;

                    let mut child = Node::with_kind(NodeKind::Static, num_params);
                    child.priority = 1;
                    node.children = vec![child];
                    node = &mut node.children[0];
                }

                i = end;
                continue;
            }

            if end != path.len() || num_params > 1 {
                return Err(RouteError::WildcardMisplaced {
                    pattern: pattern.to_string(),
                });
            }

            if node.segment.last() == Some(&SLASH) {
                return Err(RouteError::WildcardConflict {
                    segment: lossy(&path[i..]),
                    pattern: pattern.to_string(),
                });
            }

            if i == 0 || path[i - 1] != SLASH {
                return Err(RouteError::WildcardMissingSlash {
                    pattern: pattern.to_string(),
                });
            }

            let slash = i - 1;
            node.segment = path[offset..slash].to_vec();

            let leaf = Node {
                segment: path[slash..].to_vec(),
                kind: NodeKind::CatchAll,
                value: Some(value),
                priority: 1,
                max_params: 1,
                ..Node::default()
            };

            let mut marker = Node::with_kind(NodeKind::CatchAll, 1);
            marker.wild_child = true;
            marker.priority = 1;
            marker.children = vec![leaf];

            node.children = vec![marker];
            node.indices = vec![SLASH];
            return Ok(());
        }

        node.segment = path[offset..].to_vec();
        node.value = Some(value);
        Ok(())
    }
}
