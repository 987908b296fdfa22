// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request path lookup.

use super::node::{Node, NodeKind, SLASH};
use super::params::PathParameters;

/// Outcome of walking a tree for one request path.
#[derive(Debug, PartialEq, Eq)]
pub struct Lookup<'a, T> {
    /// The value stored for the matched pattern.
    pub value: Option<&'a T>,
    /// Set when no pattern matched but one differs from the request path
    /// only by a trailing slash.
    pub must_redirect: bool,
}

impl<'a, T> Lookup<'a, T> {
    fn found(value: &'a T) -> Self {
        Self {
            value: Some(value),
            must_redirect: false,
        }
    }

    fn miss(must_redirect: bool) -> Self {
        Self {
            value: None,
            must_redirect,
        }
    }

    /// Returns `true` if a pattern matched.
    pub fn is_match(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Node<T> {
    /// Finds the value stored for `path`.
    ///
    /// Captured parameters are appended to `params` in pattern order. On a
    /// miss, anything captured during the walk is removed again so the buffer
    /// holds exactly what it held before the call, and the redirect hint is
    /// set only if the same path with a trailing slash added or removed
    /// would match.
    ///
    /// # Arguments
    ///
    /// * `path` - The request path.
    /// * `params` - Caller owned capture buffer.
    ///
    /// # Returns
    ///
    /// A [`Lookup`] holding the value, if any, and the redirect hint.
    pub fn get<'a>(&'a self, path: &str, params: &mut PathParameters) -> Lookup<'a, T> {
        let start = params.len();
        if let Some(value) = self.walk_path(path.as_bytes(), params) {
            return Lookup::found(value);
        }

        params.truncate(start);
        Lookup::miss(self.matches_with_slash_toggled(path))
    }

    fn matches_with_slash_toggled(&self, path: &str) -> bool {
        if path.len() <= 1 {
            return false;
        }

        let corrected = match path.strip_suffix('/') {
            Some(trimmed) => trimmed.to_string(),
            None => format!("{path}/"),
        };
        let mut scratch = PathParameters::new();
        self.walk_path(corrected.as_bytes(), &mut scratch).is_some()
    }

    fn walk_path<'a>(&'a self, mut path: &[u8], params: &mut PathParameters) -> Option<&'a T> {
        let mut node = self;

        loop {
            let segment = node.segment.as_slice();

            if path.len() > segment.len() {
                if !path.starts_with(segment) {
                    return None;
                }
                path = &path[segment.len()..];

                if !node.wild_child {
                    let next = path[0];
                    let index = node.indices.iter().position(|&b| b == next)?;
                    node = &node.children[index];
                    continue;
                }

                node = &node.children[0];
                reserve_for(params, node.max_params);

                match node.kind {
                    NodeKind::Param => {
                        let end = path.iter().position(|&b| b == SLASH).unwrap_or(path.len());
                        params.push(&node.segment[1..], &path[..end]);

                        if end == path.len() {
                            return node.value.as_ref();
                        }

                        path = &path[end..];
                        node = node.children.first()?;
                    }
                    NodeKind::CatchAll => {
                        let tail = path.strip_prefix(&[SLASH]).unwrap_or(path);
                        params.push(&node.segment[2..], tail);
                        return node.value.as_ref();
                    }
                    _ => return None,
                }
            } else if path == segment {
                return node.value.as_ref();
            } else {
                return None;
            }
        }
    }
}

fn reserve_for(params: &mut PathParameters, max_params: u8) {
    let wanted = usize::from(max_params);
    if params.capacity() < wanted {
        params.reserve(wanted - params.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn tree(patterns: &[&'static str]) -> Node<&'static str> {
        let mut root = Node::new();
        for pattern in patterns {
            root.add(pattern, *pattern).unwrap();
        }
        root
    }

    fn routes() -> Node<&'static str> {
        tree(&[
            "/",
            "/cmd/:tool/:sub",
            "/cmd/:tool/",
            "/src/*filepath",
            "/search/",
            "/search/:query",
            "/user_:name",
            "/user_:name/about",
            "/files/:dir/*filepath",
            "/doc/",
            "/doc/go_faq.html",
            "/doc/go1.html",
            "/info/:user/public",
            "/info/:user/project/:project",
        ])
    }

    #[test_case("/", "/", "" ; "root")]
    #[test_case("/cmd/test/", "/cmd/:tool/", "tool=test" ; "param with trailing slash route")]
    #[test_case("/cmd/test/3", "/cmd/:tool/:sub", "tool=test,sub=3" ; "two params")]
    #[test_case("/src/", "/src/*filepath", "filepath=" ; "empty catch-all")]
    #[test_case("/src/some/file.png", "/src/*filepath", "filepath=some/file.png" ; "catch-all with slashes")]
    #[test_case("/search/", "/search/", "" ; "static with trailing slash")]
    #[test_case("/search/someth!ng+in+\u{fc}n\u{ec}c\u{f6}d\u{e9}", "/search/:query", "query=someth!ng+in+\u{fc}n\u{ec}c\u{f6}d\u{e9}" ; "unicode param")]
    #[test_case("/user_gopher", "/user_:name", "name=gopher" ; "param after literal in segment")]
    #[test_case("/user_gopher/about", "/user_:name/about", "name=gopher" ; "param then literal")]
    #[test_case("/files/js/inc/framework.js", "/files/:dir/*filepath", "dir=js,filepath=inc/framework.js" ; "param then catch-all")]
    #[test_case("/info/gordon/public", "/info/:user/public", "user=gordon" ; "param between literals")]
    #[test_case("/info/gordon/project/go", "/info/:user/project/:project", "user=gordon,project=go" ; "nested params")]
    fn test_matches(path: &str, expected: &str, params: &str) {
        let root = routes();
        let mut captured = PathParameters::new();
        let lookup = root.get(path, &mut captured);
        assert_eq!(lookup.value, Some(&expected));
        assert!(!lookup.must_redirect);
        assert_eq!(captured.to_string(), params);
    }

    #[test_case("/cmd/test" ; "param route registered with slash")]
    #[test_case("/search" ; "static registered with slash")]
    #[test_case("/doc" ; "static child with slash")]
    #[test_case("/src" ; "catch-all behind slash")]
    #[test_case("/user_gopher/" ; "extra slash after param")]
    #[test_case("/doc/go1.html/" ; "extra slash after static")]
    fn test_redirect_hint(path: &str) {
        let root = routes();
        let mut captured = PathParameters::new();
        let lookup = root.get(path, &mut captured);
        assert!(lookup.value.is_none(), "{path}");
        assert!(lookup.must_redirect, "{path}");
        assert!(captured.is_empty());
    }

    #[test_case("/nope" ; "unknown static")]
    #[test_case("/cmd" ; "prefix of a param route")]
    #[test_case("/info/gordon/secret" ; "unknown literal after param")]
    #[test_case("/doc/go2.html" ; "unknown static under shared prefix")]
    fn test_not_found(path: &str) {
        let root = routes();
        let mut captured = PathParameters::new();
        let lookup = root.get(path, &mut captured);
        assert!(lookup.value.is_none(), "{path}");
        assert!(!lookup.must_redirect, "{path}");
        assert!(captured.is_empty());
    }

    #[test_case(&["/a/a", "/aa"], "/a/", false ; "shared prefix without slash route")]
    #[test_case(&["/a/a", "/aa"], "/a", false ; "shared prefix without bare route")]
    #[test_case(&["/:x/a", "/:x", "/:x/b"], "/u/", true ; "param with split children")]
    #[test_case(&["/:x/a", "/:x", "/:x/b"], "/u/c", false ; "param with unknown child")]
    #[test_case(&["/ab/:x/:y/*c"], "/ab/a/a", true ; "catch-all after params")]
    #[test_case(&["/ab/:x/:y/*c"], "/ab/a", false ; "too short for catch-all")]
    #[test_case(&["/a", "/a/*rest"], "/a/", false ; "catch-all takes the slash")]
    #[test_case(&["/a/*rest"], "/a", true ; "catch-all below bare path")]
    fn test_redirect_hint_is_exact(patterns: &[&'static str], path: &str, expected: bool) {
        let root = tree(patterns);
        let mut captured = PathParameters::new();
        let lookup = root.get(path, &mut captured);
        if lookup.is_match() {
            assert!(!expected, "{path} matched");
            return;
        }
        assert_eq!(lookup.must_redirect, expected, "{path}");
        assert!(captured.is_empty());

        if expected {
            let corrected = match path.strip_suffix('/') {
                Some(trimmed) => trimmed.to_string(),
                None => format!("{path}/"),
            };
            assert!(root.get(&corrected, &mut PathParameters::new()).is_match());
        }
    }

    #[test]
    fn test_trailing_slash_both_ways() {
        let root = tree(&["/about/"]);
        let mut params = PathParameters::new();
        assert!(root.get("/about", &mut params).must_redirect);

        let root = tree(&["/about"]);
        assert!(root.get("/about/", &mut params).must_redirect);
        assert!(root.get("/about", &mut params).is_match());
    }

    #[test]
    fn test_static_prefix_does_not_shadow_longer_route() {
        let root = tree(&["/a", "/ab"]);
        let mut params = PathParameters::new();
        assert_eq!(root.get("/ab", &mut params).value, Some(&"/ab"));
        assert_eq!(root.get("/a", &mut params).value, Some(&"/a"));
        assert!(root.get("/abc", &mut params).value.is_none());
    }

    #[test]
    fn test_failed_lookup_keeps_earlier_captures() {
        let root = routes();
        let mut params = PathParameters::new();
        params.push(b"tenant", b"acme");

        let lookup = root.get("/info/gordon/secret", &mut params);
        assert!(!lookup.is_match());
        assert_eq!(params.to_string(), "tenant=acme");

        let lookup = root.get("/info/gordon/public", &mut params);
        assert!(lookup.is_match());
        assert_eq!(params.to_string(), "tenant=acme,user=gordon");
    }

    #[test]
    fn test_buffer_sized_from_subtree() {
        let root = tree(&["/a/:b/:c/:d"]);
        let mut params = PathParameters::new();
        root.get("/a/1/2/3", &mut params);
        assert_eq!(params.len(), 3);
        assert!(params.capacity() >= 3);
    }
}
