// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Compiled router.
//!
//! A [`Dispatcher`] is the immutable result of [`Registry::build`]: an ordered
//! list of trees, one per method and subdomain, plus the route list used for
//! reverse lookups. It is `Send + Sync` and never changes after it is built,
//! so any number of threads can resolve requests against it at once.
//!
//! [`Registry::build`]: super::Registry::build

use std::sync::Arc;

use fnv::FnvHashMap;

use crate::config::router::strip_default_port;
use crate::config::RouterConfig;
use crate::error::RouteError;

use super::handler::{Context, Handler, Handlers, STATUS_NOT_FOUND};
use super::method::Method;
use super::node::Node;
use super::params::PathParameters;
use super::route::{Route, DYNAMIC_SUBDOMAIN};

/// The route tree for one method and subdomain.
#[derive(Debug, Clone)]
pub struct Tree {
    method: Method,
    subdomain: String,
    root: Node<Handlers>,
}

impl Tree {
    fn new(method: Method, subdomain: &str) -> Self {
        Self {
            method,
            subdomain: subdomain.to_string(),
            root: Node::new(),
        }
    }

    /// The method this tree answers.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The subdomain this tree is bound to, empty for the bare host.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The root node.
    pub fn root(&self) -> &Node<Handlers> {
        &self.root
    }
}

/// What the router decided for a request.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A route matched; run its chain.
    Matched(Handlers),
    /// The path differs from a route only by a trailing slash.
    Redirect {
        /// The corrected path.
        location: String,
        /// Redirect status code.
        status: u16,
        /// Short HTML body for `GET` requests.
        note: Option<String>,
    },
    /// Nothing matched.
    NotFound,
}

impl Resolution {
    /// The matched chain, if any.
    pub fn handlers(&self) -> Option<&Handlers> {
        match self {
            Resolution::Matched(handlers) => Some(handlers),
            _ => None,
        }
    }

    /// The redirect target, if any.
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Resolution::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Returns `true` for [`Resolution::Matched`].
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    /// Returns `true` for [`Resolution::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }
}

/// An immutable, compiled router.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    trees: Vec<Tree>,
    routes: Vec<Route>,
    names: FnvHashMap<String, usize>,
    not_found: Option<Handler>,
    config: RouterConfig,
    host: String,
    max_params: u8,
}

impl Dispatcher {
    /// Inserts `order` into freshly created trees. On failure the offending
    /// route is returned with the error.
    pub(crate) fn compile<'r>(
        order: &[&'r Route],
        routes: Vec<Route>,
        not_found: Option<Handler>,
        config: RouterConfig,
    ) -> Result<Self, (&'r Route, RouteError)> {
        let mut trees: Vec<Tree> = Vec::new();

        for &route in order {
            let index = match trees
                .iter()
                .position(|tree| tree.method == route.method() && tree.subdomain == route.subdomain())
            {
                Some(index) => index,
                None => {
                    trees.push(Tree::new(route.method(), route.subdomain()));
                    trees.len() - 1
                }
            };

            trees[index]
                .root
                .add(route.pattern(), Arc::clone(route.handlers()))
                .map_err(|err| (route, err))?;
        }

        let mut names = FnvHashMap::default();
        for (index, route) in routes.iter().enumerate() {
            names.entry(route.name().to_string()).or_insert(index);
        }

        let max_params = trees
            .iter()
            .map(|tree| tree.root.max_params())
            .max()
            .unwrap_or(0);

        Ok(Self {
            trees,
            routes,
            names,
            not_found,
            host: config.normalized_host(),
            config,
            max_params,
        })
    }

    /// The trees in the order they are tried.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// All routes in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The route registered under `name`.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&index| &self.routes[index])
    }

    /// The router configuration the dispatcher was built with.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The largest number of parameters any route captures. Request contexts
    /// can size their parameter buffers from this.
    pub fn max_params(&self) -> u8 {
        self.max_params
    }

    fn method_matches(&self, tree: Method, request: Method) -> bool {
        tree == request || (self.config.allow_method_options && request == Method::Options)
    }

    fn host_matches(&self, subdomain: &str, request_host: &str) -> bool {
        if subdomain.is_empty() {
            return true;
        }

        let request_host = strip_default_port(request_host);

        if subdomain == DYNAMIC_SUBDOMAIN {
            return match request_host.split_once('.') {
                Some((label, rest)) if !label.is_empty() => {
                    if self.host.is_empty() {
                        rest.contains('.')
                    } else {
                        rest == self.host
                    }
                }
                _ => false,
            };
        }

        match request_host.strip_prefix(subdomain) {
            Some(rest) if self.host.is_empty() => !rest.is_empty(),
            Some(rest) => rest == self.host,
            None => false,
        }
    }

    /// Resolves a request.
    ///
    /// Trees are tried in order; a tree takes part when its method matches
    /// (or the request is `OPTIONS` and that is allowed) and its subdomain
    /// matches the host. The first tree holding a route for `path` wins. A
    /// trailing-slash hint becomes a redirect when path correction is on,
    /// the method is not `CONNECT` and the path is longer than `/`.
    ///
    /// # Arguments
    ///
    /// * `method` - Request method.
    /// * `host` - Request host, with or without port.
    /// * `path` - Request path.
    /// * `params` - Capture buffer; on a match it holds the route's parameters.
    pub fn resolve(
        &self,
        method: Method,
        host: &str,
        path: &str,
        params: &mut PathParameters,
    ) -> Resolution {
        for tree in &self.trees {
            if !self.method_matches(tree.method, method)
                || !self.host_matches(&tree.subdomain, host)
            {
                continue;
            }

            let lookup = tree.root.get(path, params);
            if let Some(handlers) = lookup.value {
                return Resolution::Matched(Arc::clone(handlers));
            }

            if lookup.must_redirect
                && self.config.path_correction
                && method != Method::Connect
                && path.len() > 1
            {
                let location = match path.strip_suffix('/') {
                    Some(trimmed) => trimmed.to_string(),
                    None => format!("{path}/"),
                };
                let note = (method == Method::Get).then(|| {
                    format!(
                        "<a href=\"{}\">Moved Permanently</a>.\n",
                        html_escape(&location)
                    )
                });

                tracing::trace!(%method, host, path, %location, "Redirecting to corrected path");
                return Resolution::Redirect {
                    location,
                    status: self.config.redirect_status,
                    note,
                };
            }
        }

        tracing::trace!(%method, host, path, "No route matched");
        Resolution::NotFound
    }

    /// Resolves the context's request and runs the outcome: the matched
    /// chain, a redirect, or the not-found handler.
    pub fn serve(&self, ctx: &mut Context) {
        let resolution = {
            let (request, params) = ctx.lookup_parts();
            self.resolve(request.method, &request.host, &request.path, params)
        };

        match resolution {
            Resolution::Matched(handlers) => {
                ctx.set_handlers(handlers);
                ctx.serve();
            }
            Resolution::Redirect {
                location,
                status,
                note,
            } => {
                ctx.redirect(&location, status);
                if let Some(note) = note {
                    ctx.set_header("Content-Type", "text/html; charset=utf-8");
                    ctx.write(note.as_bytes());
                }
            }
            Resolution::NotFound => match &self.not_found {
                Some(handler) => {
                    ctx.set_status(STATUS_NOT_FOUND);
                    ctx.set_handlers(Arc::from(vec![handler.clone()]));
                    ctx.serve();
                }
                None => {
                    ctx.set_status(STATUS_NOT_FOUND);
                    ctx.write(b"Not Found");
                    ctx.stop_execution();
                }
            },
        }
    }

    /// Builds a request path for the named route. Empty on failure.
    pub fn path(&self, name: &str, args: &[&str]) -> String {
        self.route(name)
            .and_then(|route| route.reverse(args))
            .unwrap_or_default()
    }

    /// Builds an absolute URL for the named route. Empty on failure.
    ///
    /// For a route on the dynamic subdomain the first argument is the
    /// leading host label.
    pub fn url(&self, name: &str, args: &[&str]) -> String {
        self.route(name)
            .and_then(|route| absolute_url(&self.config, route, args))
            .unwrap_or_default()
    }
}

/// `scheme + host + path` for `route`, with the route's subdomain in front of
/// the configured host.
pub(crate) fn absolute_url(config: &RouterConfig, route: &Route, args: &[&str]) -> Option<String> {
    let host = config.normalized_host();

    let (host, args) = if route.is_dynamic_subdomain() {
        let (label, rest) = args.split_first()?;
        if label.is_empty() {
            return None;
        }
        (format!("{label}.{host}"), rest)
    } else {
        (format!("{}{host}", route.subdomain()), args)
    };

    let path = route.reverse(args)?;
    Some(format!("{}{host}{path}", config.resolved_scheme()))
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use inside HTML.
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::handler::Request;
    use crate::router::registry::{chain, Registry};
    use test_case::test_case;

    fn registry_with(config: RouterConfig, routes: &[(Method, &str, &str)]) -> Dispatcher {
        let mut registry = Registry::with_config(config);
        for &(method, subdomain, pattern) in routes {
            let label = format!("{method} {subdomain}{pattern}");
            registry.register(method, subdomain, pattern, chain(Handler::text(label)));
        }
        registry.build().unwrap()
    }

    fn body(dispatcher: &Dispatcher, method: Method, host: &str, path: &str) -> (u16, String) {
        let mut ctx = Context::new(Request::new(method, host, path));
        dispatcher.serve(&mut ctx);
        (ctx.response().status, ctx.response().body_text())
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"/a?b=<c>&d="e"'f'"#),
            "/a?b=&lt;c&gt;&amp;d=&#34;e&#34;&#39;f&#39;"
        );
    }

    #[test]
    fn test_match_and_params() {
        let dispatcher = registry_with(RouterConfig::default(), &[(Method::Get, "", "/users/:id")]);
        let mut params = PathParameters::new();
        let resolution = dispatcher.resolve(Method::Get, "example.com", "/users/42", &mut params);
        assert!(resolution.is_matched());
        assert_eq!(params.to_string(), "id=42");

        let resolution = dispatcher.resolve(Method::Post, "example.com", "/users/42", &mut PathParameters::new());
        assert!(resolution.is_not_found());
    }

    #[test]
    fn test_redirect_with_note_for_get() {
        let dispatcher = registry_with(RouterConfig::default(), &[(Method::Get, "", "/about/")]);
        let mut params = PathParameters::new();
        match dispatcher.resolve(Method::Get, "", "/about", &mut params) {
            Resolution::Redirect {
                location,
                status,
                note,
            } => {
                assert_eq!(location, "/about/");
                assert_eq!(status, 301);
                assert_eq!(note.as_deref(), Some("<a href=\"/about/\">Moved Permanently</a>.\n"));
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_redirect_strips_slash_without_note_for_post() {
        let dispatcher = registry_with(
            RouterConfig {
                redirect_status: 308,
                ..RouterConfig::default()
            },
            &[(Method::Post, "", "/submit")],
        );
        match dispatcher.resolve(Method::Post, "", "/submit/", &mut PathParameters::new()) {
            Resolution::Redirect {
                location,
                status,
                note,
            } => {
                assert_eq!(location, "/submit");
                assert_eq!(status, 308);
                assert!(note.is_none());
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_no_redirect_when_disabled_or_connect() {
        let dispatcher = registry_with(
            RouterConfig {
                path_correction: false,
                ..RouterConfig::default()
            },
            &[(Method::Get, "", "/about/")],
        );
        assert!(dispatcher
            .resolve(Method::Get, "", "/about", &mut PathParameters::new())
            .is_not_found());

        let dispatcher = registry_with(RouterConfig::default(), &[(Method::Connect, "", "/tunnel/")]);
        assert!(dispatcher
            .resolve(Method::Connect, "", "/tunnel", &mut PathParameters::new())
            .is_not_found());
    }

    #[test]
    fn test_options_matches_every_tree_when_allowed() {
        let routes = [(Method::Post, "", "/upload")];
        let dispatcher = registry_with(RouterConfig::default(), &routes);
        assert!(dispatcher
            .resolve(Method::Options, "", "/upload", &mut PathParameters::new())
            .is_not_found());

        let dispatcher = registry_with(
            RouterConfig {
                allow_method_options: true,
                ..RouterConfig::default()
            },
            &routes,
        );
        assert!(dispatcher
            .resolve(Method::Options, "", "/upload", &mut PathParameters::new())
            .is_matched());
    }

    #[test_case("api.example.com", "GET api./" ; "static subdomain")]
    #[test_case("api.example.com:80", "GET api./" ; "default port stripped")]
    #[test_case("gordon.example.com", "GET *./" ; "dynamic subdomain")]
    #[test_case("example.com", "GET /" ; "bare host")]
    #[test_case("a.b.example.com", "GET /" ; "dynamic label must be single")]
    fn test_subdomain_selection(host: &str, expected: &str) {
        let dispatcher = registry_with(
            RouterConfig {
                host: Some("example.com".to_string()),
                ..RouterConfig::default()
            },
            &[
                (Method::Get, "", "/"),
                (Method::Get, "*.", "/"),
                (Method::Get, "api.", "/"),
            ],
        );
        assert_eq!(body(&dispatcher, Method::Get, host, "/"), (200, expected.to_string()));
    }

    #[test]
    fn test_subdomain_without_configured_host() {
        let dispatcher = registry_with(
            RouterConfig::default(),
            &[(Method::Get, "", "/"), (Method::Get, "api.", "/")],
        );
        assert_eq!(body(&dispatcher, Method::Get, "api.localhost", "/").1, "GET api./");
        assert_eq!(body(&dispatcher, Method::Get, "localhost", "/").1, "GET /");
    }

    #[test]
    fn test_falls_through_to_next_tree() {
        let dispatcher = registry_with(
            RouterConfig {
                host: Some("example.com".to_string()),
                ..RouterConfig::default()
            },
            &[(Method::Get, "api.", "/status"), (Method::Get, "", "/users/:id")],
        );
        let mut params = PathParameters::new();
        let resolution = dispatcher.resolve(Method::Get, "api.example.com", "/users/9", &mut params);
        assert!(resolution.is_matched());
        assert_eq!(params.to_string(), "id=9");
    }

    #[test]
    fn test_serve_not_found() {
        let dispatcher = registry_with(RouterConfig::default(), &[(Method::Get, "", "/")]);
        assert_eq!(
            body(&dispatcher, Method::Get, "", "/missing"),
            (404, "Not Found".to_string())
        );

        let mut registry = Registry::new();
        registry.set_not_found(Handler::text("custom"));
        let dispatcher = registry.build().unwrap();
        assert_eq!(body(&dispatcher, Method::Get, "", "/x"), (404, "custom".to_string()));
    }

    #[test]
    fn test_serve_redirect() {
        let dispatcher = registry_with(RouterConfig::default(), &[(Method::Get, "", "/docs/")]);
        let mut ctx = Context::new(Request::new(Method::Get, "", "/docs"));
        dispatcher.serve(&mut ctx);
        assert_eq!(ctx.response().status, 301);
        assert_eq!(ctx.response().header("Location"), Some("/docs/"));
        assert!(ctx.response().body_text().contains("Moved Permanently"));
    }

    #[test]
    fn test_route_name_index_first_wins() {
        let mut registry = Registry::new();
        registry
            .register(Method::Get, "", "/a", chain(Handler::text("a")))
            .set_name("dup");
        registry
            .register(Method::Get, "", "/b", chain(Handler::text("b")))
            .set_name("dup");
        let dispatcher = registry.build().unwrap();
        assert_eq!(dispatcher.route("dup").map(Route::pattern), Some("/a"));
        assert_eq!(dispatcher.path("dup", &[]), "/a");
    }
}
