//! Benchmarking fixtures for the Mauka mux.
//!
//! A route table shaped like a public REST API, with a mix of static
//! routes, parameters and catch-alls, plus helpers that turn it into a
//! registry and into request paths that hit every route.

use crate::router::{chain, Handler, Method, Registry};

/// Routes modelled on a repository hosting API.
pub const API_ROUTES: &[(Method, &str)] = &[
    (Method::Get, "/"),
    (Method::Get, "/authorizations"),
    (Method::Get, "/authorizations/:id"),
    (Method::Post, "/authorizations"),
    (Method::Delete, "/authorizations/:id"),
    (Method::Get, "/applications/:client_id/tokens/:access_token"),
    (Method::Get, "/events"),
    (Method::Get, "/repos/:owner/:repo/events"),
    (Method::Get, "/networks/:owner/:repo/events"),
    (Method::Get, "/orgs/:org/events"),
    (Method::Get, "/users/:user/received_events"),
    (Method::Get, "/users/:user/received_events/public"),
    (Method::Get, "/users/:user/events"),
    (Method::Get, "/users/:user/events/public"),
    (Method::Get, "/users/:user/events/orgs/:org"),
    (Method::Get, "/feeds"),
    (Method::Get, "/notifications"),
    (Method::Get, "/repos/:owner/:repo/notifications"),
    (Method::Put, "/notifications"),
    (Method::Get, "/notifications/threads/:id"),
    (Method::Get, "/notifications/threads/:id/subscription"),
    (Method::Get, "/repos/:owner/:repo/stargazers"),
    (Method::Get, "/users/:user/starred"),
    (Method::Get, "/user/starred"),
    (Method::Get, "/user/starred/:owner/:repo"),
    (Method::Put, "/user/starred/:owner/:repo"),
    (Method::Delete, "/user/starred/:owner/:repo"),
    (Method::Get, "/repos/:owner/:repo/subscribers"),
    (Method::Get, "/users/:user/subscriptions"),
    (Method::Get, "/user/subscriptions"),
    (Method::Get, "/gists"),
    (Method::Get, "/users/:user/gists"),
    (Method::Get, "/gists/:id"),
    (Method::Post, "/gists"),
    (Method::Put, "/gists/:id/star"),
    (Method::Delete, "/gists/:id/star"),
    (Method::Get, "/repos/:owner/:repo/git/blobs/:sha"),
    (Method::Post, "/repos/:owner/:repo/git/blobs"),
    (Method::Get, "/repos/:owner/:repo/git/commits/:sha"),
    (Method::Get, "/repos/:owner/:repo/git/refs"),
    (Method::Get, "/repos/:owner/:repo/git/tags/:sha"),
    (Method::Get, "/repos/:owner/:repo/git/trees/:sha"),
    (Method::Get, "/issues"),
    (Method::Get, "/user/issues"),
    (Method::Get, "/orgs/:org/issues"),
    (Method::Get, "/repos/:owner/:repo/issues"),
    (Method::Get, "/repos/:owner/:repo/issues/:number"),
    (Method::Post, "/repos/:owner/:repo/issues"),
    (Method::Get, "/repos/:owner/:repo/contents/*path"),
    (Method::Get, "/static/*filepath"),
];

/// Creates a registry holding every route of [`API_ROUTES`].
pub fn api_registry() -> Registry {
    let mut registry = Registry::new();
    for (method, pattern) in API_ROUTES {
        registry.register(*method, "", *pattern, chain(Handler::text(*pattern)));
    }
    registry
}

/// Produces a concrete request path for `pattern` by filling every
/// parameter with `value` and every catch-all with `value/value`.
pub fn sample_path(pattern: &str, value: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                value.to_string()
            } else if segment.starts_with('*') {
                format!("{value}/{value}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Request paths for every route of [`API_ROUTES`], paired with their method.
pub fn api_requests() -> Vec<(Method, String)> {
    API_ROUTES
        .iter()
        .map(|(method, pattern)| (*method, sample_path(pattern, "mauka")))
        .collect()
}
