// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Route registry.
//!
//! The registry collects route declarations during setup. It never touches a
//! tree while routes are being registered; [`Registry::build`] compiles the
//! whole declaration list into a fresh, immutable [`Dispatcher`].

use std::sync::Arc;

use crate::config::RouterConfig;
use crate::error::RouteResult;

use super::dispatcher::Dispatcher;
use super::entry::Entry;
use super::handler::{Handler, Handlers};
use super::method::Method;
use super::route::Route;

/// Collects routes and global middleware, and compiles them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    routes: Vec<Route>,
    begin: Vec<Handler>,
    done: Vec<Handler>,
    not_found: Option<Handler>,
    config: RouterConfig,
}

impl Registry {
    /// Creates an empty registry with the default router configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Appends a route declaration.
    ///
    /// # Arguments
    ///
    /// * `method` - Request method the route answers.
    /// * `subdomain` - Subdomain such as `api.`, `*.` for any label, or empty.
    /// * `pattern` - Path pattern.
    /// * `handlers` - The handler chain, stored as given.
    ///
    /// # Returns
    ///
    /// The stored route, so it can be renamed.
    pub fn register<S, P, H>(
        &mut self,
        method: Method,
        subdomain: S,
        pattern: P,
        handlers: H,
    ) -> &mut Route
    where
        S: Into<String>,
        P: Into<String>,
        H: Into<Handlers>,
    {
        let route = Route::new(method, subdomain, pattern, handlers.into());
        tracing::trace!(route = %route, "Route registered");
        self.routes.push(route);
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    /// Adds middleware that runs before every handler registered through
    /// [`Registry::register_entry`] afterwards.
    pub fn begin(&mut self, handler: Handler) -> &mut Self {
        self.begin.push(handler);
        self
    }

    /// Adds middleware that runs after every handler registered through
    /// [`Registry::register_entry`] afterwards.
    pub fn done(&mut self, handler: Handler) -> &mut Self {
        self.done.push(handler);
        self
    }

    /// Sets the handler run when no route matches.
    pub fn set_not_found(&mut self, handler: Handler) -> &mut Self {
        self.not_found = Some(handler);
        self
    }

    /// Expands an entry tree and registers every resulting route, wrapping
    /// each chain in the global middleware.
    ///
    /// # Returns
    ///
    /// The number of routes registered.
    pub fn register_entry(&mut self, entry: &Entry) -> usize {
        let declarations = entry.flatten();
        let count = declarations.len();

        for decl in declarations {
            let handlers: Handlers = self
                .begin
                .iter()
                .chain(decl.handlers.iter())
                .chain(self.done.iter())
                .cloned()
                .collect::<Vec<_>>()
                .into();

            let route = self.register(decl.method, decl.subdomain, decl.pattern, handlers);
            if let Some(name) = decl.name {
                route.set_name(name);
            }
        }

        count
    }

    /// All routes in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route with the given name.
    pub fn lookup(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name() == name)
    }

    /// Drops every route registered after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.routes.truncate(len);
    }

    /// Compiles the registered routes into a dispatcher.
    ///
    /// Routes are inserted in order of descending subdomain length, keeping
    /// declaration order among equal lengths. One tree is created per
    /// method and subdomain pair, the first time the pair is seen.
    ///
    /// # Returns
    ///
    /// * `Ok(Dispatcher)` - The compiled router.
    /// * `Err(RouteError)` - The first route that could not be inserted.
    pub fn build(&self) -> RouteResult<Dispatcher> {
        let mut order: Vec<&Route> = self.routes.iter().collect();
        order.sort_by(|a, b| b.subdomain().len().cmp(&a.subdomain().len()));

        let dispatcher = Dispatcher::compile(
            &order,
            self.routes.clone(),
            self.not_found.clone(),
            self.config.clone(),
        )
        .map_err(|(route, err)| {
            tracing::error!(
                method = %route.method(),
                subdomain = route.subdomain(),
                pattern = route.pattern(),
                error = %err,
                "Failed to build route tree"
            );
            err
        })?;

        tracing::debug!(
            routes = self.routes.len(),
            trees = dispatcher.trees().len(),
            max_params = dispatcher.max_params(),
            "Route trees built"
        );

        Ok(dispatcher)
    }

    /// Builds a request path for the named route. Empty on failure.
    pub fn path(&self, name: &str, args: &[&str]) -> String {
        self.lookup(name)
            .and_then(|route| route.reverse(args))
            .unwrap_or_default()
    }

    /// Builds an absolute URL for the named route. Empty on failure.
    pub fn url(&self, name: &str, args: &[&str]) -> String {
        self.lookup(name)
            .and_then(|route| super::dispatcher::absolute_url(&self.config, route, args))
            .unwrap_or_default()
    }
}

/// Wraps a single handler as a chain.
pub fn chain(handler: Handler) -> Handlers {
    Arc::from(vec![handler])
}
