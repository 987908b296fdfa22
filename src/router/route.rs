// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Registered routes and reverse path generation.

use std::fmt;

use serde::Serialize;

use super::handler::Handlers;
use super::method::Method;

/// Subdomain marker for routes that match any single leading host label.
pub const DYNAMIC_SUBDOMAIN: &str = "*.";

/// One piece of a route pattern prepared for reverse generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    /// Literal text copied as is.
    Literal(String),
    /// A `:name` or `*name` token, filled from the arguments in order.
    Placeholder,
}

/// A route declaration.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    subdomain: String,
    method: Method,
    pattern: String,
    handlers: Handlers,
    parts: Vec<PatternPart>,
    param_count: usize,
}

impl Route {
    /// Creates a route. The name defaults to `pattern + subdomain`.
    pub fn new<S, P>(method: Method, subdomain: S, pattern: P, handlers: Handlers) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        let subdomain = subdomain.into();
        let pattern = pattern.into();
        let parts = placeholder_parts(&pattern);
        let param_count = parts
            .iter()
            .filter(|part| matches!(part, PatternPart::Placeholder))
            .count();

        Self {
            name: format!("{pattern}{subdomain}"),
            subdomain,
            method,
            pattern,
            handlers,
            parts,
            param_count,
        }
    }

    /// Renames the route.
    pub fn set_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = name.into();
        self
    }

    /// The name used for reverse lookups.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The subdomain, e.g. `api.`, or empty for the bare host.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The path pattern as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The handler chain.
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Number of `:name` and `*name` tokens in the pattern.
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// The placeholder form of the pattern.
    pub fn parts(&self) -> &[PatternPart] {
        &self.parts
    }

    /// Returns `true` if the pattern ends with a catch-all.
    pub fn ends_with_catch_all(&self) -> bool {
        self.pattern
            .rsplit('/')
            .next()
            .map_or(false, |last| last.starts_with('*'))
    }

    /// Returns `true` if the route is bound to the dynamic subdomain.
    pub fn is_dynamic_subdomain(&self) -> bool {
        self.subdomain == DYNAMIC_SUBDOMAIN
    }

    /// Builds a request path for this route from positional arguments.
    ///
    /// A route without parameters only accepts an empty argument list. When
    /// the pattern ends with a catch-all, surplus arguments are joined with
    /// `/` into the last placeholder.
    ///
    /// # Returns
    ///
    /// `None` when the number of arguments does not fit the pattern.
    pub fn reverse(&self, args: &[&str]) -> Option<String> {
        if self.param_count == 0 {
            return args.is_empty().then(|| self.pattern.clone());
        }

        if args.len() < self.param_count
            || (args.len() > self.param_count && !self.ends_with_catch_all())
        {
            return None;
        }

        let mut path = String::with_capacity(self.pattern.len());
        let mut next = 0;
        for part in &self.parts {
            match part {
                PatternPart::Literal(text) => path.push_str(text),
                PatternPart::Placeholder if next + 1 == self.param_count => {
                    path.push_str(&args[next..].join("/"));
                    next = args.len();
                }
                PatternPart::Placeholder => {
                    path.push_str(args[next]);
                    next += 1;
                }
            }
        }

        Some(path)
    }

    /// A serializable summary of the route.
    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            name: self.name.clone(),
            method: self.method,
            subdomain: self.subdomain.clone(),
            pattern: self.pattern.clone(),
            param_count: self.param_count,
            handlers: self.handlers.len(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.method, self.subdomain, self.pattern)
    }
}

/// Route summary used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Route name
    pub name: String,
    /// Request method
    pub method: Method,
    /// Subdomain, empty for the bare host
    pub subdomain: String,
    /// Path pattern
    pub pattern: String,
    /// Number of parameters in the pattern
    pub param_count: usize,
    /// Length of the handler chain
    pub handlers: usize,
}

/// Splits a pattern into literal runs and one placeholder per wildcard
/// token. A token runs from its marker to the next `/`.
fn placeholder_parts(pattern: &str) -> Vec<PatternPart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != ':' && c != '*' {
            literal.push(c);
            continue;
        }

        if !literal.is_empty() {
            parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
        }
        parts.push(PatternPart::Placeholder);

        let end = pattern[i..].find('/').map_or(pattern.len(), |off| i + off);
        while chars.peek().map_or(false, |&(j, _)| j < end) {
            chars.next();
        }
    }

    if !literal.is_empty() {
        parts.push(PatternPart::Literal(literal));
    }
    parts
}
