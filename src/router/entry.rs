// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Declarative route groups.
//!
//! An [`Entry`] is either a leaf route or a group of nested entries. Groups
//! whose path ends in `.` bind their children to a subdomain; any other group
//! prefixes its children's paths. [`Entry::flatten`] expands a tree of
//! entries into the flat declarations the registry stores.

use super::handler::Handler;
use super::method::Method;

/// A route or a group of routes.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    /// Optional route name for reverse lookups.
    pub name: Option<String>,
    /// Request method. A leaf without a method is registered for all methods.
    pub method: Option<Method>,
    /// Also register the leaf for `HEAD`.
    pub head: bool,
    /// Path of the leaf, prefix of a group, or `label.` for a subdomain group.
    pub path: String,
    /// Middleware that runs before the handler.
    pub begin: Vec<Handler>,
    /// The main handler.
    pub handler: Option<Handler>,
    /// Middleware that runs after the handler.
    pub done: Vec<Handler>,
    /// Children, making this entry a group.
    pub entries: Vec<Entry>,
}

/// A flat route declaration produced from an entry tree.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Route name, if the entry had one.
    pub name: Option<String>,
    /// Request method.
    pub method: Method,
    /// Subdomain, empty for the bare host.
    pub subdomain: String,
    /// Full path pattern.
    pub pattern: String,
    /// Group and entry middleware around the handler.
    pub handlers: Vec<Handler>,
}

impl Entry {
    /// A leaf entry for `path` handled by `handler`.
    pub fn new<P: Into<String>>(method: Method, path: P, handler: Handler) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
            handler: Some(handler),
            ..Self::default()
        }
    }

    /// A group of entries under `path`.
    pub fn group<P: Into<String>>(path: P, entries: Vec<Entry>) -> Self {
        Self {
            path: path.into(),
            entries,
            ..Self::default()
        }
    }

    /// Sets the route name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Also registers the entry for `HEAD`.
    pub fn with_head(mut self) -> Self {
        self.head = true;
        self
    }

    /// Appends begin middleware.
    pub fn with_begin(mut self, handler: Handler) -> Self {
        self.begin.push(handler);
        self
    }

    /// Appends done middleware.
    pub fn with_done(mut self, handler: Handler) -> Self {
        self.done.push(handler);
        self
    }

    /// Adds a child entry.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Returns `true` if the entry has children.
    pub fn is_group(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns `true` if the entry is a subdomain group.
    pub fn is_subdomain(&self) -> bool {
        self.is_group() && self.path.ends_with('.')
    }

    /// Expands the entry tree into flat declarations, in declaration order.
    pub fn flatten(&self) -> Vec<Declaration> {
        let mut out = Vec::new();
        self.flatten_into(&Scope::default(), &mut out);
        out
    }

    fn flatten_into(&self, scope: &Scope, out: &mut Vec<Declaration>) {
        if self.is_group() {
            let mut inner = scope.clone();
            if self.is_subdomain() {
                inner.subdomain = format!("{}{}", self.path, scope.subdomain);
            } else {
                inner.prefix.push_str(&self.path);
            }
            inner.begin.extend(self.begin.iter().cloned());
            inner.done.extend(self.done.iter().cloned());

            for entry in &self.entries {
                entry.flatten_into(&inner, out);
            }
            return;
        }

        let mut pattern = format!("{}{}", scope.prefix, self.path);
        if pattern.is_empty() {
            pattern.push('/');
        }

        let mut handlers = Vec::with_capacity(
            scope.begin.len() + self.begin.len() + 1 + self.done.len() + scope.done.len(),
        );
        handlers.extend(scope.begin.iter().cloned());
        handlers.extend(self.begin.iter().cloned());
        handlers.extend(self.handler.iter().cloned());
        handlers.extend(scope.done.iter().cloned());
        handlers.extend(self.done.iter().cloned());

        let methods: Vec<Method> = match self.method {
            Some(Method::Head) => vec![Method::Head],
            Some(method) if self.head => vec![method, Method::Head],
            Some(method) => vec![method],
            None => Method::ALL.to_vec(),
        };

        for method in methods {
            out.push(Declaration {
                name: self.name.clone(),
                method,
                subdomain: scope.subdomain.clone(),
                pattern: pattern.clone(),
                handlers: handlers.clone(),
            });
        }
    }
}

/// Inherited state while walking a group.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    subdomain: String,
    begin: Vec<Handler>,
    done: Vec<Handler>,
}
