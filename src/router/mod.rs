// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Radix tree HTTP router.
//!
//! Routes are declared on a [`Registry`], compiled into an immutable
//! [`Dispatcher`] holding one compressed prefix tree per method and
//! subdomain, and served either directly from the dispatcher or through a
//! [`Mux`] that can take new routes while requests are in flight.
//!
//! Path patterns are literal text with two kinds of wildcard:
//!
//! * `:name` matches one path segment, up to the next `/`;
//! * `*name` at the very end, directly after a `/`, matches the rest of the
//!   path including any further `/`.
//!
//! ```
//! use mauka_mux_lib::router::{chain, Handler, Method, PathParameters, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(Method::Get, "", "/users/:id", chain(Handler::text("user")))
//!     .set_name("user");
//! let dispatcher = registry.build().unwrap();
//!
//! let mut params = PathParameters::new();
//! let resolution = dispatcher.resolve(Method::Get, "example.com", "/users/42", &mut params);
//! assert!(resolution.is_matched());
//! assert_eq!(params.get("id"), Some("42"));
//! assert_eq!(dispatcher.path("user", &["7"]), "/users/7");
//! ```

mod dispatcher;
mod entry;
mod handler;
mod insert;
mod lookup;
mod method;
mod mux;
mod node;
mod params;
mod registry;
mod route;

pub use dispatcher::{html_escape, Dispatcher, Resolution, Tree};
pub use entry::{Declaration, Entry};
pub use handler::{Context, Endpoint, Handler, Handlers, Request, Response};
pub use insert::validate_pattern;
pub use lookup::Lookup;
pub use method::Method;
pub use mux::Mux;
pub use node::{Node, NodeKind};
pub use params::{ParseParamsError, PathParameter, PathParameters};
pub use registry::{chain, Registry};
pub use route::{PatternPart, Route, RouteInfo, DYNAMIC_SUBDOMAIN};
