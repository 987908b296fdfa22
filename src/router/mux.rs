// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Live request multiplexer.
//!
//! [`Mux`] pairs a [`Registry`] guarded by a mutex with the currently
//! published [`Dispatcher`]. Requests load the published dispatcher without
//! taking the lock. Routes added at runtime go through the lock, trigger a
//! full rebuild, and the new dispatcher replaces the old one only once it is
//! completely built.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::error::{report_error, ErrorContext, RouteResult};

use super::dispatcher::{Dispatcher, Resolution};
use super::entry::Entry;
use super::handler::{Context, Handlers};
use super::method::Method;
use super::params::PathParameters;
use super::registry::Registry;

/// A registry with a published, lock-free dispatcher.
#[derive(Debug)]
pub struct Mux {
    registry: Mutex<Registry>,
    current: ArcSwap<Dispatcher>,
}

impl Mux {
    /// Builds `registry` and publishes the result.
    ///
    /// # Returns
    ///
    /// * `Ok(Mux)` - A mux serving the registry's routes.
    /// * `Err(RouteError)` - If the routes could not be built.
    pub fn new(registry: Registry) -> RouteResult<Self> {
        let dispatcher = registry.build()?;
        Ok(Self {
            registry: Mutex::new(registry),
            current: ArcSwap::from_pointee(dispatcher),
        })
    }

    /// The currently published dispatcher.
    pub fn snapshot(&self) -> Arc<Dispatcher> {
        self.current.load_full()
    }

    /// Resolves a request against the published dispatcher.
    pub fn resolve(
        &self,
        method: Method,
        host: &str,
        path: &str,
        params: &mut PathParameters,
    ) -> Resolution {
        self.current.load().resolve(method, host, path, params)
    }

    /// Serves the context's request with the published dispatcher.
    ///
    /// The dispatcher is held as an owned snapshot while the chain runs, so
    /// handlers may register live routes without pinning the swap slot.
    pub fn serve(&self, ctx: &mut Context) {
        let dispatcher = self.current.load_full();
        dispatcher.serve(ctx);
    }

    /// Registers a route while requests are being served.
    ///
    /// The registry is rebuilt from scratch and the new dispatcher is
    /// published only if the build succeeds. On failure the route is removed
    /// again, the error is reported and returned, and the previous dispatcher
    /// stays in place.
    pub fn register_live<S, P, H>(
        &self,
        method: Method,
        subdomain: S,
        pattern: P,
        handlers: H,
    ) -> RouteResult<()>
    where
        S: Into<String>,
        P: Into<String>,
        H: Into<Handlers>,
    {
        self.update(|registry| {
            registry.register(method, subdomain, pattern, handlers);
        })
    }

    /// Registers an entry tree while requests are being served, with the
    /// same all-or-nothing publication as [`Mux::register_live`].
    pub fn register_entry_live(&self, entry: &Entry) -> RouteResult<()> {
        self.update(|registry| {
            registry.register_entry(entry);
        })
    }

    fn update<F>(&self, change: F) -> RouteResult<()>
    where
        F: FnOnce(&mut Registry),
    {
        let mut registry = self.registry.lock();
        let before = registry.len();
        change(&mut registry);

        match registry.build() {
            Ok(dispatcher) => {
                self.current.store(Arc::new(dispatcher));
                tracing::info!(
                    added = registry.len() - before,
                    routes = registry.len(),
                    "Published rebuilt routes"
                );
                Ok(())
            }
            Err(err) => {
                registry.truncate(before);
                report_error(
                    ErrorContext::new(err.clone(), "router")
                        .with_details("live registration rejected, previous routes kept"),
                );
                Err(err)
            }
        }
    }

    /// Runs `f` with the registry locked.
    pub fn with_registry<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Registry) -> R,
    {
        f(&self.registry.lock())
    }
}
