//! Mauka Mux Library
//!
//! This library contains the request router of the Mauka server: compressed
//! prefix trees mapping a method, host and path to an ordered handler chain,
//! together with the configuration, error handling and route manifest
//! support around it. The library is used by the `mauka_mux` binary, but can
//! also be used as a dependency by other projects.
//!
//! # Architecture
//!
//! - Routes are declared on a [`router::Registry`] during setup.
//! - [`router::Registry::build`] compiles them into an immutable
//!   [`router::Dispatcher`] that any number of threads can share.
//! - [`router::Mux`] publishes dispatchers atomically so routes can be added
//!   while requests are being served.

pub mod config;
pub mod error;
pub mod manifest;
pub mod router;

// Internal test suites that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

// Feature-gated modules
#[cfg(feature = "benchmarking")]
pub mod bench;

/// Version information for the Mauka mux.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Validates `config`, installs the tracing error reporter and stores the
/// configuration in the global slot read by [`config::get_global_config`].
/// Only the first successful call sets the global configuration.
pub fn init(config: config::MuxConfig) -> error::MuxResult<()> {
    use crate::config::Validate;

    config.validate()?;
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));
    config::init_global_config(config);
    Ok(())
}
