//! Test modules for the Mauka mux.
//!
//! This module holds the cross-component suites:
//! - Configuration loading and validation
//! - Error reporting through the global reporter
//! - Property-based tests of the router using proptest
//! - Shared fixtures and strategies
//!
//! Unit tests for individual router pieces live next to the code they test.

pub mod test_utils;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{
    label_strategy, literal_strategy, method_strategy, param_value_strategy, recording_handler,
    request_path_strategy, route_pattern_strategy, TestFixture,
};
