//! Route registration error module.
//!
//! These errors describe structural problems in registered path patterns.
//! They surface when a route tree is built, never while a request is being
//! resolved.

use thiserror::Error;

/// Errors that can occur while inserting route patterns into a route tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The same pattern was registered twice for one method and subdomain.
    #[error("handlers were already registered for path '{pattern}'")]
    DuplicateRoute {
        /// The full route pattern
        pattern: String,
    },

    /// A single path segment contains more than one wildcard marker.
    #[error("only one wildcard per path segment is allowed, found '{segment}' in path '{pattern}'")]
    InvalidWildcard {
        /// The offending segment
        segment: String,
        /// The full route pattern
        pattern: String,
    },

    /// A `:` or `*` marker is not followed by a name.
    #[error("wildcards must be named with a non-empty name in path '{pattern}'")]
    UnnamedWildcard {
        /// The full route pattern
        pattern: String,
    },

    /// A catch-all marker appears before the end of the pattern.
    #[error("catch-all wildcards are only allowed at the end of the path in '{pattern}'")]
    WildcardMisplaced {
        /// The full route pattern
        pattern: String,
    },

    /// A wildcard segment collides with an already registered sibling.
    #[error("'{segment}' in path '{pattern}' conflicts with an existing route at the same position")]
    WildcardConflict {
        /// The part of the new pattern that could not be placed
        segment: String,
        /// The full route pattern
        pattern: String,
    },

    /// A catch-all marker is not directly preceded by `/`.
    #[error("no '/' before catch-all wildcard in path '{pattern}'")]
    WildcardMissingSlash {
        /// The full route pattern
        pattern: String,
    },

    /// The same parameter name is bound twice in one pattern.
    #[error("parameter name '{name}' is used more than once in path '{pattern}'")]
    DuplicateParam {
        /// The repeated name
        name: String,
        /// The full route pattern
        pattern: String,
    },

    /// The pattern binds more parameters than a route can capture.
    #[error("path '{pattern}' has {count} wildcards, at most {max} are allowed")]
    TooManyParams {
        /// Number of wildcards in the pattern
        count: usize,
        /// The largest supported number
        max: usize,
        /// The full route pattern
        pattern: String,
    },

    /// The pattern does not start with `/`.
    #[error("invalid path '{pattern}': route paths must begin with '/'")]
    InvalidPath {
        /// The full route pattern
        pattern: String,
    },

    /// The HTTP method name is not recognised.
    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),
}

impl RouteError {
    /// Returns the pattern the error refers to, if any.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::DuplicateRoute { pattern }
            | Self::InvalidWildcard { pattern, .. }
            | Self::UnnamedWildcard { pattern }
            | Self::WildcardMisplaced { pattern }
            | Self::WildcardConflict { pattern, .. }
            | Self::WildcardMissingSlash { pattern }
            | Self::DuplicateParam { pattern, .. }
            | Self::TooManyParams { pattern, .. }
            | Self::InvalidPath { pattern } => Some(pattern),
            Self::UnknownMethod(_) => None,
        }
    }
}

/// Result type for route registration and tree construction.
pub type RouteResult<T> = Result<T, RouteError>;
