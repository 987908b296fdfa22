// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Captured path parameters.
//!
//! A lookup appends one [`PathParameter`] per `:name` or `*name` marker it
//! passes, in the order the markers appear in the route pattern. Values are
//! copied out of the request path, so a parameter list never borrows from the
//! request or from the route tree.

use std::fmt;
use std::str::FromStr;

/// A single captured named path segment or catch-all tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathParameter {
    /// Name of the parameter without its marker.
    pub key: String,
    /// The captured value.
    pub value: String,
}

impl PathParameter {
    /// Creates a new parameter.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of captured parameters.
///
/// Order is significant: two lists with the same pairs in a different order
/// are not equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParameters {
    inner: Vec<PathParameter>,
}

/// Error returned when parsing a `key=value,...` parameter string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed path parameter '{0}', expected key=value")]
pub struct ParseParamsError(pub String);

impl PathParameters {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty parameter list able to hold `capacity` entries
    /// without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value captured for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Capacity of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Iterates over the parameters in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathParameter> {
        self.inner.iter()
    }

    /// Removes all parameters while keeping the allocation for reuse.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Ensures room for `additional` more captures.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.inner.reserve(additional);
    }

    /// Drops every parameter captured after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    /// Appends a capture, copying both key and value.
    pub(crate) fn push(&mut self, key: &[u8], value: &[u8]) {
        self.inner.push(PathParameter {
            key: String::from_utf8_lossy(key).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        });
    }
}

impl fmt::Display for PathParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.inner.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", param.key, param.value)?;
        }
        Ok(())
    }
}

impl FromStr for PathParameters {
    type Err = ParseParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::new());
        }

        s.split(',')
            .map(|pair| {
                pair.split_once('=')
                    .map(|(key, value)| PathParameter::new(key, value))
                    .ok_or_else(|| ParseParamsError(pair.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|inner| Self { inner })
    }
}

impl From<Vec<PathParameter>> for PathParameters {
    fn from(inner: Vec<PathParameter>) -> Self {
        Self { inner }
    }
}

impl<'a> IntoIterator for &'a PathParameters {
    type Item = &'a PathParameter;
    type IntoIter = std::slice::Iter<'a, PathParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl IntoIterator for PathParameters {
    type Item = PathParameter;
    type IntoIter = std::vec::IntoIter<PathParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PathParameters {
        PathParameters::from(vec![
            PathParameter::new("user", "gordon"),
            PathParameter::new("repo", "mux"),
        ])
    }

    #[test]
    fn test_get_by_key() {
        let params = sample();
        assert_eq!(params.get("user"), Some("gordon"));
        assert_eq!(params.get("repo"), Some("mux"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_display_keeps_capture_order() {
        assert_eq!(sample().to_string(), "user=gordon,repo=mux");
        assert_eq!(PathParameters::new().to_string(), "");
    }

    #[test]
    fn test_parse() {
        let params: PathParameters = "user=gordon,repo=mux".parse().unwrap();
        assert_eq!(params, sample());

        // values may contain '=' after the first one
        let params: PathParameters = "q=a=b".parse().unwrap();
        assert_eq!(params.get("q"), Some("a=b"));

        assert_eq!("".parse::<PathParameters>().unwrap(), PathParameters::new());
        assert_eq!(
            "user=gordon,broken".parse::<PathParameters>(),
            Err(ParseParamsError("broken".to_string()))
        );
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let reversed = PathParameters::from(vec![
            PathParameter::new("repo", "mux"),
            PathParameter::new("user", "gordon"),
        ]);
        assert_ne!(sample(), reversed);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut params = PathParameters::with_capacity(4);
        params.push(b"id", b"42");
        let capacity = params.capacity();
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.capacity(), capacity);
    }
}
