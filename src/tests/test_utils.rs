//! Test utilities and fixtures for the Mauka mux.
//!
//! Strategies for generating route patterns and request paths, a fixture for
//! tests that need files on disk or environment overrides, and a handler that
//! records which chain ran.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use proptest::strategy::{BoxedStrategy, Strategy};
use tempfile::TempDir;

use crate::router::{Handler, Method};

/// Maximum number of path segments in generated patterns.
pub const MAX_SEGMENTS: usize = 5;

/// Create a temporary directory for test files.
pub fn create_test_dir() -> std::io::Result<TempDir> {
    tempfile::tempdir()
}

/// Strategy for a literal path segment: lowercase letters and digits only,
/// so it never contains a wildcard marker or a slash.
pub fn literal_strategy() -> BoxedStrategy<String> {
    "[a-z][a-z0-9]{0,7}".boxed()
}

/// Strategy for a value bound to a `:param` segment.
pub fn param_value_strategy() -> BoxedStrategy<String> {
    "[A-Za-z0-9_.~-]{1,12}".boxed()
}

/// Strategy for a subdomain label.
pub fn label_strategy() -> BoxedStrategy<String> {
    "[a-z]{1,8}".boxed()
}

/// Strategy for any request method.
pub fn method_strategy() -> BoxedStrategy<Method> {
    proptest::sample::select(Method::ALL.to_vec()).boxed()
}

/// Strategy for a set of distinct static paths, each with 1 to
/// [`MAX_SEGMENTS`] segments.
pub fn static_paths_strategy(max_paths: usize) -> BoxedStrategy<Vec<String>> {
    proptest::collection::btree_set(
        proptest::collection::vec(literal_strategy(), 1..=MAX_SEGMENTS)
            .prop_map(|segments| format!("/{}", segments.join("/"))),
        1..=max_paths,
    )
    .prop_map(|set| set.into_iter().collect())
    .boxed()
}

/// Literal segments shared by generated patterns and request paths, short
/// enough that generated routes overlap often.
const SHARED_LITERALS: &[&str] = &["a", "b", "ab", "ba"];

/// Strategy for a route pattern over a small shared vocabulary: literal
/// segments, whole-segment `:x`/`:y`/`:z` parameters, and either a trailing
/// `*rest` catch-all or an optional trailing slash.
pub fn route_pattern_strategy() -> BoxedStrategy<String> {
    let segment = proptest::prop_oneof![
        3 => proptest::sample::select(SHARED_LITERALS.to_vec()).prop_map(str::to_string),
        1 => proptest::sample::select(vec![":x", ":y", ":z"]).prop_map(str::to_string),
    ];
    (
        proptest::collection::vec(segment, 1..4),
        proptest::sample::select(vec!["", "/", "/*rest"]),
    )
        .prop_map(|(segments, tail)| format!("/{}{tail}", segments.join("/")))
        .boxed()
}

/// Strategy for a request path over the same vocabulary as
/// [`route_pattern_strategy`] plus values no literal uses.
pub fn request_path_strategy() -> BoxedStrategy<String> {
    let mut words = SHARED_LITERALS.to_vec();
    words.extend(["u", "v"]);
    (
        proptest::collection::vec(proptest::sample::select(words), 1..6),
        proptest::bool::ANY,
    )
        .prop_map(|(segments, slash)| {
            let path = format!("/{}", segments.join("/"));
            if slash {
                path + "/"
            } else {
                path
            }
        })
        .boxed()
}

/// A handler that appends `label` to a shared log when called.
pub fn recording_handler(label: &str, log: &Arc<Mutex<Vec<String>>>) -> Handler {
    let label = label.to_string();
    let log = Arc::clone(log);
    Handler::new(move |_ctx| log.lock().push(label.clone()))
}

/// Test fixture for tests that need files on disk or environment overrides.
pub struct TestFixture {
    /// Temporary directory for test files
    pub temp_dir: TempDir,
    /// Environment variables to clean up after the test
    env_vars: Vec<String>,
}

impl TestFixture {
    /// Create a new test fixture.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_dir: create_test_dir()?,
            env_vars: Vec::new(),
        })
    }

    /// Set an environment variable for this test.
    ///
    /// The variable is removed when the fixture is dropped.
    pub fn set_env<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        std::env::set_var(&key, value.into());
        self.env_vars.push(key);
    }

    /// Write `contents` to `name` inside the fixture directory.
    pub fn create_file<C: AsRef<[u8]>>(&self, name: &str, contents: C) -> std::io::Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        for key in &self.env_vars {
            std::env::remove_var(key);
        }
    }
}
