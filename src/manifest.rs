//! Route manifest.
//!
//! A manifest declares routes in TOML using the same nesting as [`Entry`].
//! Handlers are named by label; a label handler writes its label and a
//! newline to the response body, so resolving a request shows exactly which
//! chain ran.
//!
//! ```toml
//! begin = ["log"]
//!
//! [[entries]]
//! name = "user"
//! method = "GET"
//! path = "/users/:id"
//! handler = "show-user"
//!
//! [[entries]]
//! path = "api."
//!
//! [[entries.entries]]
//! method = "GET"
//! path = "/status"
//! handler = "status"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::error::MuxResult;
use crate::router::{Entry, Handler, Method, Registry};

/// A parsed route manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteManifest {
    /// Labels of global begin middleware.
    pub begin: Vec<String>,
    /// Labels of global done middleware.
    pub done: Vec<String>,
    /// Label of the not-found handler.
    pub not_found: Option<String>,
    /// Top level entries.
    pub entries: Vec<EntrySpec>,
}

/// One `[[entries]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntrySpec {
    /// Route name.
    pub name: Option<String>,
    /// Request method; all methods when absent.
    pub method: Option<Method>,
    /// Also register for `HEAD`.
    pub head: bool,
    /// Path, group prefix, or `label.` subdomain.
    pub path: String,
    /// Labels of begin middleware.
    pub begin: Vec<String>,
    /// Label of the main handler.
    pub handler: Option<String>,
    /// Labels of done middleware.
    pub done: Vec<String>,
    /// Nested entries.
    pub entries: Vec<EntrySpec>,
}

impl RouteManifest {
    /// Parses a manifest from TOML text.
    pub fn from_toml(text: &str) -> MuxResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a manifest file.
    pub fn load<P: AsRef<Path>>(path: P) -> MuxResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let manifest = Self::from_toml(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = manifest.entries.len(),
            "Route manifest loaded"
        );
        Ok(manifest)
    }

    /// Converts the manifest entries into router entries.
    pub fn to_entries(&self) -> Vec<Entry> {
        self.entries.iter().map(EntrySpec::to_entry).collect()
    }

    /// Creates a registry holding every route of the manifest.
    pub fn to_registry(&self, config: RouterConfig) -> Registry {
        let mut registry = Registry::with_config(config);

        for label in &self.begin {
            registry.begin(label_handler(label));
        }
        for label in &self.done {
            registry.done(label_handler(label));
        }
        if let Some(label) = &self.not_found {
            registry.set_not_found(label_handler(label));
        }

        for entry in self.to_entries() {
            registry.register_entry(&entry);
        }
        registry
    }
}

impl EntrySpec {
    fn to_entry(&self) -> Entry {
        Entry {
            name: self.name.clone(),
            method: self.method,
            head: self.head,
            path: self.path.clone(),
            begin: self.begin.iter().map(|l| label_handler(l)).collect(),
            handler: self.handler.as_deref().map(label_handler),
            done: self.done.iter().map(|l| label_handler(l)).collect(),
            entries: self.entries.iter().map(EntrySpec::to_entry).collect(),
        }
    }
}

/// A handler that writes `label` followed by a newline.
pub fn label_handler(label: &str) -> Handler {
    Handler::text(format!("{label}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MuxError;
    use crate::router::{Context, Request};
    use std::io::Write;

    const MANIFEST: &str = r#"
begin = ["log"]
not_found = "missing"

[[entries]]
name = "user"
method = "get"
path = "/users/:id"
handler = "show-user"

[[entries]]
path = "api."
begin = ["auth"]

[[entries.entries]]
method = "GET"
head = true
path = "/status"
handler = "status"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = RouteManifest::from_toml(MANIFEST).unwrap();
        assert_eq!(manifest.begin, vec!["log"]);
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[0].method, Some(Method::Get));
        assert_eq!(manifest.entries[1].entries[0].path, "/status");
    }

    #[test]
    fn test_manifest_to_registry() {
        let manifest = RouteManifest::from_toml(MANIFEST).unwrap();
        let registry = manifest.to_registry(RouterConfig {
            host: Some("example.com".into()),
            ..RouterConfig::default()
        });
        // user route plus GET and HEAD for the status route
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.path("user", &["1"]), "/users/1");

        let dispatcher = registry.build().unwrap();
        let mut ctx = Context::new(Request::new(Method::Get, "api.example.com", "/status"));
        dispatcher.serve(&mut ctx);
        assert_eq!(ctx.response().body_text(), "log\nauth\nstatus\n");

        let mut ctx = Context::new(Request::new(Method::Get, "example.com", "/nowhere"));
        dispatcher.serve(&mut ctx);
        assert_eq!(ctx.response().status, 404);
        assert_eq!(ctx.response().body_text(), "missing\n");
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let err = RouteManifest::from_toml("[[entries]]\nmethod = \"BREW\"\npath = \"/\"\n")
            .unwrap_err();
        assert!(matches!(err, MuxError::Manifest(_)));
        assert!(err.to_string().contains("BREW"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();
        let manifest = RouteManifest::load(file.path()).unwrap();
        assert_eq!(manifest.entries.len(), 2);

        assert!(matches!(
            RouteManifest::load("/definitely/not/here.toml"),
            Err(MuxError::Io(_))
        ));
    }
}
