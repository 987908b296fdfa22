//! Router configuration module.
//!
//! Settings that control how requests are matched and how trailing-slash
//! mismatches are answered, plus the host and scheme used to build absolute
//! URLs for named routes.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scheme prefix for plain HTTP.
pub const SCHEME_HTTP: &str = "http://";
/// Scheme prefix for HTTPS.
pub const SCHEME_HTTPS: &str = "https://";

/// Redirect statuses accepted for path correction.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// Router configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Host the routes are served on, e.g. `example.com:8080`. Subdomain
    /// routes match `subdomain + host`.
    pub host: Option<String>,

    /// Scheme used for absolute URLs; derived from the host's port when unset.
    pub scheme: Option<String>,

    /// Answer trailing-slash mismatches with a redirect instead of not-found.
    pub path_correction: bool,

    /// Let `OPTIONS` requests match routes registered for any method.
    pub allow_method_options: bool,

    /// Status code used for path-correction redirects.
    pub redirect_status: u16,

    /// Route manifest loaded by the command line tool.
    pub routes_file: Option<PathBuf>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: None,
            scheme: None,
            path_correction: true,
            allow_method_options: false,
            redirect_status: 301,
            routes_file: None,
        }
    }
}

impl RouterConfig {
    /// The configured host with a default `:80` port removed, or an empty
    /// string when no host is configured.
    pub fn normalized_host(&self) -> String {
        self.host
            .as_deref()
            .map(strip_default_port)
            .unwrap_or_default()
            .to_string()
    }

    /// The scheme prefix for absolute URLs.
    ///
    /// The configured scheme wins. Otherwise a host on port 443 (or given as
    /// `:https`) gets `https://` and everything else `http://`.
    pub fn resolved_scheme(&self) -> &str {
        if let Some(scheme) = self.scheme.as_deref() {
            return scheme;
        }

        match self.host.as_deref() {
            Some(host) if host == ":https" || parse_port(host) == 443 => SCHEME_HTTPS,
            _ => SCHEME_HTTP,
        }
    }
}

impl Validate for RouterConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !REDIRECT_STATUSES.contains(&self.redirect_status) {
            return Err(ConfigError::ValueOutOfRange {
                key: "router.redirect_status".to_string(),
                message: format!(
                    "{} is not a redirect status, expected one of {:?}",
                    self.redirect_status, REDIRECT_STATUSES
                ),
            });
        }

        if let Some(scheme) = &self.scheme {
            if scheme != SCHEME_HTTP && scheme != SCHEME_HTTPS {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid scheme '{scheme}', expected '{SCHEME_HTTP}' or '{SCHEME_HTTPS}'"
                )));
            }
        }

        if let Some(host) = &self.host {
            if host.trim().is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid host '{host}'"
                )));
            }
        }

        Ok(())
    }
}

/// Removes a trailing `:80` from `host`.
pub fn strip_default_port(host: &str) -> &str {
    match host.find(':') {
        Some(idx) if idx > 0 && &host[idx..] == ":80" => &host[..idx],
        _ => host,
    }
}

/// Returns the port of a `host[:port]` address: the number after `:`, 443
/// for `:https`, and 80 otherwise.
pub fn parse_port(addr: &str) -> u16 {
    match addr.find(':') {
        Some(idx) => {
            let port = &addr[idx + 1..];
            match port.parse::<u16>() {
                Ok(port) => port,
                Err(_) if port == "https" => 443,
                Err(_) => 80,
            }
        }
        None => 80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("example.com:80", "example.com")]
    #[test_case("example.com:8080", "example.com:8080")]
    #[test_case("example.com", "example.com")]
    #[test_case(":80", ":80")]
    fn test_strip_default_port(input: &str, expected: &str) {
        assert_eq!(strip_default_port(input), expected);
    }

    #[test_case("example.com", 80)]
    #[test_case("example.com:8080", 8080)]
    #[test_case("example.com:https", 443)]
    #[test_case("example.com:nope", 80)]
    fn test_parse_port(input: &str, expected: u16) {
        assert_eq!(parse_port(input), expected);
    }

    #[test_case(None, None, "http://")]
    #[test_case(Some("example.com:443"), None, "https://")]
    #[test_case(Some(":https"), None, "https://")]
    #[test_case(Some("example.com:443"), Some("http://"), "http://")]
    fn test_resolved_scheme(host: Option<&str>, scheme: Option<&str>, expected: &str) {
        let config = RouterConfig {
            host: host.map(str::to_string),
            scheme: scheme.map(str::to_string),
            ..RouterConfig::default()
        };
        assert_eq!(config.resolved_scheme(), expected);
    }

    #[test]
    fn test_validate() {
        assert!(RouterConfig::default().validate().is_ok());

        let config = RouterConfig {
            redirect_status: 200,
            ..RouterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { .. })
        ));

        let config = RouterConfig {
            scheme: Some("ftp://".to_string()),
            ..RouterConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RouterConfig {
            host: Some("example.com/path".to_string()),
            ..RouterConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
