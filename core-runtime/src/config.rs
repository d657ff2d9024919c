//! # Worker Configuration Module
//!
//! Configuration surface for the offline worker.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`WorkerConfig`] that holds the worker version, the shell manifest, the
//! request-classification rules, and the push-notification defaults. It
//! enforces fail-fast validation so a misconfigured worker refuses to start
//! instead of silently mis-routing requests.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::config::WorkerConfig;
//!
//! let config = WorkerConfig::builder()
//!     .version("2.0.0")
//!     .scope_origin("https://app.example.com")
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert_eq!(config.static_tag(), "static-2.0.0");
//! assert_eq!(config.runtime_tag(), "runtime-2.0.0");
//! ```

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default shell manifest: the URLs required for the page to render offline.
///
/// Mirrors a typical app shell: root document, stylesheet, script, web app
/// manifest, plus pinned third-party assets served from a CDN.
fn default_shell_manifest() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/styles.css",
        "/app.js",
        "/manifest.json",
        "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css",
        "https://cdnjs.cloudflare.com/ajax/libs/crypto-js/4.2.0/crypto-js.min.js",
        "https://cdnjs.cloudflare.com/ajax/libs/qrcode-generator/1.4.4/qrcode.min.js",
        "https://cdnjs.cloudflare.com/ajax/libs/jszip/3.10.1/jszip.min.js",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Rules that classify a request as a static asset.
#[derive(Debug, Clone)]
pub struct StaticAssetRules {
    /// Path suffixes of static file families (styles, scripts, images, fonts)
    pub extensions: Vec<String>,

    /// Trusted third-party asset hosts, matched against the URL host
    pub asset_hosts: Vec<String>,

    /// Path substring that marks a request as an asset regardless of suffix
    pub path_marker: String,
}

impl Default for StaticAssetRules {
    fn default() -> Self {
        Self {
            extensions: [
                ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".woff",
                ".woff2", ".ttf", ".eot",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            asset_hosts: vec!["cdnjs.cloudflare.com".to_string()],
            path_marker: "/assets/".to_string(),
        }
    }
}

/// Rules that classify a request as an API call.
#[derive(Debug, Clone)]
pub struct ApiRules {
    /// Recognized external API hosts
    pub hosts: Vec<String>,

    /// Path prefix of same-origin API routes
    pub path_prefix: String,

    /// Query substring that marks a request as an API call
    pub query_marker: String,
}

impl Default for ApiRules {
    fn default() -> Self {
        Self {
            hosts: vec!["api.pwnedpasswords.com".to_string()],
            path_prefix: "/api/".to_string(),
            query_marker: "api".to_string(),
        }
    }
}

/// Fallback strings and icons used when a push payload omits fields.
#[derive(Debug, Clone)]
pub struct PushDefaults {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
}

impl Default for PushDefaults {
    fn default() -> Self {
        Self {
            title: "Notification".to_string(),
            body: "You have a new notification".to_string(),
            icon: "/icon-192x192.png".to_string(),
            badge: "/icon-96x96.png".to_string(),
            tag: "worker-notification".to_string(),
        }
    }
}

/// Worker configuration.
///
/// Use [`WorkerConfig::builder`] to construct instances.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Version string; drives the two namespace tags
    pub version: String,

    /// Origin used to resolve relative request URLs (the worker's scope)
    pub scope_origin: String,

    /// Fixed ordered list of URLs precached at install
    pub shell_manifest: Vec<String>,

    /// Document served when a navigation fails offline
    pub navigation_fallback: String,

    /// Static-asset classification rules
    pub static_rules: StaticAssetRules,

    /// API classification rules
    pub api_rules: ApiRules,

    /// How long an API fetch may run before the cached fallback wins
    pub api_timeout: Duration,

    /// Push notification fallbacks
    pub push_defaults: PushDefaults,
}

impl WorkerConfig {
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder::default()
    }

    /// Tag of the eagerly-populated static-assets namespace.
    pub fn static_tag(&self) -> String {
        format!("static-{}", self.version)
    }

    /// Tag of the lazily-populated runtime namespace.
    pub fn runtime_tag(&self) -> String {
        format!("runtime-{}", self.version)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Version is non-empty and has no whitespace
    /// - Scope origin parses as an absolute URL
    /// - Shell manifest is non-empty and contains the navigation fallback
    /// - API timeout is positive and at most 60 seconds
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() || self.version.chars().any(char::is_whitespace) {
            return Err(Error::Config(
                "Version must be a non-empty string without whitespace".to_string(),
            ));
        }

        Url::parse(&self.scope_origin).map_err(|e| {
            Error::Config(format!(
                "Scope origin must be an absolute URL ({}): {}",
                self.scope_origin, e
            ))
        })?;

        if self.shell_manifest.is_empty() {
            return Err(Error::Config(
                "Shell manifest cannot be empty. The worker has nothing to serve offline."
                    .to_string(),
            ));
        }

        if !self.shell_manifest.contains(&self.navigation_fallback) {
            return Err(Error::Config(format!(
                "Navigation fallback '{}' is not in the shell manifest, \
                 so it would never be available offline. Add it to the manifest.",
                self.navigation_fallback
            )));
        }

        if self.api_timeout.is_zero() {
            return Err(Error::Config(
                "API timeout must be greater than zero".to_string(),
            ));
        }

        if self.api_timeout > Duration::from_secs(60) {
            return Err(Error::Config(
                "API timeout exceeds maximum of 60 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`WorkerConfig`] instances.
#[derive(Debug, Default)]
pub struct WorkerConfigBuilder {
    version: Option<String>,
    scope_origin: Option<String>,
    shell_manifest: Option<Vec<String>>,
    navigation_fallback: Option<String>,
    static_rules: Option<StaticAssetRules>,
    api_rules: Option<ApiRules>,
    api_timeout: Option<Duration>,
    push_defaults: Option<PushDefaults>,
}

impl WorkerConfigBuilder {
    /// Sets the worker version (required).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the origin used to resolve relative request URLs.
    ///
    /// Default: `https://localhost`
    pub fn scope_origin(mut self, origin: impl Into<String>) -> Self {
        self.scope_origin = Some(origin.into());
        self
    }

    /// Replaces the shell manifest.
    pub fn shell_manifest(mut self, urls: Vec<String>) -> Self {
        self.shell_manifest = Some(urls);
        self
    }

    /// Appends one URL to the shell manifest.
    pub fn add_shell_url(mut self, url: impl Into<String>) -> Self {
        self.shell_manifest
            .get_or_insert_with(default_shell_manifest)
            .push(url.into());
        self
    }

    /// Sets the offline navigation fallback document.
    ///
    /// Default: `/index.html`
    pub fn navigation_fallback(mut self, url: impl Into<String>) -> Self {
        self.navigation_fallback = Some(url.into());
        self
    }

    /// Sets the static-asset classification rules.
    pub fn static_rules(mut self, rules: StaticAssetRules) -> Self {
        self.static_rules = Some(rules);
        self
    }

    /// Sets the API classification rules.
    pub fn api_rules(mut self, rules: ApiRules) -> Self {
        self.api_rules = Some(rules);
        self
    }

    /// Sets the API fetch timeout.
    ///
    /// Default: 5 seconds
    pub fn api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = Some(timeout);
        self
    }

    /// Sets the push notification fallbacks.
    pub fn push_defaults(mut self, defaults: PushDefaults) -> Self {
        self.push_defaults = Some(defaults);
        self
    }

    /// Builds the final `WorkerConfig`, validating it.
    pub fn build(self) -> Result<WorkerConfig> {
        let version = self.version.ok_or_else(|| {
            Error::Config("Worker version is required. Use .version() to set it.".to_string())
        })?;

        let config = WorkerConfig {
            version,
            scope_origin: self
                .scope_origin
                .unwrap_or_else(|| "https://localhost".to_string()),
            shell_manifest: self.shell_manifest.unwrap_or_else(default_shell_manifest),
            navigation_fallback: self
                .navigation_fallback
                .unwrap_or_else(|| "/index.html".to_string()),
            static_rules: self.static_rules.unwrap_or_default(),
            api_rules: self.api_rules.unwrap_or_default(),
            api_timeout: self.api_timeout.unwrap_or(Duration::from_secs(5)),
            push_defaults: self.push_defaults.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
