//! Configuration for the built-in backends.
//!
//! The values here stand in for the context a host application normally
//! supplies: where the current workflow lives, which mountpoints exist, and
//! the local working directory.
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, [`ResolverConfig::from_json`] and
//! [`ResolverConfig::to_json`] are available.

use std::time::Duration;

/// Default timeout for CUSTOM_URL locations without a specifier.
pub const DEFAULT_URL_TIMEOUT: Duration = Duration::from_millis(1000);

/// Settings consumed by [`BackendRegistry::with_defaults`](crate::BackendRegistry::with_defaults).
///
/// # Example
///
/// ```rust
/// use anyfs_location::ResolverConfig;
///
/// let config = ResolverConfig::new()
///     .workflow_path("/Users/flow")
///     .mountpoint("LOCAL")
///     .mountpoint("team-space");
///
/// assert_eq!(config.workflow(), Some("/Users/flow"));
/// assert!(config.is_known_mountpoint("team-space"));
/// assert!(!config.is_known_mountpoint("other"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolverConfig {
    /// Working directory of the LOCAL filesystem. `None` uses the process
    /// working directory.
    pub local_working_dir: Option<String>,
    /// Path of the current workflow inside its mountpoint.
    pub workflow_path: Option<String>,
    /// Known mountpoint ids. Empty accepts any id.
    pub mountpoints: Vec<String>,
    /// Timeout applied to CUSTOM_URL locations, in milliseconds.
    pub url_timeout_ms: u64,
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            local_working_dir: None,
            workflow_path: None,
            mountpoints: Vec::new(),
            url_timeout_ms: millis(DEFAULT_URL_TIMEOUT),
        }
    }
}

impl ResolverConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LOCAL working directory.
    #[must_use]
    pub fn local_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.local_working_dir = Some(dir.into());
        self
    }

    /// Set the current workflow path.
    #[must_use]
    pub fn workflow_path(mut self, path: impl Into<String>) -> Self {
        self.workflow_path = Some(path.into());
        self
    }

    /// Add a known mountpoint id.
    #[must_use]
    pub fn mountpoint(mut self, id: impl Into<String>) -> Self {
        self.mountpoints.push(id.into());
        self
    }

    /// Set the default CUSTOM_URL timeout.
    #[must_use]
    pub fn url_timeout(mut self, timeout: Duration) -> Self {
        self.url_timeout_ms = millis(timeout);
        self
    }

    /// The current workflow path, if one is configured.
    pub fn workflow(&self) -> Option<&str> {
        self.workflow_path.as_deref()
    }

    /// Returns `true` if `id` may be used as a mountpoint.
    pub fn is_known_mountpoint(&self, id: &str) -> bool {
        self.mountpoints.is_empty() || self.mountpoints.iter().any(|m| m == id)
    }

    /// The default CUSTOM_URL timeout.
    pub fn default_url_timeout(&self) -> Duration {
        Duration::from_millis(self.url_timeout_ms)
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`LocationError::Deserialization`](crate::LocationError::Deserialization) -
    ///   malformed JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::LocationError::Deserialization(e.to_string()))
    }

    /// Serialize this configuration to JSON.
    ///
    /// # Errors
    ///
    /// - [`LocationError::Serialization`](crate::LocationError::Serialization) -
    ///   serialization failed
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::LocationError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.workflow(), None);
        assert!(config.is_known_mountpoint("anything"));
        assert_eq!(config.default_url_timeout(), DEFAULT_URL_TIMEOUT);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ResolverConfig::new()
            .local_working_dir("/home/me")
            .url_timeout(Duration::from_secs(5));
        assert_eq!(config.local_working_dir.as_deref(), Some("/home/me"));
        assert_eq!(config.url_timeout_ms, 5000);
    }

    #[test]
    fn huge_timeout_saturates() {
        let config = ResolverConfig::new().url_timeout(Duration::MAX);
        assert_eq!(config.url_timeout_ms, u64::MAX);
        assert_eq!(config.default_url_timeout(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn listed_mountpoints_restrict_ids() {
        let config = ResolverConfig::new().mountpoint("LOCAL");
        assert!(config.is_known_mountpoint("LOCAL"));
        assert!(!config.is_known_mountpoint("remote"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip_and_defaults() {
        let config = ResolverConfig::from_json(r#"{"workflow_path": "/flows/a"}"#).unwrap();
        assert_eq!(config.workflow(), Some("/flows/a"));
        assert_eq!(config.url_timeout_ms, 1000);

        let json = config.to_json().unwrap();
        assert_eq!(ResolverConfig::from_json(&json).unwrap(), config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_json_is_a_deserialization_error() {
        assert!(matches!(
            ResolverConfig::from_json("{"),
            Err(crate::LocationError::Deserialization(_))
        ));
    }
}
