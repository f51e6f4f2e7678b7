//! CUSTOM_URL backend: a throwaway filesystem for one URL.

use std::sync::Arc;
use std::time::Duration;

use ::url::Url;

use crate::config::millis;
use crate::{Category, FactoryKey, FsBackend, FsIdentity, FsPath, FsSyntax, LocationError, Result};

/// A filesystem opened for a single URL.
///
/// Registered as [`BackendKind::PerLocation`](crate::BackendKind::PerLocation):
/// every provider opens its own instance and closes it on release. The
/// resolved path is the URL's path component, still percent-encoded.
#[derive(Debug)]
pub struct UrlBackend {
    fs: Arc<FsIdentity>,
    url: Url,
    timeout: Duration,
}

impl UrlBackend {
    /// Open a filesystem for `location`.
    ///
    /// The key's specifier, if present, is the timeout in milliseconds;
    /// otherwise `default_timeout` applies.
    ///
    /// # Errors
    ///
    /// - [`LocationError::InvalidLocation`] - `location` is not a URL, or the
    ///   specifier is not a number of milliseconds
    pub fn open(key: &FactoryKey, location: &str, default_timeout: Duration) -> Result<Self> {
        let url = parse_url(location)?;
        let timeout = match key.specifier() {
            Some(spec) => spec
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| {
                    LocationError::invalid(Category::CustomUrl, format!("invalid timeout {spec:?}: {e}"))
                })?,
            None => default_timeout,
        };

        tracing::debug!(url = %url, timeout_ms = millis(timeout), "opened URL filesystem");
        Ok(Self {
            fs: FsIdentity::new(key.clone(), FsSyntax::posix()),
            url,
            timeout,
        })
    }

    /// The URL this filesystem was opened for.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Timeout for operations on this URL.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim())
        .map_err(|e| LocationError::invalid(Category::CustomUrl, format!("{raw:?} is not a URL: {e}")))
}

impl FsBackend for UrlBackend {
    fn filesystem(&self) -> &Arc<FsIdentity> {
        &self.fs
    }

    fn resolve(&self, raw: &str) -> Result<FsPath> {
        let url = parse_url(raw)?;
        // Non-special schemes report an empty path for `scheme://host`
        let path = match url.path() {
            "" => "/",
            path => path,
        };
        Ok(FsPath::parse(&self.fs, path))
    }

    fn close(&self) -> Result<()> {
        tracing::debug!(url = %self.url, "closed URL filesystem");
        Ok(())
    }
}
