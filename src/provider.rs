//! Scoped handles exposing one resolved path.

use std::fmt;

use crate::{FsBackend, FsPath};

/// A short-lived handle on one resolved [`FsPath`].
///
/// Providers from shared factories own nothing beyond the path. Providers
/// from per-location factories also own the backend opened to resolve the
/// path, and release it on [`close`](Self::close) or drop.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{BackendRegistry, LocationDescriptor, ResolutionSession, ResolverConfig};
/// use std::sync::Arc;
///
/// let registry = Arc::new(BackendRegistry::with_defaults(ResolverConfig::default()));
/// let mut session = ResolutionSession::new(registry, None);
///
/// let mut provider = session.resolve(&LocationDescriptor::custom_url("https://host/a/b.csv"))?;
/// assert_eq!(provider.path().to_string(), "/a/b.csv");
/// assert!(provider.owns_backend());
///
/// provider.close();
/// provider.close(); // no-op
/// assert_eq!(provider.path().to_string(), "/a/b.csv");
/// # Ok::<(), anyfs_location::LocationError>(())
/// ```
pub struct PathProvider {
    path: FsPath,
    handle: Option<Box<dyn FsBackend>>,
}

impl PathProvider {
    pub(crate) fn shared(path: FsPath) -> Self {
        Self { path, handle: None }
    }

    pub(crate) fn owning(path: FsPath, handle: Box<dyn FsBackend>) -> Self {
        Self {
            path,
            handle: Some(handle),
        }
    }

    /// The resolved path. Always the same value for this provider.
    #[inline]
    pub fn path(&self) -> &FsPath {
        &self.path
    }

    /// Returns `true` while the provider still holds a private backend.
    pub fn owns_backend(&self) -> bool {
        self.handle.is_some()
    }

    /// Release the private backend, if any.
    ///
    /// Safe to call repeatedly. Close failures are logged, never returned.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            match handle.close() {
                Ok(()) => tracing::debug!(path = %self.path, "released path provider backend"),
                Err(e) => {
                    tracing::warn!(path = %self.path, error = %e, "failed to release path provider backend")
                }
            }
        }
    }

    /// Release the provider and keep only its path.
    pub fn into_path(mut self) -> FsPath {
        self.close();
        self.path.clone()
    }
}

impl Drop for PathProvider {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for PathProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathProvider")
            .field("path", &self.path)
            .field("owns_backend", &self.owns_backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, FactoryKey, FsIdentity, FsSyntax, LocationError, Result};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        fs: Arc<FsIdentity>,
        closes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl FsBackend for CountingBackend {
        fn filesystem(&self) -> &Arc<FsIdentity> {
            &self.fs
        }

        fn close(&self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LocationError::illegal("backend refused to close"))
            } else {
                Ok(())
            }
        }
    }

    fn owning(fail: bool) -> (PathProvider, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let fs = FsIdentity::new(FactoryKey::new(Category::CustomUrl, None), FsSyntax::posix());
        let path = fs.path("/a");
        let backend = CountingBackend {
            fs,
            closes: Arc::clone(&closes),
            fail,
        };
        (PathProvider::owning(path, Box::new(backend)), closes)
    }

    #[test]
    fn close_releases_once() {
        let (mut provider, closes) = owning(false);
        provider.close();
        provider.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!provider.owns_backend());
    }

    #[test]
    fn drop_releases() {
        let (provider, closes) = owning(false);
        drop(provider);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_failure_is_swallowed() {
        let (mut provider, closes) = owning(true);
        provider.close();
        drop(provider);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn path_survives_close() {
        let (mut provider, _) = owning(false);
        let before = provider.path().clone();
        provider.close();
        assert_eq!(provider.path(), &before);
    }

    #[test]
    fn into_path_releases() {
        let (provider, closes) = owning(false);
        let path = provider.into_path();
        assert_eq!(path.to_string(), "/a");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_provider_close_is_noop() {
        let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
        let mut provider = PathProvider::shared(fs.path("/x"));
        assert!(!provider.owns_backend());
        provider.close();
        assert_eq!(provider.path().to_string(), "/x");
    }
}
