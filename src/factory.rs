//! Session-scoped factories turning raw paths into providers.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::registry::{BackendConstructor, BackendRequest, Registration};
use crate::{
    BackendKind, FactoryKey, FsBackend, FsConnection, FsIdentity, FsPath, LocationError,
    PathProvider, Result,
};

/// Where a factory gets its filesystem from.
enum Source {
    /// One backend for the factory's lifetime.
    Shared(Box<dyn FsBackend>),
    /// A fresh backend per provider.
    PerLocation(BackendConstructor),
    /// The connection supplied to the session. Not owned.
    Connected(Arc<dyn FsConnection>),
}

/// Produces [`PathProvider`]s for one (category, specifier).
///
/// Obtained from [`ResolutionSession::get_or_create_factory`](crate::ResolutionSession::get_or_create_factory);
/// the session caches and eventually closes it. Closing is idempotent, and
/// a factory that is dropped without being closed closes itself.
pub struct ResolverFactory {
    key: FactoryKey,
    source: Source,
    closed: AtomicBool,
}

impl ResolverFactory {
    /// Open the backend for `key` as described by `registration`.
    pub(crate) fn open(key: FactoryKey, registration: &Registration) -> Result<Self> {
        let source = match registration.kind {
            BackendKind::Shared => {
                let backend = (registration.constructor)(&BackendRequest {
                    key: &key,
                    location: None,
                })?;
                Source::Shared(backend)
            }
            BackendKind::PerLocation => Source::PerLocation(Arc::clone(&registration.constructor)),
        };
        Ok(Self::with_source(key, source))
    }

    /// Wrap the session's connection.
    pub(crate) fn connected(connection: Arc<dyn FsConnection>) -> Self {
        Self::with_source(connection.location_spec(), Source::Connected(connection))
    }

    fn with_source(key: FactoryKey, source: Source) -> Self {
        Self {
            key,
            source,
            closed: AtomicBool::new(false),
        }
    }

    /// The (category, specifier) this factory serves.
    #[inline]
    pub fn key(&self) -> &FactoryKey {
        &self.key
    }

    /// Lifetime of the backends behind this factory.
    pub fn kind(&self) -> BackendKind {
        match self.source {
            Source::PerLocation(_) => BackendKind::PerLocation,
            Source::Shared(_) | Source::Connected(_) => BackendKind::Shared,
        }
    }

    /// The shared filesystem, or `None` when every provider opens its own.
    pub fn filesystem(&self) -> Option<Arc<FsIdentity>> {
        match &self.source {
            Source::Shared(backend) => Some(Arc::clone(backend.filesystem())),
            Source::Connected(connection) => Some(connection.filesystem()),
            Source::PerLocation(_) => None,
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Resolve `raw` into a provider.
    ///
    /// # Errors
    ///
    /// - [`LocationError::SessionClosed`] - the factory has been closed
    /// - any error the backend reports for `raw`
    pub fn create_provider(&self, raw: &str) -> Result<PathProvider> {
        if self.is_closed() {
            return Err(LocationError::SessionClosed);
        }
        match &self.source {
            Source::Shared(backend) => Ok(PathProvider::shared(backend.resolve(raw)?)),
            Source::Connected(connection) => {
                Ok(PathProvider::shared(FsPath::parse(&connection.filesystem(), raw)))
            }
            Source::PerLocation(constructor) => {
                let backend = constructor(&BackendRequest {
                    key: &self.key,
                    location: Some(raw),
                })?;
                match backend.resolve(raw) {
                    Ok(path) => Ok(PathProvider::owning(path, backend)),
                    Err(e) => {
                        if let Err(close_err) = backend.close() {
                            tracing::warn!(key = %self.key, error = %close_err, "failed to close backend after resolve error");
                        }
                        Err(e)
                    }
                }
            }
        }
    }

    /// Release the shared backend, if any.
    ///
    /// Only the first call does anything; later calls return `Ok(())`. A
    /// supplied connection is never closed here.
    ///
    /// # Errors
    ///
    /// Whatever the shared backend reports while closing.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!(key = %self.key, "closing resolver factory");
        match &self.source {
            Source::Shared(backend) => backend.close(),
            Source::PerLocation(_) | Source::Connected(_) => Ok(()),
        }
    }
}

impl Drop for ResolverFactory {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(key = %self.key, error = %e, "failed to close resolver factory");
        }
    }
}

impl fmt::Debug for ResolverFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverFactory")
            .field("key", &self.key)
            .field("kind", &self.kind())
            .field("closed", &self.is_closed())
            .finish()
    }
}
