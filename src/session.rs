//! Resolution sessions: the per-caller cache of resolver factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{
    BackendRegistry, Category, FactoryKey, FsConnection, LocationDescriptor, LocationError,
    PathProvider, ResolverFactory, Result,
};

/// Lifecycle of a [`ResolutionSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Accepting requests.
    Open,
    /// Releasing its factories.
    Closing,
    /// Released; every request fails with [`LocationError::SessionClosed`].
    Closed,
}

/// Maps location descriptors to path providers, caching one factory per
/// (category, specifier).
///
/// A session is used from one thread at a time; independent sessions may
/// live on different threads. Closing (or dropping) the session closes every
/// factory it created. Close failures are logged and counted, never raised.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{BackendRegistry, Category, LocationDescriptor, ResolutionSession, ResolverConfig};
/// use std::sync::Arc;
///
/// let config = ResolverConfig::new().workflow_path("/projects/flow");
/// let registry = Arc::new(BackendRegistry::with_defaults(config));
/// let mut session = ResolutionSession::new(registry, None);
///
/// let a = session.get_or_create_factory(Category::Mountpoint, Some("shared"))?;
/// let b = session.get_or_create_factory(Category::Mountpoint, Some("shared"))?;
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let provider = session.resolve(&LocationDescriptor::relative_to("workflow", "../data/x.csv"))?;
/// assert_eq!(provider.path().to_absolute_path().to_string(), "/projects/data/x.csv");
///
/// session.close();
/// assert!(session.resolve(&LocationDescriptor::local("/tmp")).is_err());
/// # Ok::<(), anyfs_location::LocationError>(())
/// ```
pub struct ResolutionSession {
    registry: Arc<BackendRegistry>,
    connection: Option<Arc<dyn FsConnection>>,
    factories: HashMap<FactoryKey, Arc<ResolverFactory>>,
    connected: Option<Arc<ResolverFactory>>,
    state: SessionState,
}

impl ResolutionSession {
    /// Open a session over `registry`, optionally with a live connection for
    /// CONNECTED locations.
    pub fn new(registry: Arc<BackendRegistry>, connection: Option<Arc<dyn FsConnection>>) -> Self {
        tracing::debug!(connected = connection.is_some(), "opened resolution session");
        Self {
            registry,
            connection,
            factories: HashMap::new(),
            connected: None,
            state: SessionState::Open,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The connection supplied at creation, if any.
    pub fn connection(&self) -> Option<&Arc<dyn FsConnection>> {
        self.connection.as_ref()
    }

    /// Number of cached factories, the connected factory included.
    pub fn cached_factories(&self) -> usize {
        self.factories.len() + usize::from(self.connected.is_some())
    }

    /// Return the factory for (category, specifier), creating it on first
    /// request.
    ///
    /// CONNECTED requests share one session-wide factory over the supplied
    /// connection. Whether the connection can serve CONNECTED locations at
    /// all is checked once, when that factory is created. A request with an
    /// explicit specifier must also name the connection's own store; that
    /// check runs on every request and a failure caches nothing.
    ///
    /// # Errors
    ///
    /// - [`LocationError::SessionClosed`] - the session has been closed
    /// - [`LocationError::MissingConnection`] - CONNECTED without a connection
    /// - [`LocationError::IncompatibleLocation`] - the connection cannot serve the request
    /// - [`LocationError::UnsupportedCategory`] - no backend is registered
    /// - any error the backend reports while opening
    pub fn get_or_create_factory(
        &mut self,
        category: Category,
        specifier: Option<&str>,
    ) -> Result<Arc<ResolverFactory>> {
        self.ensure_open()?;
        let key = FactoryKey::new(category, specifier);
        if category == Category::Connected {
            return self.connected_factory(&key);
        }

        if let Some(factory) = self.factories.get(&key) {
            return Ok(Arc::clone(factory));
        }

        let registration = self
            .registry
            .lookup(category)
            .ok_or(LocationError::UnsupportedCategory { category })?;
        let factory = Arc::new(ResolverFactory::open(key.clone(), registration)?);
        tracing::debug!(key = %key, kind = ?factory.kind(), "created resolver factory");
        self.factories.insert(key, Arc::clone(&factory));
        Ok(factory)
    }

    fn connected_factory(&mut self, requested: &FactoryKey) -> Result<Arc<ResolverFactory>> {
        let connection = self
            .connection
            .as_ref()
            .ok_or(LocationError::MissingConnection)?;

        if requested.specifier().is_some() && !connection.supports(requested) {
            return Err(incompatible(&**connection, requested));
        }
        if let Some(factory) = &self.connected {
            return Ok(Arc::clone(factory));
        }

        let capability = FactoryKey::new(Category::Connected, None);
        if !connection.supports(&capability) {
            return Err(incompatible(&**connection, &capability));
        }

        let factory = Arc::new(ResolverFactory::connected(Arc::clone(connection)));
        tracing::debug!(key = %factory.key(), "created connected resolver factory");
        self.connected = Some(Arc::clone(&factory));
        Ok(factory)
    }

    /// Resolve `descriptor` into a provider for its path.
    ///
    /// A failed call leaves the cache as it was: a factory created during the
    /// call is closed and evicted again.
    ///
    /// # Errors
    ///
    /// - [`LocationError::SessionClosed`] - the session has been closed
    /// - [`LocationError::InvalidLocation`] - the descriptor is incomplete
    /// - any error from [`get_or_create_factory`](Self::get_or_create_factory)
    ///   or from the backend resolving the path
    pub fn resolve(&mut self, descriptor: &LocationDescriptor) -> Result<PathProvider> {
        self.ensure_open()?;
        descriptor.validate()?;

        let key = descriptor.factory_key();
        let cached = key.category() == Category::Connected || self.factories.contains_key(&key);
        let factory = self.get_or_create_factory(key.category(), key.specifier())?;

        match factory.create_provider(descriptor.path()) {
            Ok(provider) => Ok(provider),
            Err(e) => {
                if !cached {
                    self.evict(&key);
                }
                Err(e)
            }
        }
    }

    fn evict(&mut self, key: &FactoryKey) {
        if let Some(factory) = self.factories.remove(key) {
            tracing::debug!(key = %key, "evicting resolver factory after failed resolve");
            if let Err(e) = factory.close() {
                tracing::warn!(key = %key, error = %e, "failed to close evicted resolver factory");
            }
        }
    }

    /// Close every cached factory and refuse further requests.
    ///
    /// Each factory is closed exactly once; failures are logged and the
    /// remaining factories are still closed. Calling this again is a no-op.
    pub fn close(&mut self) {
        if self.state != SessionState::Open {
            return;
        }
        self.state = SessionState::Closing;

        let mut factories: Vec<_> = self.factories.drain().map(|(_, f)| f).collect();
        factories.extend(self.connected.take());

        let total = factories.len();
        let mut failures = 0usize;
        for factory in factories {
            if let Err(e) = factory.close() {
                failures += 1;
                tracing::warn!(key = %factory.key(), error = %e, "failed to close resolver factory");
            }
        }
        if failures > 0 {
            tracing::warn!(failures, total, "resolution session closed with errors");
        } else {
            tracing::debug!(total, "resolution session closed");
        }

        self.state = SessionState::Closed;
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Closing | SessionState::Closed => Err(LocationError::SessionClosed),
        }
    }
}

fn incompatible(connection: &dyn FsConnection, requested: &FactoryKey) -> LocationError {
    let connection = connection.location_spec().to_string();
    let requested = requested.to_string();
    tracing::debug!(%connection, %requested, "connection cannot serve location");
    LocationError::IncompatibleLocation {
        connection,
        requested,
    }
}

impl Drop for ResolutionSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ResolutionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.factories.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("ResolutionSession")
            .field("state", &self.state)
            .field("factories", &keys)
            .field("connected", &self.connection.is_some())
            .finish()
    }
}
