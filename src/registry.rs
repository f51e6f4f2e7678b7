//! Explicit registry of backend constructors, keyed by category.
//!
//! A registry is a plain value handed to every
//! [`ResolutionSession`](crate::ResolutionSession). Tests and hosts can build
//! their own with fake or additional backends; nothing is looked up from
//! global state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::backends::{LocalBackend, MountpointBackend, RelativeToBackend, UrlBackend};
use crate::{Category, FactoryKey, FsBackend, LocationError, ResolverConfig, Result};

/// How long a backend opened by a factory lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    /// Opened once per factory and shared by all of its providers.
    Shared,
    /// Opened for every provider and owned (and closed) by it.
    PerLocation,
}

/// What a constructor is asked to open.
#[derive(Debug, Clone, Copy)]
pub struct BackendRequest<'a> {
    /// The (category, specifier) of the factory.
    pub key: &'a FactoryKey,
    /// The raw location path; only set for [`BackendKind::PerLocation`].
    pub location: Option<&'a str>,
}

/// Function that opens a backend for a request.
pub type BackendConstructor =
    Arc<dyn Fn(&BackendRequest<'_>) -> Result<Box<dyn FsBackend>> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) kind: BackendKind,
    pub(crate) constructor: BackendConstructor,
}

impl Registration {
    pub(crate) fn new<F>(kind: BackendKind, constructor: F) -> Self
    where
        F: Fn(&BackendRequest<'_>) -> Result<Box<dyn FsBackend>> + Send + Sync + 'static,
    {
        Self {
            kind,
            constructor: Arc::new(constructor),
        }
    }
}

/// Maps each category to the constructor of its backend.
///
/// CONNECTED is never registered: those locations always go to the
/// connection supplied to the session.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{BackendKind, BackendRegistry, Category, FsBackend, FsIdentity, FsSyntax};
/// use std::sync::Arc;
///
/// struct MemoryBackend(Arc<FsIdentity>);
///
/// impl FsBackend for MemoryBackend {
///     fn filesystem(&self) -> &Arc<FsIdentity> {
///         &self.0
///     }
/// }
///
/// let mut registry = BackendRegistry::new();
/// registry.register(Category::Local, BackendKind::Shared, |req| {
///     let fs = FsIdentity::new(req.key.clone(), FsSyntax::posix());
///     Ok(Box::new(MemoryBackend(fs)) as Box<dyn FsBackend>)
/// })?;
///
/// assert!(registry.is_registered(Category::Local));
/// assert!(!registry.is_registered(Category::Mountpoint));
/// # Ok::<(), anyfs_location::LocationError>(())
/// ```
#[derive(Clone, Default)]
pub struct BackendRegistry {
    entries: HashMap<Category, Registration>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in LOCAL, RELATIVE_TO, MOUNTPOINT and
    /// CUSTOM_URL backends, configured from `config`.
    pub fn with_defaults(config: ResolverConfig) -> Self {
        let config = Arc::new(config);
        let mut registry = Self::new();

        let cfg = Arc::clone(&config);
        registry.insert(Category::Local, BackendKind::Shared, move |req| {
            let backend = LocalBackend::new(req.key.clone(), cfg.local_working_dir.as_deref());
            Ok(Box::new(backend) as Box<dyn FsBackend>)
        });

        let cfg = Arc::clone(&config);
        registry.insert(Category::RelativeTo, BackendKind::Shared, move |req| {
            Ok(Box::new(RelativeToBackend::open(req.key, &cfg)?) as Box<dyn FsBackend>)
        });

        let cfg = Arc::clone(&config);
        registry.insert(Category::Mountpoint, BackendKind::Shared, move |req| {
            Ok(Box::new(MountpointBackend::open(req.key, &cfg)?) as Box<dyn FsBackend>)
        });

        let cfg = config;
        registry.insert(Category::CustomUrl, BackendKind::PerLocation, move |req| {
            let location = req.location.ok_or_else(|| {
                LocationError::invalid(Category::CustomUrl, "a URL is required")
            })?;
            let backend = UrlBackend::open(req.key, location, cfg.default_url_timeout())?;
            Ok(Box::new(backend) as Box<dyn FsBackend>)
        });

        registry
    }

    /// Register (or replace) the backend for `category`.
    ///
    /// # Errors
    ///
    /// - [`LocationError::IllegalArgument`] - `category` is CONNECTED
    pub fn register<F>(&mut self, category: Category, kind: BackendKind, constructor: F) -> Result<()>
    where
        F: Fn(&BackendRequest<'_>) -> Result<Box<dyn FsBackend>> + Send + Sync + 'static,
    {
        if category == Category::Connected {
            return Err(LocationError::illegal(
                "CONNECTED locations are served by the session's connection",
            ));
        }
        self.insert(category, kind, constructor);
        Ok(())
    }

    /// Returns `true` if a backend is registered for `category`.
    pub fn is_registered(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }

    /// The lifetime of the backend registered for `category`.
    pub fn kind(&self, category: Category) -> Option<BackendKind> {
        self.entries.get(&category).map(|r| r.kind)
    }

    pub(crate) fn lookup(&self, category: Category) -> Option<&Registration> {
        self.entries.get(&category)
    }

    fn insert<F>(&mut self, category: Category, kind: BackendKind, constructor: F)
    where
        F: Fn(&BackendRequest<'_>) -> Result<Box<dyn FsBackend>> + Send + Sync + 'static,
    {
        self.entries
            .insert(category, Registration::new(kind, constructor));
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut categories: Vec<_> = self.entries.iter().map(|(c, r)| (*c, r.kind)).collect();
        categories.sort();
        f.debug_struct("BackendRegistry")
            .field("categories", &categories)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FsIdentity, FsSyntax};

    struct NullBackend(Arc<FsIdentity>);

    impl FsBackend for NullBackend {
        fn filesystem(&self) -> &Arc<FsIdentity> {
            &self.0
        }
    }

    fn null(req: &BackendRequest<'_>) -> Result<Box<dyn FsBackend>> {
        Ok(Box::new(NullBackend(FsIdentity::new(req.key.clone(), FsSyntax::posix()))))
    }

    #[test]
    fn defaults_cover_self_sufficient_categories() {
        let registry = BackendRegistry::with_defaults(ResolverConfig::default());
        assert_eq!(registry.kind(Category::Local), Some(BackendKind::Shared));
        assert_eq!(registry.kind(Category::RelativeTo), Some(BackendKind::Shared));
        assert_eq!(registry.kind(Category::Mountpoint), Some(BackendKind::Shared));
        assert_eq!(registry.kind(Category::CustomUrl), Some(BackendKind::PerLocation));
        assert!(!registry.is_registered(Category::Connected));
    }

    #[test]
    fn connected_cannot_be_registered() {
        let mut registry = BackendRegistry::new();
        assert!(matches!(
            registry.register(Category::Connected, BackendKind::Shared, null),
            Err(LocationError::IllegalArgument { .. })
        ));
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = BackendRegistry::with_defaults(ResolverConfig::default());
        registry
            .register(Category::CustomUrl, BackendKind::Shared, null)
            .unwrap();
        assert_eq!(registry.kind(Category::CustomUrl), Some(BackendKind::Shared));
    }

    #[test]
    fn constructor_receives_request() {
        let mut registry = BackendRegistry::new();
        registry
            .register(Category::Mountpoint, BackendKind::Shared, null)
            .unwrap();
        let key = FactoryKey::new(Category::Mountpoint, Some("m"));
        let reg = registry.lookup(Category::Mountpoint).unwrap();
        let backend = (reg.constructor)(&BackendRequest {
            key: &key,
            location: None,
        })
        .unwrap();
        assert_eq!(backend.filesystem().key(), &key);
    }

    #[test]
    fn debug_lists_categories() {
        let registry = BackendRegistry::with_defaults(ResolverConfig::default());
        let debug = format!("{registry:?}");
        assert!(debug.contains("Local"));
        assert!(debug.contains("PerLocation"));
    }
}
