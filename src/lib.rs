//! # anyfs-location
//!
//! Virtual paths over heterogeneous filesystems, and the session layer that
//! turns serializable location descriptors into live path providers.
//!
//! Paths are scoped to the filesystem instance they were parsed against:
//! two paths with the same text on different filesystems are never equal.
//! Normalization, relativization and resolution are purely lexical and
//! shared by every path type through [`PathAlgebra`].
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use anyfs_location::{
//!     BackendRegistry, LocationDescriptor, PathAlgebra, ResolutionSession, ResolverConfig,
//! };
//! use std::sync::Arc;
//!
//! let config = ResolverConfig::new().workflow_path("/teams/flow");
//! let registry = Arc::new(BackendRegistry::with_defaults(config));
//! let mut session = ResolutionSession::new(registry, None);
//!
//! let a = session.resolve(&LocationDescriptor::mountpoint("team", "/data/in/./a.csv"))?;
//! let b = session.resolve(&LocationDescriptor::mountpoint("team", "/data/out"))?;
//!
//! let a = a.path().normalize();
//! assert_eq!(a.to_string(), "/data/in/a.csv");
//! assert_eq!(b.path().relativize(&a)?.to_string(), "../in/a.csv");
//!
//! session.close();
//! # Ok::<(), anyfs_location::LocationError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FsPath`] | Immutable path scoped to one filesystem instance |
//! | [`PathAlgebra`] | Normalize, relativize and resolve, shared by all path types |
//! | [`LocationDescriptor`] | Serializable (category, specifier, path) record |
//! | [`ResolutionSession`] | Caches one [`ResolverFactory`] per (category, specifier) |
//! | [`PathProvider`] | Scoped handle on one resolved path |
//! | [`BackendRegistry`] | Explicit category → backend constructor map |
//! | [`LocationError`] | Error type for every fallible operation |
//!
//! ---
//!
//! ## Location Categories
//!
//! | Category | Specifier | Backend |
//! |----------|-----------|---------|
//! | `LOCAL` | none | [`LocalBackend`] |
//! | `RELATIVE_TO` | `workflow`, `workflow-data` or `mountpoint` | [`RelativeToBackend`] |
//! | `MOUNTPOINT` | mount id | [`MountpointBackend`] |
//! | `CUSTOM_URL` | optional timeout in ms | [`UrlBackend`], one per location |
//! | `CONNECTED` | optional, checked against the connection | the session's [`FsConnection`] |
//!
//! ---
//!
//! ## Resource Lifetimes
//!
//! ```text
//! ResolutionSession  closes every factory it created
//!   └─ ResolverFactory  closes its shared backend
//!        └─ PathProvider  closes its private backend (per-location only)
//! ```
//!
//! Each level closes on `close()` or on drop, exactly once. Close failures
//! are logged with `tracing` and never returned.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`LocationDescriptor`], [`Category`] and [`ResolverConfig`], plus JSON config loading |

// Private modules
mod config;
mod error;
mod factory;
mod filesystem;
mod location;
mod path;
mod provider;
mod registry;
mod session;
mod traits;

// Public modules
pub mod backends;

// Public re-exports - error types
pub use error::{LocationError, Result};

// Public re-exports - descriptors
pub use location::{Category, FactoryKey, LocationDescriptor, RelativeTo};

// Public re-exports - paths
pub use filesystem::{FsIdentity, FsSyntax};
pub use path::FsPath;
pub use traits::PathAlgebra;

// Public re-exports - backends
pub use backends::{LocalBackend, MountpointBackend, RelativeToBackend, UrlBackend};
pub use registry::{BackendConstructor, BackendKind, BackendRegistry, BackendRequest};
pub use traits::{FsBackend, FsConnection};

// Public re-exports - resolution
pub use config::{DEFAULT_URL_TIMEOUT, ResolverConfig};
pub use factory::ResolverFactory;
pub use provider::PathProvider;
pub use session::{ResolutionSession, SessionState};
