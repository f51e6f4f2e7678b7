//! # FsBackend Trait
//!
//! The capability interface behind every resolver factory.
//!
//! ## Responsibility
//! - Own one opened filesystem identity (and whatever connection it needs)
//! - Turn raw path strings into [`FsPath`] values on that identity
//! - Release the connection on [`close`](FsBackend::close)
//!
//! ## Usage
//!
//! ```rust
//! use anyfs_location::{Category, FactoryKey, FsBackend, FsIdentity, FsSyntax};
//! use std::sync::Arc;
//!
//! struct ScratchBackend {
//!     fs: Arc<FsIdentity>,
//! }
//!
//! impl FsBackend for ScratchBackend {
//!     fn filesystem(&self) -> &Arc<FsIdentity> {
//!         &self.fs
//!     }
//! }
//!
//! let backend = ScratchBackend {
//!     fs: FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix()),
//! };
//! assert_eq!(backend.resolve("/a//b")?.to_string(), "/a/b");
//! assert_eq!(backend.separator(), '/');
//! # Ok::<(), anyfs_location::LocationError>(())
//! ```

use std::sync::Arc;

use crate::{FsIdentity, FsPath, Result};

/// An opened backend that resolves raw paths on its filesystem.
///
/// All backends share the same path algebra; they differ only in syntax,
/// working directory and the resource they hold open.
///
/// # Thread Safety
///
/// Backends are shared read-only between the providers of one factory, so
/// they must be `Send + Sync`. Methods take `&self`.
pub trait FsBackend: Send + Sync {
    /// The identity every resolved path is scoped to.
    fn filesystem(&self) -> &Arc<FsIdentity>;

    /// Turn a raw path string into a path on [`filesystem`](Self::filesystem).
    ///
    /// The default parses `raw` with the filesystem syntax. Backends that
    /// wrap the path in another notation (URLs, for instance) override it.
    ///
    /// # Errors
    ///
    /// - [`LocationError::InvalidLocation`](crate::LocationError::InvalidLocation) -
    ///   `raw` is not a valid location for this backend
    fn resolve(&self, raw: &str) -> Result<FsPath> {
        Ok(FsPath::parse(self.filesystem(), raw))
    }

    /// The filesystem root.
    fn root(&self) -> FsPath {
        self.filesystem().root()
    }

    /// The name separator.
    fn separator(&self) -> char {
        self.filesystem().separator()
    }

    /// Release the resources held by this backend.
    ///
    /// Called at most once by the owning factory or provider.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}
