//! MOUNTPOINT backend: a named mountpoint.

use std::sync::Arc;

use crate::{
    Category, FactoryKey, FsBackend, FsIdentity, FsSyntax, LocationError, ResolverConfig, Result,
};

/// A `/`-separated filesystem rooted at a mountpoint.
#[derive(Debug)]
pub struct MountpointBackend {
    fs: Arc<FsIdentity>,
}

impl MountpointBackend {
    /// Open the mountpoint named by the key's specifier.
    ///
    /// # Errors
    ///
    /// - [`LocationError::InvalidLocation`] - no specifier, or a mountpoint
    ///   not listed in `config`
    pub fn open(key: &FactoryKey, config: &ResolverConfig) -> Result<Self> {
        let mount_id = key
            .specifier()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LocationError::invalid(Category::Mountpoint, "a mountpoint id is required"))?;

        if !config.is_known_mountpoint(mount_id) {
            return Err(LocationError::invalid(
                Category::Mountpoint,
                format!("unknown mountpoint: {mount_id}"),
            ));
        }

        tracing::debug!(key = %key, "opened mountpoint filesystem");
        Ok(Self {
            fs: FsIdentity::new(key.clone(), FsSyntax::posix()),
        })
    }

    /// The mountpoint id.
    pub fn mount_id(&self) -> &str {
        self.fs.key().specifier().unwrap_or_default()
    }
}

impl FsBackend for MountpointBackend {
    fn filesystem(&self) -> &Arc<FsIdentity> {
        &self.fs
    }

    fn close(&self) -> Result<()> {
        tracing::debug!(mount_id = %self.mount_id(), "closed mountpoint filesystem");
        Ok(())
    }
}
