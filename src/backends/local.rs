//! LOCAL backend: the disk of the running process.

use std::sync::Arc;

use crate::{FactoryKey, FsBackend, FsIdentity, FsSyntax};

/// The local filesystem, with the platform separator.
///
/// Holds no connection; closing it is a no-op.
#[derive(Debug)]
pub struct LocalBackend {
    fs: Arc<FsIdentity>,
}

impl LocalBackend {
    /// Open the local filesystem.
    ///
    /// `working_dir` defaults to the process working directory, or the root
    /// if that cannot be determined.
    pub fn new(key: FactoryKey, working_dir: Option<&str>) -> Self {
        let working_dir = match working_dir {
            Some(dir) => dir.to_owned(),
            None => std::env::current_dir()
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        tracing::debug!(key = %key, working_dir = %working_dir, "opened local filesystem");
        Self {
            fs: FsIdentity::with_working_directory(key, FsSyntax::local(), &working_dir),
        }
    }
}

impl FsBackend for LocalBackend {
    fn filesystem(&self) -> &Arc<FsIdentity> {
        &self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, PathAlgebra};
    use std::path::MAIN_SEPARATOR;

    fn key() -> FactoryKey {
        FactoryKey::new(Category::Local, None)
    }

    #[test]
    fn uses_platform_separator() {
        let backend = LocalBackend::new(key(), Some("/"));
        assert_eq!(backend.separator(), MAIN_SEPARATOR);
    }

    #[test]
    fn configured_working_directory() {
        let sep = MAIN_SEPARATOR;
        let backend = LocalBackend::new(key(), Some(&format!("{sep}home{sep}me")));
        let path = backend.resolve("notes.txt").unwrap();
        assert!(!path.is_absolute());
        assert_eq!(
            path.to_absolute_path().to_string(),
            format!("{sep}home{sep}me{sep}notes.txt")
        );
    }

    #[test]
    fn resolve_keeps_raw_segments() {
        let sep = MAIN_SEPARATOR;
        let backend = LocalBackend::new(key(), None);
        let path = backend.resolve(&format!("{sep}a{sep}..{sep}b")).unwrap();
        assert_eq!(path.name_count(), 3);
        assert_eq!(path.normalize().to_string(), format!("{sep}b"));
    }

    #[test]
    fn close_is_noop() {
        let backend = LocalBackend::new(key(), None);
        assert!(backend.close().is_ok());
    }
}
