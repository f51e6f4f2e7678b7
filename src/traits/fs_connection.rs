//! # FsConnection Trait
//!
//! An already-open connection supplied by the caller for CONNECTED
//! locations.
//!
//! The session only borrows the connection: it never closes it. Whoever
//! opened it keeps it alive for at least as long as the session.

use std::sync::Arc;

use crate::{Category, FactoryKey, FsIdentity};

/// A live, externally owned connection to a remote or custom store.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{Category, FactoryKey, FsConnection, FsIdentity, FsSyntax};
/// use std::sync::Arc;
///
/// struct BucketConnection {
///     fs: Arc<FsIdentity>,
/// }
///
/// impl FsConnection for BucketConnection {
///     fn filesystem(&self) -> Arc<FsIdentity> {
///         Arc::clone(&self.fs)
///     }
/// }
///
/// let conn = BucketConnection {
///     fs: FsIdentity::new(FactoryKey::new(Category::Connected, Some("s3")), FsSyntax::posix()),
/// };
/// assert!(conn.supports(&FactoryKey::new(Category::Connected, None)));
/// assert!(conn.supports(&FactoryKey::new(Category::Connected, Some("s3"))));
/// assert!(!conn.supports(&FactoryKey::new(Category::Connected, Some("sftp"))));
/// ```
pub trait FsConnection: Send + Sync {
    /// The filesystem this connection is open on.
    fn filesystem(&self) -> Arc<FsIdentity>;

    /// The location spec this connection serves.
    ///
    /// Defaults to the key its filesystem was opened with.
    fn location_spec(&self) -> FactoryKey {
        self.filesystem().key().clone()
    }

    /// Returns `true` if this connection can serve `requested`.
    ///
    /// The default accepts CONNECTED requests whose specifier is absent or
    /// equal to the connection's own.
    fn supports(&self, requested: &FactoryKey) -> bool {
        if requested.category() != Category::Connected {
            return false;
        }
        match requested.specifier() {
            None => true,
            Some(spec) => self.location_spec().specifier() == Some(spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsSyntax;

    struct TestConnection {
        fs: Arc<FsIdentity>,
    }

    impl FsConnection for TestConnection {
        fn filesystem(&self) -> Arc<FsIdentity> {
            Arc::clone(&self.fs)
        }
    }

    fn connection(spec: Option<&str>) -> TestConnection {
        TestConnection {
            fs: FsIdentity::new(FactoryKey::new(Category::Connected, spec), FsSyntax::posix()),
        }
    }

    #[test]
    fn default_location_spec_comes_from_filesystem() {
        let conn = connection(Some("sftp"));
        assert_eq!(
            conn.location_spec(),
            FactoryKey::new(Category::Connected, Some("sftp"))
        );
    }

    #[test]
    fn supports_rejects_other_categories() {
        let conn = connection(None);
        assert!(!conn.supports(&FactoryKey::new(Category::Local, None)));
    }

    #[test]
    fn supports_matches_specifier() {
        let conn = connection(Some("s3"));
        assert!(conn.supports(&FactoryKey::new(Category::Connected, Some("s3"))));
        assert!(!conn.supports(&FactoryKey::new(Category::Connected, Some("gcs"))));

        let anonymous = connection(None);
        assert!(!anonymous.supports(&FactoryKey::new(Category::Connected, Some("s3"))));
    }

    #[test]
    fn connection_can_be_shared() {
        let conn: Arc<dyn FsConnection> = Arc::new(connection(None));
        let other = Arc::clone(&conn);
        assert_eq!(*conn.filesystem(), *other.filesystem());
    }
}
