//! Filesystem identity and path syntax.
//!
//! Every [`FsPath`] is scoped to an [`FsIdentity`]. Identities compare by
//! instance, so two paths with the same text but opened through different
//! backends never compare equal.

use std::hash::{Hash, Hasher};
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Category, FactoryKey, FsPath};

static NEXT_FS_ID: AtomicU64 = AtomicU64::new(1);

/// Separator and root marker of a single-root filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FsSyntax {
    separator: char,
    root: String,
}

impl FsSyntax {
    /// Create a syntax from a separator and a root marker.
    ///
    /// An empty root falls back to the separator.
    pub fn new(separator: char, root: impl Into<String>) -> Self {
        let root = root.into();
        let root = if root.is_empty() {
            separator.to_string()
        } else {
            root
        };
        Self { separator, root }
    }

    /// `/`-separated syntax rooted at `/`.
    pub fn posix() -> Self {
        Self::new('/', "/")
    }

    /// Syntax of the platform's local filesystem.
    pub fn local() -> Self {
        Self::new(MAIN_SEPARATOR, MAIN_SEPARATOR_STR)
    }

    /// The name separator.
    #[inline]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The root marker.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Split `raw` into its absolute flag and non-empty segments.
    pub(crate) fn split(&self, raw: &str) -> (bool, Vec<String>) {
        let (absolute, rest) = match raw.strip_prefix(self.root.as_str()) {
            Some(rest) => (true, rest),
            None if raw.starts_with(self.separator) => (true, raw),
            None => (false, raw),
        };
        let segments = rest
            .split(self.separator)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        (absolute, segments)
    }

    /// Render segments back into a path string.
    pub(crate) fn join(&self, absolute: bool, segments: &[String]) -> String {
        let mut out = String::new();
        if absolute {
            out.push_str(&self.root);
        }
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            out.push_str(segment);
        }
        out
    }
}

impl Default for FsSyntax {
    fn default() -> Self {
        Self::posix()
    }
}

/// Identity of one opened filesystem instance.
///
/// Created by backends (and by connections for CONNECTED stores). Cheap to
/// share: paths hold an `Arc<FsIdentity>`.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{Category, FactoryKey, FsIdentity, FsSyntax};
///
/// let fs_a = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
/// let fs_b = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
///
/// assert_eq!(fs_a.path("a/b"), fs_a.path("a/b/"));
/// assert_ne!(fs_a.path("a/b"), fs_b.path("a/b"));
/// ```
#[derive(Debug)]
pub struct FsIdentity {
    id: u64,
    key: FactoryKey,
    syntax: FsSyntax,
    working_dir: Vec<String>,
}

impl FsIdentity {
    /// Create a new identity whose working directory is the root.
    pub fn new(key: FactoryKey, syntax: FsSyntax) -> Arc<Self> {
        Self::with_working_directory(key, syntax, "")
    }

    /// Create a new identity with the given working directory.
    ///
    /// The working directory is always taken as absolute and normalized
    /// lexically; `..` never climbs above the root.
    pub fn with_working_directory(key: FactoryKey, syntax: FsSyntax, working_dir: &str) -> Arc<Self> {
        let (_, segments) = syntax.split(working_dir);
        let mut working = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment.as_str() {
                "." => {}
                ".." => {
                    working.pop();
                }
                _ => working.push(segment),
            }
        }
        Arc::new(Self {
            id: NEXT_FS_ID.fetch_add(1, Ordering::Relaxed),
            key,
            syntax,
            working_dir: working,
        })
    }

    /// Process-unique id of this identity.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The location spec this filesystem was opened for.
    #[inline]
    pub fn key(&self) -> &FactoryKey {
        &self.key
    }

    /// Shorthand for `self.key().category()`.
    #[inline]
    pub fn category(&self) -> Category {
        self.key.category()
    }

    /// Separator and root marker.
    #[inline]
    pub fn syntax(&self) -> &FsSyntax {
        &self.syntax
    }

    /// The name separator.
    #[inline]
    pub fn separator(&self) -> char {
        self.syntax.separator()
    }

    /// Parse `raw` as a path on this filesystem.
    pub fn path(self: &Arc<Self>, raw: &str) -> FsPath {
        FsPath::parse(self, raw)
    }

    /// The single root of this filesystem.
    pub fn root(self: &Arc<Self>) -> FsPath {
        FsPath::from_parts(Arc::clone(self), true, Vec::new())
    }

    /// The directory relative paths are resolved against.
    pub fn working_directory(self: &Arc<Self>) -> FsPath {
        FsPath::from_parts(Arc::clone(self), true, self.working_dir.clone())
    }
}

impl PartialEq for FsIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FsIdentity {}

impl Hash for FsIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_key() -> FactoryKey {
        FactoryKey::new(Category::Local, None)
    }

    #[test]
    fn split_detects_root_and_drops_empty_segments() {
        let syntax = FsSyntax::posix();
        assert_eq!(
            syntax.split("//a///b/"),
            (true, vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(syntax.split("a/b"), (false, vec!["a".to_string(), "b".to_string()]));
        assert_eq!(syntax.split(""), (false, vec![]));
        assert_eq!(syntax.split("/"), (true, vec![]));
    }

    #[test]
    fn split_honours_custom_separator() {
        let syntax = FsSyntax::new('\\', "\\");
        assert_eq!(
            syntax.split("\\x\\y"),
            (true, vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(syntax.split("x/y"), (false, vec!["x/y".to_string()]));
    }

    #[test]
    fn join_prefixes_root_for_absolute() {
        let syntax = FsSyntax::posix();
        let segs = vec!["a".to_string(), "b".to_string()];
        assert_eq!(syntax.join(true, &segs), "/a/b");
        assert_eq!(syntax.join(false, &segs), "a/b");
        assert_eq!(syntax.join(true, &[]), "/");
        assert_eq!(syntax.join(false, &[]), "");
    }

    #[test]
    fn empty_root_falls_back_to_separator() {
        assert_eq!(FsSyntax::new('/', "").root(), "/");
    }

    #[test]
    fn identities_are_distinct_per_instance() {
        let a = FsIdentity::new(local_key(), FsSyntax::posix());
        let b = FsIdentity::new(local_key(), FsSyntax::posix());
        assert_ne!(a.id(), b.id());
        assert_ne!(*a, *b);
        assert_eq!(*a, *Arc::clone(&a));
    }

    #[test]
    fn working_directory_is_absolute_and_clamped() {
        let fs = FsIdentity::with_working_directory(local_key(), FsSyntax::posix(), "w/./x/../../../y");
        let wd = fs.working_directory();
        assert!(wd.is_absolute());
        assert_eq!(wd.to_string(), "/y");
    }

    #[test]
    fn root_is_absolute_and_empty() {
        let fs = FsIdentity::new(local_key(), FsSyntax::posix());
        let root = fs.root();
        assert!(root.is_absolute());
        assert_eq!(root.name_count(), 0);
        assert_eq!(root.to_string(), "/");
    }
}
