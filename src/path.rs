//! The filesystem-scoped path value type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{FsIdentity, LocationError, PathAlgebra, Result};

/// An immutable, hierarchical path on one [`FsIdentity`].
///
/// Paths are plain values: every operation that derives a path (parent,
/// normalized, resolved, relativized) returns a new one.
///
/// # Equality
///
/// Two paths are equal when they share the filesystem identity, the absolute
/// flag and the literal segment list. No normalization happens on
/// comparison, but trailing and repeated separators never produce segments,
/// so `"a/b/"` equals `"a/b"`.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{Category, FactoryKey, FsIdentity, FsPath, FsSyntax};
///
/// let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
/// let path = FsPath::parse(&fs, "/reports//2024/q1.csv");
///
/// assert!(path.is_absolute());
/// assert_eq!(path.name_count(), 3);
/// assert_eq!(path.name(1)?, "2024");
/// assert_eq!(path.file_name(), Some("q1.csv"));
/// assert_eq!(path.parent().unwrap().to_string(), "/reports/2024");
/// # Ok::<(), anyfs_location::LocationError>(())
/// ```
#[derive(Clone)]
pub struct FsPath {
    fs: Arc<FsIdentity>,
    absolute: bool,
    segments: Vec<String>,
}

impl FsPath {
    /// Parse `raw` against the syntax of `fs`.
    pub fn parse(fs: &Arc<FsIdentity>, raw: &str) -> Self {
        let (absolute, segments) = fs.syntax().split(raw);
        Self::from_parts(Arc::clone(fs), absolute, segments)
    }

    /// Join `first` and `more` with the filesystem separator, then parse.
    ///
    /// Empty parts are skipped, so an empty `first` never makes the result
    /// absolute.
    pub fn from_segments(fs: &Arc<FsIdentity>, first: &str, more: &[&str]) -> Self {
        let mut raw = String::from(first);
        for part in more.iter().filter(|p| !p.is_empty()) {
            if !raw.is_empty() {
                raw.push(fs.separator());
            }
            raw.push_str(part);
        }
        Self::parse(fs, &raw)
    }

    pub(crate) fn from_parts(fs: Arc<FsIdentity>, absolute: bool, segments: Vec<String>) -> Self {
        Self {
            fs,
            absolute,
            segments,
        }
    }

    /// The filesystem this path belongs to.
    #[inline]
    pub fn filesystem(&self) -> &Arc<FsIdentity> {
        &self.fs
    }

    /// Returns `true` if the path starts at the root.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns `true` for the empty relative path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.absolute && self.segments.is_empty()
    }

    /// Number of names, not counting the root.
    #[inline]
    pub fn name_count(&self) -> usize {
        self.segments.len()
    }

    /// The name at zero-based index `index`.
    ///
    /// # Errors
    ///
    /// - [`LocationError::IndexOutOfRange`] - `index >= name_count()`
    pub fn name(&self, index: usize) -> Result<&str> {
        self.segments
            .get(index)
            .map(String::as_str)
            .ok_or(LocationError::IndexOutOfRange {
                index,
                count: self.segments.len(),
            })
    }

    /// Iterate over the names.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(String::as_str)
    }

    /// The last name, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The parent path.
    ///
    /// `None` for the empty path, a lone root, and a single-name relative
    /// path. The parent of `/a` is `/`.
    pub fn parent(&self) -> Option<FsPath> {
        match (self.absolute, self.segments.len()) {
            (_, 0) | (false, 1) => None,
            (absolute, n) => Some(self.derive(absolute, self.segments[..n - 1].to_vec())),
        }
    }

    /// The root of an absolute path; `None` for relative paths.
    pub fn root(&self) -> Option<FsPath> {
        self.absolute.then(|| self.fs.root())
    }

    /// The relative path made of names `begin..end`.
    ///
    /// # Errors
    ///
    /// - [`LocationError::IllegalArgument`] - empty or out-of-bounds range
    pub fn subpath(&self, begin: usize, end: usize) -> Result<FsPath> {
        if begin >= end || end > self.segments.len() {
            return Err(LocationError::illegal(format!(
                "invalid subpath range {begin}..{end} for {} names",
                self.segments.len()
            )));
        }
        Ok(self.derive(false, self.segments[begin..end].to_vec()))
    }

    /// Returns `true` if `self` begins with all names of `other`.
    ///
    /// Both paths must be on the same filesystem and of the same kind.
    pub fn starts_with(&self, other: &FsPath) -> bool {
        self.fs == other.fs
            && self.absolute == other.absolute
            && self.segments.starts_with(&other.segments)
    }

    /// Returns `true` if `self` ends with all names of `other`.
    ///
    /// An absolute `other` only matches a path equal to it.
    pub fn ends_with(&self, other: &FsPath) -> bool {
        if self.fs != other.fs {
            return false;
        }
        if other.absolute {
            return self == other;
        }
        self.segments.ends_with(&other.segments)
    }

    /// Parse `raw` on this path's filesystem and resolve it against `self`.
    pub fn resolve_str(&self, raw: &str) -> FsPath {
        self.resolve(&FsPath::parse(&self.fs, raw))
    }

    /// Resolve against the filesystem's working directory and normalize.
    pub fn to_absolute_path(&self) -> FsPath {
        if self.absolute {
            self.normalize()
        } else {
            self.fs.working_directory().resolve(self).normalize()
        }
    }

    fn derive(&self, absolute: bool, segments: Vec<String>) -> FsPath {
        Self::from_parts(Arc::clone(&self.fs), absolute, segments)
    }
}

impl PathAlgebra for FsPath {
    fn is_absolute(&self) -> bool {
        self.absolute
    }

    fn segments(&self) -> &[String] {
        &self.segments
    }

    fn with_segments(&self, absolute: bool, segments: Vec<String>) -> Self {
        self.derive(absolute, segments)
    }

    fn is_same_filesystem(&self, other: &Self) -> bool {
        self.fs == other.fs
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fs.syntax().join(self.absolute, &self.segments))
    }
}

impl fmt::Debug for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsPath")
            .field("fs", &self.fs.id())
            .field("path", &self.to_string())
            .finish()
    }
}

impl PartialEq for FsPath {
    fn eq(&self, other: &Self) -> bool {
        self.fs == other.fs && self.absolute == other.absolute && self.segments == other.segments
    }
}

impl Eq for FsPath {}

impl Hash for FsPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fs.id().hash(state);
        self.absolute.hash(state);
        self.segments.hash(state);
    }
}

impl PartialOrd for FsPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FsPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fs
            .id()
            .cmp(&other.fs.id())
            .then(self.absolute.cmp(&other.absolute))
            .then_with(|| self.segments.cmp(&other.segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, FactoryKey, FsSyntax};
    use std::collections::HashSet;

    fn fs() -> Arc<FsIdentity> {
        FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix())
    }

    #[test]
    fn parse_collapses_separators() {
        let fs = fs();
        let p = FsPath::parse(&fs, "//a///b//");
        assert!(p.is_absolute());
        assert_eq!(p.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(p.to_string(), "/a/b");
    }

    #[test]
    fn parse_empty_is_empty_relative() {
        let fs = fs();
        let p = FsPath::parse(&fs, "");
        assert!(p.is_empty());
        assert!(!p.is_absolute());
        assert_eq!(p.to_string(), "");
    }

    #[test]
    fn from_segments_joins_with_separator() {
        let fs = fs();
        let p = FsPath::from_segments(&fs, "/a", &["b", "c/d"]);
        assert_eq!(p, fs.path("/a/b/c/d"));
    }

    #[test]
    fn from_segments_skips_empty_parts() {
        let fs = fs();
        let p = FsPath::from_segments(&fs, "", &["a", "b"]);
        assert!(!p.is_absolute());
        assert_eq!(p, fs.path("a/b"));

        let p = FsPath::from_segments(&fs, "a", &["", "b", ""]);
        assert_eq!(p.to_string(), "a/b");
        assert!(FsPath::from_segments(&fs, "", &[]).is_empty());
    }

    #[test]
    fn trailing_separator_is_not_significant() {
        let fs = fs();
        assert_eq!(fs.path("a/b/"), fs.path("a/b"));
    }

    #[test]
    fn equality_is_literal() {
        let fs = fs();
        assert_ne!(fs.path("a/./b"), fs.path("a/b"));
        assert_ne!(fs.path("/a"), fs.path("a"));
    }

    #[test]
    fn equality_rejects_other_filesystems() {
        let a = fs();
        let b = fs();
        assert_eq!(a.path("a/b").to_string(), b.path("a/b").to_string());
        assert_ne!(a.path("a/b"), b.path("a/b"));
    }

    #[test]
    fn hash_agrees_with_equality() {
        let fs = fs();
        let set: HashSet<FsPath> = [fs.path("/a/b"), fs.path("/a/b/"), fs.path("/a")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn name_out_of_range() {
        let fs = fs();
        let p = fs.path("/a/b");
        assert_eq!(p.name(0).unwrap(), "a");
        assert!(matches!(
            p.name(2),
            Err(LocationError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn parent_rules() {
        let fs = fs();
        assert_eq!(fs.path("/a/b").parent(), Some(fs.path("/a")));
        assert_eq!(fs.path("/a").parent(), Some(fs.path("/")));
        assert_eq!(fs.path("a/b").parent(), Some(fs.path("a")));
        assert_eq!(fs.path("/").parent(), None);
        assert_eq!(fs.path("").parent(), None);
        assert_eq!(fs.path("a").parent(), None);
        assert_eq!(fs.path(".").parent(), None);
    }

    #[test]
    fn root_only_for_absolute() {
        let fs = fs();
        assert_eq!(fs.path("/a/b").root(), Some(fs.path("/")));
        assert_eq!(fs.path("a/b").root(), None);
    }

    #[test]
    fn subpath_is_relative() {
        let fs = fs();
        let p = fs.path("/a/b/c/d");
        assert_eq!(p.subpath(1, 3).unwrap(), fs.path("b/c"));
        assert!(p.subpath(2, 2).is_err());
        assert!(p.subpath(0, 5).is_err());
    }

    #[test]
    fn starts_and_ends_with() {
        let fs = fs();
        let p = fs.path("/a/b/c");
        assert!(p.starts_with(&fs.path("/a/b")));
        assert!(!p.starts_with(&fs.path("a/b")));
        assert!(p.ends_with(&fs.path("b/c")));
        assert!(p.ends_with(&fs.path("/a/b/c")));
        assert!(!p.ends_with(&fs.path("/b/c")));
        let other = self::fs();
        assert!(!p.starts_with(&other.path("/a")));
    }

    #[test]
    fn resolve_str_uses_same_filesystem() {
        let fs = fs();
        let p = fs.path("/a").resolve_str("b/../c");
        assert_eq!(p, fs.path("/a/b/../c"));
        assert_eq!(p.normalize(), fs.path("/a/c"));
    }

    #[test]
    fn resolve_across_filesystems_keeps_base_filesystem() {
        let base_fs = fs();
        let other_fs = fs();
        let base = base_fs.path("/a");

        let joined = base.resolve(&other_fs.path("b/c"));
        assert_eq!(joined.filesystem(), &base_fs);
        assert_eq!(joined, base_fs.path("/a/b/c"));

        let absolute = base.resolve(&other_fs.path("/x"));
        assert_eq!(absolute.filesystem(), &other_fs);
        assert!(base.relativize(&other_fs.path("/a/b")).is_err());
    }

    #[test]
    fn to_absolute_path_uses_working_directory() {
        let fs = FsIdentity::with_working_directory(
            FactoryKey::new(Category::RelativeTo, Some("workflow")),
            FsSyntax::posix(),
            "/Users/flow",
        );
        assert_eq!(fs.path("data/../in.csv").to_absolute_path(), fs.path("/Users/flow/in.csv"));
        assert_eq!(fs.path("../../../x").to_absolute_path(), fs.path("/x"));
        assert_eq!(fs.path("/a/./b").to_absolute_path(), fs.path("/a/b"));
    }

    #[test]
    fn relativize_across_filesystems_fails() {
        let a = fs();
        let b = fs();
        assert!(matches!(
            a.path("/x").relativize(&b.path("/x/y")),
            Err(LocationError::IllegalArgument { .. })
        ));
    }

    #[test]
    fn ordering_within_filesystem() {
        let fs = fs();
        let mut paths = vec![fs.path("/b"), fs.path("/a/c"), fs.path("/a")];
        paths.sort();
        assert_eq!(paths, vec![fs.path("/a"), fs.path("/a/c"), fs.path("/b")]);
    }

    #[test]
    fn custom_separator_round_trips() {
        let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::new('\\', "\\"));
        let p = fs.path("\\a\\b");
        assert_eq!(p.to_string(), "\\a\\b");
        assert_eq!(p.parent().unwrap().to_string(), "\\a");
    }
}
