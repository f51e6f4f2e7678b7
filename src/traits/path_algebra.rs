//! # PathAlgebra Trait
//!
//! Lexical path algebra with default implementations.
//!
//! ## Responsibility
//! - Normalize, relativize and resolve segment-based paths
//!
//! ## Dependencies
//! - [`LocationError`] for error handling
//!
//! ## Usage
//!
//! ```rust
//! use anyfs_location::{Category, FactoryKey, FsIdentity, FsSyntax, PathAlgebra};
//!
//! let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
//!
//! let path = fs.path("/a/b/../../abc/./de").normalize();
//! assert_eq!(path.to_string(), "/abc/de");
//!
//! let rel = fs.path("/ab/cd").relativize(&fs.path("/ab/xy"))?;
//! assert_eq!(rel.to_string(), "../xy");
//! # Ok::<(), anyfs_location::LocationError>(())
//! ```

use crate::{LocationError, Result};

// ============================================================================
// Constants
// ============================================================================

const CURRENT_DIR: &str = ".";
const PARENT_DIR: &str = "..";

// ============================================================================
// Trait Definition
// ============================================================================

/// Path algebra shared by every segment-based path type.
///
/// Implementors only expose their segments and absolute flag; the algorithms
/// are provided. Nothing here touches a filesystem: `..` is handled purely
/// lexically and segments are compared literally.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{Category, FactoryKey, FsIdentity, FsSyntax, PathAlgebra};
///
/// let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
/// let base = fs.path("/data");
/// let target = fs.path("/data/2024/q1.csv");
///
/// let rel = base.relativize(&target)?;
/// assert_eq!(base.resolve(&rel), target);
/// # Ok::<(), anyfs_location::LocationError>(())
/// ```
pub trait PathAlgebra: Sized {
    /// Returns `true` if the path starts at the filesystem root.
    fn is_absolute(&self) -> bool;

    /// The path's segments, in order. Never contains empty strings.
    fn segments(&self) -> &[String];

    /// Build a path of the same filesystem from an absolute flag and segments.
    fn with_segments(&self, absolute: bool, segments: Vec<String>) -> Self;

    /// Returns `true` if `other` lives on the same filesystem as `self`.
    ///
    /// Types without a notion of filesystem keep the default.
    fn is_same_filesystem(&self, _other: &Self) -> bool {
        true
    }

    /// Remove `.` segments and cancel `..` against preceding real segments.
    ///
    /// On an absolute path, `..` at the root is dropped. On a relative path,
    /// `..` that has nothing to cancel is kept as a leading segment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use anyfs_location::{Category, FactoryKey, FsIdentity, FsSyntax, PathAlgebra};
    ///
    /// let fs = FsIdentity::new(FactoryKey::new(Category::Local, None), FsSyntax::posix());
    /// assert_eq!(fs.path("../../b").normalize().to_string(), "../../b");
    /// assert_eq!(fs.path("/../b").normalize().to_string(), "/b");
    /// ```
    fn normalize(&self) -> Self {
        let segments = default_normalize(self.is_absolute(), self.segments());
        self.with_segments(self.is_absolute(), segments)
    }

    /// Compute the path that, resolved against `self`, yields `other`.
    ///
    /// The common prefix is computed on literal segments. Callers that want
    /// `..` inside either path to be honoured must normalize first.
    ///
    /// # Errors
    ///
    /// - [`LocationError::IllegalArgument`] - exactly one of the paths is
    ///   absolute, or the paths belong to different filesystems
    fn relativize(&self, other: &Self) -> Result<Self> {
        if !self.is_same_filesystem(other) {
            return Err(LocationError::illegal(
                "cannot relativize paths of different filesystems",
            ));
        }
        if self.is_absolute() != other.is_absolute() {
            return Err(LocationError::illegal(
                "cannot relativize an absolute and a relative path",
            ));
        }
        let segments = default_relativize(self.segments(), other.segments());
        Ok(self.with_segments(false, segments))
    }

    /// Append `other` to `self`, unless `other` is absolute.
    ///
    /// An empty relative `other` returns `self` unchanged. Unlike
    /// [`relativize`](Self::relativize), this never fails: a relative `other`
    /// is taken as plain names, so the result lives on `self`'s filesystem
    /// even when `other` came from another one. An absolute `other` is
    /// returned as is, on its own filesystem.
    fn resolve(&self, other: &Self) -> Self {
        if other.is_absolute() {
            return other.with_segments(true, other.segments().to_vec());
        }
        let segments = default_resolve(self.segments(), other.segments());
        self.with_segments(self.is_absolute(), segments)
    }
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Stack-based lexical normalization.
fn default_normalize(absolute: bool, segments: &[String]) -> Vec<String> {
    let mut stack: Vec<String> = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment.as_str() {
            CURRENT_DIR => {}
            PARENT_DIR => match stack.last() {
                Some(top) if top != PARENT_DIR => {
                    stack.pop();
                }
                // Nothing to cancel: clamp at the root
                _ if absolute => {}
                _ => stack.push(segment.clone()),
            },
            _ => stack.push(segment.clone()),
        }
    }

    stack
}

/// Literal-prefix relativization.
fn default_relativize(base: &[String], target: &[String]) -> Vec<String> {
    let common = base
        .iter()
        .zip(target)
        .take_while(|(b, t)| b == t)
        .count();

    let mut out = Vec::with_capacity(base.len() - common + target.len() - common);
    out.extend(std::iter::repeat_n(PARENT_DIR.to_owned(), base.len() - common));
    out.extend(target[common..].iter().cloned());
    out
}

/// Concatenation of two segment lists.
fn default_resolve(base: &[String], other: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(base.len() + other.len());
    out.extend_from_slice(base);
    out.extend_from_slice(other);
    out
}

// ============================================================================
// Tests
// ============================================================================
