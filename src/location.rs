//! Serializable location descriptors and their cache keys.
//!
//! A [`LocationDescriptor`] names a location without binding to a live
//! connection, so it can be stored in settings or shipped across process
//! boundaries. The [`FactoryKey`] is the coarser (category, specifier) part
//! used by a [`ResolutionSession`](crate::ResolutionSession) to reuse
//! resolver factories.

use std::fmt;
use std::str::FromStr;

use crate::{LocationError, Result};

/// Backend category of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Category {
    /// The local disk of the running process.
    Local,
    /// A store relative to the current workflow or its mountpoint.
    RelativeTo,
    /// A named mountpoint.
    Mountpoint,
    /// An arbitrary URL.
    CustomUrl,
    /// A store reached through an externally supplied connection.
    Connected,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Local,
        Category::RelativeTo,
        Category::Mountpoint,
        Category::CustomUrl,
        Category::Connected,
    ];

    /// The upper-case name used in descriptors and messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Local => "LOCAL",
            Category::RelativeTo => "RELATIVE_TO",
            Category::Mountpoint => "MOUNTPOINT",
            Category::CustomUrl => "CUSTOM_URL",
            Category::Connected => "CONNECTED",
        }
    }

    /// Returns `true` if descriptors of this category need a specifier.
    pub const fn requires_specifier(&self) -> bool {
        matches!(self, Category::RelativeTo | Category::Mountpoint)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LocationError::illegal(format!("unknown location category: {s}")))
    }
}

/// What a RELATIVE_TO location is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeTo {
    /// The directory of the current workflow.
    Workflow,
    /// The root of the mountpoint that contains the current workflow.
    Mountpoint,
    /// The data area inside the current workflow.
    WorkflowData,
}

impl RelativeTo {
    /// Specifier string for this mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RelativeTo::Workflow => "workflow",
            RelativeTo::Mountpoint => "mountpoint",
            RelativeTo::WorkflowData => "workflow-data",
        }
    }
}

impl fmt::Display for RelativeTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeTo {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "workflow" => Ok(RelativeTo::Workflow),
            "mountpoint" => Ok(RelativeTo::Mountpoint),
            "workflow-data" => Ok(RelativeTo::WorkflowData),
            other => Err(LocationError::invalid(
                Category::RelativeTo,
                format!("unknown relative-to mode: {other}"),
            )),
        }
    }
}

/// Cache key for resolver factories: category plus optional specifier.
///
/// Carries no path: every descriptor naming the same backend maps to the
/// same factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryKey {
    category: Category,
    specifier: Option<String>,
}

impl FactoryKey {
    /// Create a key.
    pub fn new(category: Category, specifier: Option<&str>) -> Self {
        Self {
            category,
            specifier: specifier.map(str::to_owned),
        }
    }

    /// The category.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The specifier, if any.
    #[inline]
    pub fn specifier(&self) -> Option<&str> {
        self.specifier.as_deref()
    }
}

impl fmt::Display for FactoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Some(spec) => write!(f, "({}, {spec})", self.category),
            None => write!(f, "({})", self.category),
        }
    }
}

/// A flat, serializable (category, specifier, path) triple.
///
/// # Example
///
/// ```rust
/// use anyfs_location::{Category, LocationDescriptor};
///
/// let loc = LocationDescriptor::relative_to("workflow", "data/input.csv");
/// assert!(loc.validate().is_ok());
/// assert_eq!(loc.category(), Category::RelativeTo);
/// assert_eq!(loc.to_string(), "(RELATIVE_TO, workflow, data/input.csv)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationDescriptor {
    category: Category,
    #[cfg_attr(feature = "serde", serde(default))]
    specifier: Option<String>,
    path: String,
}

impl LocationDescriptor {
    /// Create a descriptor from its three parts.
    pub fn new(category: Category, specifier: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            category,
            specifier: specifier.map(str::to_owned),
            path: path.into(),
        }
    }

    /// A location on the local disk.
    pub fn local(path: impl Into<String>) -> Self {
        Self::new(Category::Local, None, path)
    }

    /// A location relative to the workflow or mountpoint named by `mode`.
    pub fn relative_to(mode: &str, path: impl Into<String>) -> Self {
        Self::new(Category::RelativeTo, Some(mode), path)
    }

    /// A location inside the mountpoint `mount_id`.
    pub fn mountpoint(mount_id: &str, path: impl Into<String>) -> Self {
        Self::new(Category::Mountpoint, Some(mount_id), path)
    }

    /// A URL location.
    pub fn custom_url(url: impl Into<String>) -> Self {
        Self::new(Category::CustomUrl, None, url)
    }

    /// A location served by the session's supplied connection.
    pub fn connected(path: impl Into<String>) -> Self {
        Self::new(Category::Connected, None, path)
    }

    /// The category.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The specifier, if any.
    #[inline]
    pub fn specifier(&self) -> Option<&str> {
        self.specifier.as_deref()
    }

    /// The raw, unparsed path string.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The (category, specifier) part of this descriptor.
    pub fn factory_key(&self) -> FactoryKey {
        FactoryKey::new(self.category, self.specifier())
    }

    /// Check that the descriptor is complete for its category.
    ///
    /// CONNECTED descriptors always pass here; whether a connection exists
    /// is only known at resolution time.
    ///
    /// # Errors
    ///
    /// - [`LocationError::InvalidLocation`] - RELATIVE_TO or MOUNTPOINT
    ///   without a specifier
    pub fn validate(&self) -> Result<()> {
        if self.category.requires_specifier()
            && self.specifier().is_none_or(|s| s.trim().is_empty())
        {
            return Err(LocationError::invalid(
                self.category,
                "a specifier is required",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Some(spec) => write!(f, "({}, {spec}, {})", self.category, self.path),
            None => write!(f, "({}, {})", self.category, self.path),
        }
    }
}
