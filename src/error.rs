//! Error types for path algebra and location resolution.

use crate::Category;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LocationError>;

/// Location error type with contextual variants.
///
/// Every variant is fatal only to the operation that returned it. A session
/// that produced one of these errors stays usable.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use anyfs_location::{Category, LocationError};
///
/// let err = LocationError::InvalidLocation {
///     category: Category::Mountpoint,
///     reason: "missing specifier".into(),
/// };
/// assert_eq!(err.to_string(), "invalid MOUNTPOINT location: missing specifier");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    // Descriptor Errors
    /// A descriptor is structurally incomplete for its category.
    #[error("invalid {category} location: {reason}")]
    InvalidLocation {
        /// Category of the offending descriptor.
        category: Category,
        /// What is wrong with it.
        reason: String,
    },

    /// No backend is registered for the category.
    #[error("no backend registered for {category} locations")]
    UnsupportedCategory {
        /// The unsupported category.
        category: Category,
    },

    /// Context needed to resolve the location is not available.
    #[error("context unavailable: {reason}")]
    ContextUnavailable {
        /// What is missing.
        reason: String,
    },

    // Connection Errors
    /// A CONNECTED location was requested but no connection was supplied.
    #[error("CONNECTED location requested without a connection")]
    MissingConnection,

    /// The supplied connection cannot serve the requested location.
    #[error("connection {connection} cannot serve location {requested}")]
    IncompatibleLocation {
        /// Location spec of the supplied connection.
        connection: String,
        /// Location spec that was requested.
        requested: String,
    },

    // Path Algebra Errors
    /// A path operation precondition was violated.
    #[error("illegal argument: {reason}")]
    IllegalArgument {
        /// The violated precondition.
        reason: String,
    },

    /// A name index was out of bounds.
    #[error("name index {index} out of range (name count {count})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of names in the path.
        count: usize,
    },

    // Lifecycle Errors
    /// The resolution session has already been closed.
    #[error("resolution session is closed")]
    SessionClosed,

    // Data Errors
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Failure reported by a backend, passed through unchanged.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl LocationError {
    pub(crate) fn invalid(category: Category, reason: impl Into<String>) -> Self {
        LocationError::InvalidLocation {
            category,
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        LocationError::IllegalArgument {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for LocationError {
    fn from(error: std::io::Error) -> Self {
        LocationError::Backend(Box::new(error))
    }
}
