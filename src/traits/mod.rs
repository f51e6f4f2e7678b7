//! # Path Traits
//!
//! The seams of the crate: the shared path algebra and the two backend
//! capability interfaces.
//!
//! ## Quick Reference
//!
//! | Trait | Implemented by | Purpose |
//! |-------|----------------|---------|
//! | [`PathAlgebra`] | path types | `normalize`, `relativize`, `resolve` (provided) |
//! | [`FsBackend`] | built-in and custom backends | raw string → path, resource release |
//! | [`FsConnection`] | caller-supplied connections | CONNECTED locations |
//!
//! ## Thread Safety
//!
//! [`FsBackend`] and [`FsConnection`] require `Send + Sync` and take `&self`,
//! so a backend can be shared by every provider of its factory.
//!
//! ## Object Safety
//!
//! [`FsBackend`] and [`FsConnection`] are object-safe and are stored as
//! `Box<dyn FsBackend>` / `Arc<dyn FsConnection>`. [`PathAlgebra`] returns
//! `Self` and is used through generics instead.

mod fs_backend;
mod fs_connection;
mod path_algebra;

pub use fs_backend::FsBackend;
pub use fs_connection::FsConnection;
pub use path_algebra::PathAlgebra;
