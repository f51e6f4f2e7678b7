//! Built-in backends for the self-sufficient categories.
//!
//! | Backend | Category | Kind | Working directory |
//! |---------|----------|------|-------------------|
//! | [`LocalBackend`] | LOCAL | shared | process or configured directory |
//! | [`RelativeToBackend`] | RELATIVE_TO | shared | workflow, its data area, or `/` |
//! | [`MountpointBackend`] | MOUNTPOINT | shared | `/` |
//! | [`UrlBackend`] | CUSTOM_URL | per location | `/` |

mod custom_url;
mod local;
mod mountpoint;
mod relative_to;

pub use custom_url::UrlBackend;
pub use local::LocalBackend;
pub use mountpoint::MountpointBackend;
pub use relative_to::RelativeToBackend;
