//! RELATIVE_TO backend: paths relative to the current workflow.

use std::sync::Arc;

use crate::{
    Category, FactoryKey, FsBackend, FsIdentity, FsSyntax, LocationError, RelativeTo,
    ResolverConfig, Result,
};

/// Name of the data area inside a workflow.
const WORKFLOW_DATA_DIR: &str = "data";

/// A `/`-separated view of the mountpoint holding the current workflow.
///
/// The specifier selects the working directory relative paths resolve
/// against: the workflow itself, its data area, or the mountpoint root.
#[derive(Debug)]
pub struct RelativeToBackend {
    fs: Arc<FsIdentity>,
    mode: RelativeTo,
}

impl RelativeToBackend {
    /// Open the backend for `key`.
    ///
    /// # Errors
    ///
    /// - [`LocationError::InvalidLocation`] - missing or unknown specifier
    /// - [`LocationError::ContextUnavailable`] - a workflow-relative mode
    ///   without a configured workflow path
    pub fn open(key: &FactoryKey, config: &ResolverConfig) -> Result<Self> {
        let mode: RelativeTo = key
            .specifier()
            .ok_or_else(|| LocationError::invalid(Category::RelativeTo, "a specifier is required"))?
            .parse()?;

        let working_dir = match mode {
            RelativeTo::Mountpoint => String::from("/"),
            RelativeTo::Workflow => workflow_path(config, mode)?.to_owned(),
            RelativeTo::WorkflowData => {
                format!("{}/{WORKFLOW_DATA_DIR}", workflow_path(config, mode)?)
            }
        };

        tracing::debug!(key = %key, working_dir = %working_dir, "opened relative-to filesystem");
        Ok(Self {
            fs: FsIdentity::with_working_directory(key.clone(), FsSyntax::posix(), &working_dir),
            mode,
        })
    }

    /// What paths are relative to.
    pub fn mode(&self) -> RelativeTo {
        self.mode
    }
}

fn workflow_path(config: &ResolverConfig, mode: RelativeTo) -> Result<&str> {
    config
        .workflow()
        .ok_or_else(|| LocationError::ContextUnavailable {
            reason: format!("no current workflow to resolve {mode}-relative locations"),
        })
}

impl FsBackend for RelativeToBackend {
    fn filesystem(&self) -> &Arc<FsIdentity> {
        &self.fs
    }

    fn close(&self) -> Result<()> {
        tracing::debug!(key = %self.fs.key(), "closed relative-to filesystem");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(spec: &str) -> FactoryKey {
        FactoryKey::new(Category::RelativeTo, Some(spec))
    }

    fn config() -> ResolverConfig {
        ResolverConfig::new().workflow_path("/Users/flow")
    }

    #[test]
    fn workflow_mode_resolves_against_workflow() {
        let backend = RelativeToBackend::open(&key("workflow"), &config()).unwrap();
        assert_eq!(backend.mode(), RelativeTo::Workflow);
        let path = backend.resolve("../other/in.csv").unwrap();
        assert_eq!(path.to_absolute_path().to_string(), "/Users/other/in.csv");
    }

    #[test]
    fn workflow_data_mode_appends_data_dir() {
        let backend = RelativeToBackend::open(&key("workflow-data"), &config()).unwrap();
        assert_eq!(
            backend.filesystem().working_directory().to_string(),
            "/Users/flow/data"
        );
    }

    #[test]
    fn mountpoint_mode_needs_no_workflow() {
        let backend = RelativeToBackend::open(&key("mountpoint"), &ResolverConfig::default()).unwrap();
        assert_eq!(backend.filesystem().working_directory().to_string(), "/");
    }

    #[test]
    fn workflow_mode_without_context_fails() {
        let err = RelativeToBackend::open(&key("workflow"), &ResolverConfig::default()).unwrap_err();
        assert!(matches!(err, LocationError::ContextUnavailable { .. }));
    }

    #[test]
    fn unknown_or_missing_mode_is_invalid() {
        assert!(matches!(
            RelativeToBackend::open(&key("space"), &config()),
            Err(LocationError::InvalidLocation { .. })
        ));
        assert!(matches!(
            RelativeToBackend::open(&FactoryKey::new(Category::RelativeTo, None), &config()),
            Err(LocationError::InvalidLocation { .. })
        ));
    }
}
