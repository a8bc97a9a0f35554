use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::name_resolver::ResolveError;
use crate::application::use_cases::bulk_scan::BulkScanError;
use crate::application::use_cases::open_project::LaunchError;
use crate::application::use_cases::register_repository::RegisterRepositoryError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::filesystem::project_store::ProjectStoreError;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    NotFound = 3,
    Ambiguous = 4,
    Store = 5,
    External = 6,
    Incomplete = 7,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Error, Debug)]
pub enum PjError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Register(#[from] RegisterRepositoryError),

    #[error(transparent)]
    Scan(#[from] BulkScanError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Store(#[from] ProjectStoreError),

    #[error(transparent)]
    Config(#[from] ConfigStoreError),

    #[error("{failed} of {total} launch steps failed")]
    LaunchIncomplete { failed: usize, total: usize },

    #[error("{failed} repositories could not be registered")]
    ScanIncomplete { failed: usize },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PjError {
    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }

    /// Exit code reported to the shell for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Resolve(ResolveError::Ambiguous { .. }) => ExitCode::Ambiguous,
            Self::Resolve(_) => ExitCode::NotFound,
            Self::Launch(LaunchError::MissingDirectory { .. }) => ExitCode::NotFound,
            Self::Register(RegisterRepositoryError::Store(_))
            | Self::Scan(BulkScanError::Store(_))
            | Self::Store(_) => ExitCode::Store,
            Self::Register(RegisterRepositoryError::Scm(_)) => ExitCode::External,
            Self::LaunchIncomplete { .. } | Self::ScanIncomplete { .. } => ExitCode::Incomplete,
            Self::Config(_) => ExitCode::Usage,
            _ => ExitCode::Error,
        }
    }

    /// Map an anyhow error to an exit code by walking its chain
    pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<PjError>())
            .map(PjError::exit_code)
            .unwrap_or(ExitCode::Error)
    }
}

impl From<std::io::Error> for PjError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_resolve_errors_map_to_exit_codes() {
        let not_found: PjError = ResolveError::NotFound {
            query: "zzz".to_string(),
        }
        .into();
        assert_eq!(not_found.exit_code(), ExitCode::NotFound);

        let ambiguous: PjError = ResolveError::Ambiguous {
            query: "foo".to_string(),
            candidates: vec!["foo-bar".to_string(), "foo-baz".to_string()],
        }
        .into();
        assert_eq!(ambiguous.exit_code(), ExitCode::Ambiguous);
        assert_eq!(ambiguous.exit_code().code(), 4);
    }

    #[test]
    fn test_incomplete_runs_are_failures() {
        let error = PjError::LaunchIncomplete { failed: 1, total: 6 };
        assert_eq!(error.to_string(), "1 of 6 launch steps failed");
        assert_eq!(error.exit_code(), ExitCode::Incomplete);
    }

    #[test]
    fn test_exit_code_through_anyhow_context() {
        let result = Err::<(), _>(PjError::ScanIncomplete { failed: 2 })
            .context("bulk scan of /tmp/projects");
        let error = result.unwrap_err();
        assert_eq!(PjError::exit_code_for(&error), ExitCode::Incomplete);

        let plain = anyhow::anyhow!("something else");
        assert_eq!(PjError::exit_code_for(&plain), ExitCode::Error);
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: PjError = io_error.into();
        assert!(matches!(error, PjError::FileSystemError { .. }));
        assert_eq!(error.exit_code(), ExitCode::Error);
    }
}
