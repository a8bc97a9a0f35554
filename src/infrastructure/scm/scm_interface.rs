use async_trait::async_trait;
use std::path::Path;

use crate::domain::value_objects::git_url::GitUrl;

/// Source control operations needed to register projects
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Clone a repository from the given URL into `dest_path`
    async fn clone_repository(&self, url: &GitUrl, dest_path: &Path) -> Result<(), ScmError>;

    /// Check if a directory is a repository (contains a `.git` entry)
    fn is_repository(&self, path: &Path) -> bool;

    /// Fetch URL of `origin`, else of the first configured remote
    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>, ScmError>;
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Clone of {url} failed: {message}")]
    CloneFailed { url: String, message: String },

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("Cannot read repository at {path}: {source}")]
    RepositoryUnreadable {
        path: String,
        #[source]
        source: git2::Error,
    },
}

impl ScmError {
    /// Create a clone failed error
    pub fn clone_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloneFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an executable not found error
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Create a repository unreadable error
    pub fn unreadable(path: &Path, source: git2::Error) -> Self {
        Self::RepositoryUnreadable {
            path: path.display().to_string(),
            source,
        }
    }
}
