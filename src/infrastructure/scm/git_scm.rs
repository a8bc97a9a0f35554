use super::scm_interface::{ScmError, ScmOperations};
use crate::domain::value_objects::git_url::GitUrl;
use crate::infrastructure::process::command_runner::{CommandRunner, CommandSpec, ProcessError};
use async_trait::async_trait;
use git2::Repository as Git2Repository;
use std::path::Path;
use tracing::{debug, info};

/// Git implementation of SCM operations
///
/// Cloning shells out to the `git` executable so the user's credential
/// helpers and SSH agent apply; inspection goes through `git2`.
pub struct GitScm {
    git_executable: String,
    runner: CommandRunner,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            runner: CommandRunner::new(),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
            ..Self::default()
        }
    }

    /// Build the clone command; `--` keeps the URL from being read as an option
    fn clone_command(&self, url: &GitUrl, dest_path: &Path) -> CommandSpec {
        CommandSpec::new(&self.git_executable)
            .args(["clone", "--"])
            .arg(url.as_str())
            .arg(dest_path.to_string_lossy())
    }
}

#[async_trait]
impl ScmOperations for GitScm {
    async fn clone_repository(&self, url: &GitUrl, dest_path: &Path) -> Result<(), ScmError> {
        info!("Cloning {} into {}", url, dest_path.display());

        let command = self.clone_command(url, dest_path);
        match self.runner.run_checked(&command).await {
            Ok(_) => Ok(()),
            Err(ProcessError::ProgramNotFound { program }) => {
                Err(ScmError::executable_not_found(program))
            }
            Err(ProcessError::CommandFailed { stderr, .. }) => {
                Err(ScmError::clone_failed(url.as_str(), stderr))
            }
            Err(e) => Err(ScmError::clone_failed(url.as_str(), e.to_string())),
        }
    }

    fn is_repository(&self, path: &Path) -> bool {
        // `.git` may be a directory or a gitfile (worktrees, submodules)
        path.join(".git").exists()
    }

    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        let repo = Git2Repository::open(repo_path).map_err(|e| ScmError::unreadable(repo_path, e))?;

        if let Ok(origin) = repo.find_remote("origin") {
            if let Some(url) = origin.url() {
                return Ok(Some(url.to_string()));
            }
        }

        let names = repo
            .remotes()
            .map_err(|e| ScmError::unreadable(repo_path, e))?;

        for name in names.iter().flatten() {
            if let Ok(remote) = repo.find_remote(name) {
                if let Some(url) = remote.url() {
                    debug!("No origin in {}, using remote {}", repo_path.display(), name);
                    return Ok(Some(url.to_string()));
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, Git2Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Git2Repository::init(temp_dir.path()).unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_clone_command_separates_url() {
        let scm = GitScm::new();
        let url = GitUrl::new("https://example.com/foo.git").unwrap();
        let command = scm.clone_command(&url, Path::new("/tmp/foo"));
        assert_eq!(command.program, "git");
        assert_eq!(
            command.args,
            vec!["clone", "--", "https://example.com/foo.git", "/tmp/foo"]
        );
    }

    #[test]
    fn test_is_repository() {
        let (temp_dir, _repo) = create_test_repo();
        let scm = GitScm::new();
        assert!(scm.is_repository(temp_dir.path()));

        let plain = TempDir::new().unwrap();
        assert!(!scm.is_repository(plain.path()));
    }

    #[test]
    fn test_remote_url_prefers_origin() {
        let (temp_dir, repo) = create_test_repo();
        repo.remote("upstream", "https://example.com/upstream.git").unwrap();
        repo.remote("origin", "git@example.com:me/fork.git").unwrap();

        let scm = GitScm::new();
        assert_eq!(
            scm.remote_url(temp_dir.path()).unwrap().as_deref(),
            Some("git@example.com:me/fork.git")
        );
    }

    #[test]
    fn test_remote_url_falls_back_to_first_remote() {
        let (temp_dir, repo) = create_test_repo();
        repo.remote("upstream", "https://example.com/upstream.git").unwrap();

        let scm = GitScm::new();
        assert_eq!(
            scm.remote_url(temp_dir.path()).unwrap().as_deref(),
            Some("https://example.com/upstream.git")
        );
    }

    #[test]
    fn test_remote_url_without_remotes() {
        let (temp_dir, _repo) = create_test_repo();
        let scm = GitScm::new();
        assert_eq!(scm.remote_url(temp_dir.path()).unwrap(), None);
    }

    #[test]
    fn test_remote_url_of_broken_repository() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let scm = GitScm::new();
        assert!(matches!(
            scm.remote_url(temp_dir.path()),
            Err(ScmError::RepositoryUnreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_clone_with_missing_executable() {
        let scm = GitScm::with_executable("pj-no-such-git");
        let url = GitUrl::new("https://example.com/foo.git").unwrap();
        let dest = TempDir::new().unwrap();
        let result = scm.clone_repository(&url, &dest.path().join("foo")).await;
        assert!(matches!(result, Err(ScmError::ExecutableNotFound { .. })));
    }
}
