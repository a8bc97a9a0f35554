//! Filesystem fixtures

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use pj::domain::entities::project::ProjectRecord;
use pj::domain::entities::workspace_config::WorkspaceConfig;
use pj::domain::value_objects::git_url::GitUrl;
use pj::infrastructure::filesystem::project_store::ProjectStore;

/// Initialize a Git repository at `root/name`, with an `origin` remote when given
pub fn init_repo(root: &Path, name: &str, origin: Option<&str>) -> PathBuf {
    let path = root.join(name);
    let repo = Repository::init(&path).expect("Failed to init repository");
    if let Some(url) = origin {
        repo.remote("origin", url).expect("Failed to add origin");
    }
    path
}

/// Create a directory that is not a repository
pub fn plain_dir(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(&path).expect("Failed to create directory");
    path
}

/// Create a directory whose `.git` cannot be opened as a repository
pub fn broken_repo(root: &Path, name: &str) -> PathBuf {
    let path = plain_dir(root, name);
    fs::create_dir_all(path.join(".git")).expect("Failed to create .git");
    fs::write(path.join(".git").join("HEAD"), "garbage\n").expect("Failed to write HEAD");
    path
}

/// Record for a project cloned from `url`, stored under `root`
pub fn remote_record(root: &Path, name: &str, url: &str) -> ProjectRecord {
    let git_url = GitUrl::new(url).expect("Invalid test URL");
    ProjectRecord::new(root.join(name), WorkspaceConfig::for_remote(Some(&git_url)))
        .with_url(url)
}

/// Write a store holding the given local-only projects
pub fn seed_store(root: &Path, names: &[&str]) -> ProjectStore {
    let store = ProjectStore::in_dir(root);
    for name in names {
        let dir = plain_dir(root, name);
        store
            .upsert(name, ProjectRecord::new(dir, WorkspaceConfig::for_remote(None)))
            .expect("Failed to seed store");
    }
    store
}

/// Write a config file that keeps tests away from the real desktop
pub fn write_config(dir: &Path, projects_dir: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "projects_dir: {}\nwindow_poll_attempts: 1\nwindow_poll_interval_ms: 0\n",
        projects_dir.display()
    );
    fs::write(&path, yaml).expect("Failed to write config");
    path
}
