//! In-memory stand-ins for git and the desktop

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pj::domain::value_objects::git_url::GitUrl;
use pj::infrastructure::desktop::{AppLauncher, WindowId, WindowInfo, WindowManager, WindowManagerError};
use pj::infrastructure::process::command_runner::{CommandSpec, ProcessError};
use pj::infrastructure::scm::{GitScm, ScmError, ScmOperations};

/// Clones by initializing an empty repository with `origin` set to the URL
///
/// Inspection of existing repositories goes through the real `GitScm`.
#[derive(Default)]
pub struct FakeScm {
    inner: GitScm,
    pub clones: Arc<Mutex<Vec<String>>>,
}

impl FakeScm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clone_count(&self) -> usize {
        self.clones.lock().unwrap().len()
    }
}

#[async_trait]
impl ScmOperations for FakeScm {
    async fn clone_repository(&self, url: &GitUrl, dest_path: &Path) -> Result<(), ScmError> {
        self.clones.lock().unwrap().push(url.as_str().to_string());
        let repo = git2::Repository::init(dest_path).map_err(|e| ScmError::unreadable(dest_path, e))?;
        repo.remote("origin", url.as_str())
            .map_err(|e| ScmError::unreadable(dest_path, e))?;
        Ok(())
    }

    fn is_repository(&self, path: &Path) -> bool {
        self.inner.is_repository(path)
    }

    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        self.inner.remote_url(repo_path)
    }
}

/// Shared state of the fake desktop
#[derive(Debug, Default)]
pub struct DesktopState {
    pub windows: Vec<WindowInfo>,
    pub next_id: u64,
    pub launched: Vec<Vec<String>>,
    pub moves: Vec<(String, u32)>,
    pub maximized: Vec<String>,
    pub minimized: Vec<String>,
    pub workspaces: u32,
    pub current_workspace: Option<u32>,
}

/// Desktop whose launched programs open one window each, except the silent ones
#[derive(Clone, Default)]
pub struct FakeDesktop {
    pub state: Arc<Mutex<DesktopState>>,
    silent: Arc<HashSet<String>>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        let desktop = Self::default();
        desktop.state.lock().unwrap().workspaces = 1;
        desktop
    }

    /// Programs that start but never show a window
    pub fn with_silent(mut self, programs: &[&str]) -> Self {
        self.silent = Arc::new(programs.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Put an unrelated window on `workspace` (1-based)
    pub fn with_window(self, workspace: u32, title: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = Self::allocate_id(&mut state);
            state.windows.push(WindowInfo {
                id,
                workspace: Some(workspace),
                title: title.to_string(),
            });
        }
        self
    }

    pub fn snapshot<T>(&self, f: impl FnOnce(&DesktopState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    fn allocate_id(state: &mut DesktopState) -> WindowId {
        state.next_id += 1;
        WindowId::new(format!("0x{:08x}", 0x0400_0000 + state.next_id))
    }
}

#[async_trait]
impl WindowManager for FakeDesktop {
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowManagerError> {
        Ok(self.state.lock().unwrap().windows.clone())
    }

    async fn move_to_workspace(
        &self,
        window: &WindowId,
        workspace: u32,
    ) -> Result<(), WindowManagerError> {
        let mut state = self.state.lock().unwrap();
        state.moves.push((window.as_str().to_string(), workspace));
        if let Some(info) = state.windows.iter_mut().find(|w| &w.id == window) {
            info.workspace = Some(workspace);
        }
        Ok(())
    }

    async fn maximize(&self, window: &WindowId) -> Result<(), WindowManagerError> {
        self.state
            .lock()
            .unwrap()
            .maximized
            .push(window.as_str().to_string());
        Ok(())
    }

    async fn minimize(&self, window: &WindowId) -> Result<(), WindowManagerError> {
        self.state
            .lock()
            .unwrap()
            .minimized
            .push(window.as_str().to_string());
        Ok(())
    }

    async fn ensure_workspaces(&self, count: u32) -> Result<bool, WindowManagerError> {
        let mut state = self.state.lock().unwrap();
        if state.workspaces >= count {
            return Ok(false);
        }
        state.workspaces = count;
        Ok(true)
    }

    async fn switch_to_workspace(&self, workspace: u32) -> Result<(), WindowManagerError> {
        self.state.lock().unwrap().current_workspace = Some(workspace);
        Ok(())
    }
}

#[async_trait]
impl AppLauncher for FakeDesktop {
    async fn launch(&self, command: &CommandSpec) -> Result<(), ProcessError> {
        let mut state = self.state.lock().unwrap();
        let mut argv = vec![command.program.clone()];
        argv.extend(command.args.iter().cloned());
        state.launched.push(argv);

        if !self.silent.contains(&command.program) {
            let id = Self::allocate_id(&mut state);
            state.windows.push(WindowInfo {
                id,
                workspace: Some(1),
                title: command.display(),
            });
        }
        Ok(())
    }
}
