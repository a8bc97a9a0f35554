use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::infrastructure::process::command_runner::ProcessError;

/// Window manager errors
#[derive(Debug, Error)]
pub enum WindowManagerError {
    #[error("No new window appeared for `{command}` after {attempts} attempts")]
    WindowNotFound { command: String, attempts: u32 },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Cannot parse window manager output: {0}")]
    ParseError(String),

    #[error("Invalid workspace number: {0} (workspaces start at 1)")]
    InvalidWorkspace(u32),
}

/// X11 window id as printed by `wmctrl -l` (e.g. `0x03a00003`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id; newer windows get larger ids
    pub fn numeric(&self) -> u64 {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        u64::from_str_radix(digits, 16).unwrap_or(0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    /// 1-based workspace, `None` for sticky windows shown on every workspace
    pub workspace: Option<u32>,
    pub title: String,
}

/// Narrow interface over the desktop's window manager
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WindowManager: Send + Sync {
    /// All current top-level windows
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowManagerError>;

    /// Move a window to a 1-based workspace
    async fn move_to_workspace(
        &self,
        window: &WindowId,
        workspace: u32,
    ) -> Result<(), WindowManagerError>;

    async fn maximize(&self, window: &WindowId) -> Result<(), WindowManagerError>;

    async fn minimize(&self, window: &WindowId) -> Result<(), WindowManagerError>;

    /// Make sure at least `count` workspaces exist; returns true if some were created
    async fn ensure_workspaces(&self, count: u32) -> Result<bool, WindowManagerError>;

    /// Switch the visible desktop to a 1-based workspace
    async fn switch_to_workspace(&self, workspace: u32) -> Result<(), WindowManagerError>;
}

fn window_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0[xX][0-9a-fA-F]+)\s+(-?\d+)(?:\s+\S+)?(?:\s+(.*))?$")
            .expect("window list pattern is valid")
    })
}

/// Parse the output of `wmctrl -l`
pub fn parse_window_list(output: &str) -> Result<Vec<WindowInfo>, WindowManagerError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let caps = window_line_regex()
                .captures(line.trim_end())
                .ok_or_else(|| WindowManagerError::ParseError(line.to_string()))?;

            let desktop: i64 = caps[2]
                .parse()
                .map_err(|_| WindowManagerError::ParseError(line.to_string()))?;

            let workspace = if desktop < 0 {
                None
            } else {
                let workspace = u32::try_from(desktop)
                    .ok()
                    .and_then(|d| d.checked_add(1))
                    .ok_or_else(|| WindowManagerError::ParseError(line.to_string()))?;
                Some(workspace)
            };

            Ok(WindowInfo {
                id: WindowId::new(&caps[1]),
                workspace,
                title: caps
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}
