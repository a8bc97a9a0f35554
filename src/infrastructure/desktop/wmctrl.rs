use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::window_manager::{parse_window_list, WindowId, WindowInfo, WindowManager, WindowManagerError};
use crate::infrastructure::process::command_runner::{CommandRunner, CommandSpec};

const GSETTINGS_SCHEMA: &str = "org.cinnamon.desktop.wm.preferences";
const GSETTINGS_KEY: &str = "num-workspaces";

/// `WindowManager` backed by `wmctrl`, `xdotool` and Cinnamon's `gsettings`
pub struct WmctrlWindowManager {
    runner: CommandRunner,
    settle_delay: Duration,
}

impl Default for WmctrlWindowManager {
    fn default() -> Self {
        Self {
            runner: CommandRunner::new().with_timeout(Duration::from_secs(10)),
            settle_delay: Duration::from_millis(250),
        }
    }
}

impl WmctrlWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause between window operations so the window manager can catch up
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }

    async fn wmctrl<I, S>(&self, args: I) -> Result<String, WindowManagerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new("wmctrl").args(args);
        Ok(self.runner.run_checked(&spec).await?)
    }

    async fn workspace_count(&self) -> Result<u32, WindowManagerError> {
        let spec = CommandSpec::new("gsettings").args(["get", GSETTINGS_SCHEMA, GSETTINGS_KEY]);
        let output = self.runner.run_checked(&spec).await?;
        parse_workspace_count(&output)
    }
}

/// Parse `gsettings get` output, which may carry a type prefix (`int32 4`)
fn parse_workspace_count(output: &str) -> Result<u32, WindowManagerError> {
    output
        .split_whitespace()
        .last()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| WindowManagerError::ParseError(output.to_string()))
}

fn zero_based(workspace: u32) -> Result<String, WindowManagerError> {
    workspace
        .checked_sub(1)
        .map(|index| index.to_string())
        .ok_or(WindowManagerError::InvalidWorkspace(workspace))
}

#[async_trait]
impl WindowManager for WmctrlWindowManager {
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowManagerError> {
        let output = self.wmctrl(["-l"]).await?;
        parse_window_list(&output)
    }

    async fn move_to_workspace(
        &self,
        window: &WindowId,
        workspace: u32,
    ) -> Result<(), WindowManagerError> {
        let index = zero_based(workspace)?;
        debug!("Moving window {} to workspace {}", window, workspace);

        self.wmctrl(["-i", "-a", window.as_str()]).await?;
        self.settle().await;
        self.wmctrl(["-i", "-r", window.as_str(), "-t", index.as_str()])
            .await?;
        self.settle().await;
        Ok(())
    }

    async fn maximize(&self, window: &WindowId) -> Result<(), WindowManagerError> {
        self.wmctrl(["-i", "-r", window.as_str(), "-b", "remove,fullscreen"])
            .await?;
        self.wmctrl([
            "-i",
            "-r",
            window.as_str(),
            "-b",
            "add,maximized_vert,maximized_horz",
        ])
        .await?;
        Ok(())
    }

    async fn minimize(&self, window: &WindowId) -> Result<(), WindowManagerError> {
        let spec = CommandSpec::new("xdotool").args(["windowminimize", window.as_str()]);
        self.runner.run_checked(&spec).await?;
        Ok(())
    }

    async fn ensure_workspaces(&self, count: u32) -> Result<bool, WindowManagerError> {
        let current = self.workspace_count().await?;
        if count <= current {
            return Ok(false);
        }

        let spec = CommandSpec::new("gsettings").args([
            "set".to_string(),
            GSETTINGS_SCHEMA.to_string(),
            GSETTINGS_KEY.to_string(),
            count.to_string(),
        ]);
        self.runner.run_checked(&spec).await?;
        self.settle().await;

        info!("Created workspaces up to {}", count);
        Ok(true)
    }

    async fn switch_to_workspace(&self, workspace: u32) -> Result<(), WindowManagerError> {
        let index = zero_based(workspace)?;
        self.wmctrl(["-s", index.as_str()]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workspace_count() {
        assert_eq!(parse_workspace_count("4").unwrap(), 4);
        assert_eq!(parse_workspace_count("int32 6\n").unwrap(), 6);
        assert!(parse_workspace_count("").is_err());
        assert!(parse_workspace_count("uint32 many").is_err());
    }

    #[test]
    fn test_zero_based_workspace() {
        assert_eq!(zero_based(1).unwrap(), "0");
        assert_eq!(zero_based(5).unwrap(), "4");
        assert!(matches!(
            zero_based(0),
            Err(WindowManagerError::InvalidWorkspace(0))
        ));
    }

    #[tokio::test]
    async fn test_invalid_workspace_is_rejected_before_running_anything() {
        let manager = WmctrlWindowManager::new().with_settle_delay(Duration::ZERO);
        let result = manager.switch_to_workspace(0).await;
        assert!(matches!(result, Err(WindowManagerError::InvalidWorkspace(0))));
    }
}
