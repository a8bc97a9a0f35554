use async_trait::async_trait;

use crate::infrastructure::process::command_runner::{CommandRunner, CommandSpec, ProcessError};

/// Starts desktop applications without waiting for them
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppLauncher: Send + Sync {
    async fn launch(&self, command: &CommandSpec) -> Result<(), ProcessError>;
}

/// `AppLauncher` that spawns detached child processes
#[derive(Debug, Default)]
pub struct ProcessLauncher {
    runner: CommandRunner,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppLauncher for ProcessLauncher {
    async fn launch(&self, command: &CommandSpec) -> Result<(), ProcessError> {
        self.runner.spawn_detached(command)?;
        Ok(())
    }
}
