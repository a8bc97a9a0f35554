use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

/// Process execution errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Command `{command}` failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Command `{command}` timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// A program plus a fixed argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute (looked up in PATH)
    pub program: String,

    /// Arguments passed verbatim
    pub args: Vec<String>,

    /// Working directory for the process
    pub working_directory: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory: None,
        }
    }

    /// Build a command from an argument vector whose first element is the program
    pub fn from_argv(argv: Vec<String>) -> Result<Self, ProcessError> {
        let mut parts = argv.into_iter();
        let program = parts
            .next()
            .filter(|program| !program.trim().is_empty())
            .ok_or_else(|| ProcessError::InvalidCommand("empty argument vector".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            working_directory: None,
        })
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set working directory
    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Human-readable form used in logs and error messages
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the process (-1 when killed by a signal)
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error output
    pub stderr: String,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Whether the command was successful (exit code 0)
    pub success: bool,
}

/// Runs external programs without a shell
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Create a runner without a timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort commands that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run a command to completion and capture its output
    pub async fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let start_time = Instant::now();
        debug!("Running command: {}", spec.display());

        let mut cmd = spec.to_tokio_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| spawn_error(spec, e))?;

        let output = match self.timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ProcessError::Timeout {
                    command: spec.display(),
                    timeout_ms: limit.as_millis() as u64,
                })??,
            None => child.wait_with_output().await?,
        };

        let exit_code = output.status.code().unwrap_or(-1);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            execution_time_ms: start_time.elapsed().as_millis() as u64,
            success: output.status.success(),
        })
    }

    /// Run a command and return its trimmed stdout, failing on a non-zero exit
    pub async fn run_checked(&self, spec: &CommandSpec) -> Result<String, ProcessError> {
        let output = self.output(spec).await?;

        if !output.success {
            return Err(ProcessError::CommandFailed {
                command: spec.display(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output.stdout.trim().to_string())
    }

    /// Start a command in the background and return without waiting for it
    pub fn spawn_detached(&self, spec: &CommandSpec) -> Result<Option<u32>, ProcessError> {
        debug!("Spawning detached: {}", spec.display());

        let mut cmd = spec.to_tokio_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // own process group, so Ctrl-C in the terminal leaves the application running
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| spawn_error(spec, e))?;
        Ok(child.id())
    }
}

fn spawn_error(spec: &CommandSpec, error: io::Error) -> ProcessError {
    if error.kind() == io::ErrorKind::NotFound {
        ProcessError::ProgramNotFound {
            program: spec.program.clone(),
        }
    } else {
        ProcessError::IoError(error)
    }
}
