/// Infrastructure layer modules
///
/// Concrete implementations for external system interactions:
/// - project store and config files
/// - Git (clone, remote inspection)
/// - window manager and application startup
/// - process execution
pub mod desktop;
pub mod filesystem;
pub mod process;
pub mod scm;

// Re-export commonly used types
pub use desktop::{AppLauncher, ProcessLauncher, WindowManager, WmctrlWindowManager};
pub use filesystem::{AppConfig, ConfigStore, ProjectStore};
pub use process::{CommandRunner, CommandSpec};
pub use scm::{GitScm, ScmError, ScmOperations};
