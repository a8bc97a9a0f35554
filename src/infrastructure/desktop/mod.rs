/// Desktop integration: window placement and application startup
pub mod launcher;
pub mod window_manager;
pub mod wmctrl;

pub use launcher::{AppLauncher, ProcessLauncher};
pub use window_manager::{WindowId, WindowInfo, WindowManager, WindowManagerError};
pub use wmctrl::WmctrlWindowManager;
