pub mod config_store;
pub mod project_store;

pub use config_store::{AppConfig, ConfigStore, ConfigStoreError};
pub use project_store::{ProjectStore, ProjectStoreError};
