pub mod project;
pub mod workspace_config;
