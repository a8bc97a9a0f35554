pub mod bulk_scan;
pub mod list_projects;
pub mod open_project;
pub mod register_repository;

pub use bulk_scan::{BulkScanConfig, BulkScanError, BulkScanReport, BulkScanUseCase};
pub use list_projects::{ListProjectsUseCase, ProjectSummary};
pub use open_project::{
    LaunchConfig, LaunchError, LaunchReport, LaunchStep, OpenProjectUseCase, StepOutcome,
    StepReport,
};
pub use register_repository::{
    RegisterOptions, RegisterRepositoryError, RegisterRepositoryUseCase, RegistrationOutcome,
};
