use std::path::PathBuf;
use tracing::{info, warn};

use crate::application::services::name_resolver::NameResolver;
use crate::application::use_cases::open_project::{LaunchConfig, OpenProjectUseCase};
use crate::common::error::PjError;
use crate::common::result::PjResult;
use crate::domain::entities::project::Project;
use crate::infrastructure::desktop::{ProcessLauncher, WmctrlWindowManager};
use crate::infrastructure::filesystem::project_store::ProjectStore;
use crate::presentation::ui::DisplayHelper;

/// Handler for `pj <name>`
pub struct OpenCommand {
    pub query: String,
    pub projects_dir: PathBuf,
    pub launch_config: LaunchConfig,
}

impl OpenCommand {
    pub fn new(query: impl Into<String>, projects_dir: PathBuf, launch_config: LaunchConfig) -> Self {
        Self {
            query: query.into(),
            projects_dir,
            launch_config,
        }
    }

    pub async fn execute(&self, display: &DisplayHelper) -> PjResult<()> {
        let store = ProjectStore::in_dir(&self.projects_dir);
        let catalog = store.load()?;
        let project = NameResolver::new().resolve(&self.query, &catalog)?;

        let use_case = OpenProjectUseCase::new(
            Box::new(WmctrlWindowManager::new()),
            Box::new(ProcessLauncher::new()),
            self.launch_config.clone(),
        );
        use_case.verify(&project)?;

        display.print_project_info(&project);
        self.record_access(&store, &project, display);

        info!("Opening project {}", project.name);
        let report = use_case.execute(&project).await?;
        display.print_launch_report(&report);

        if !report.is_success() {
            return Err(PjError::LaunchIncomplete {
                failed: report.failed_count(),
                total: report.steps.len(),
            });
        }

        display.success(&format!("Opened {}", display.format_project(&project.name)));
        Ok(())
    }

    fn record_access(&self, store: &ProjectStore, project: &Project, display: &DisplayHelper) {
        let mut record = project.record.clone();
        record.touch(chrono::Utc::now().timestamp());
        if let Err(e) = store.upsert(&project.name, record) {
            warn!("Could not record last access of {}: {}", project.name, e);
            display.warning("Last access time was not saved");
        }
    }
}
