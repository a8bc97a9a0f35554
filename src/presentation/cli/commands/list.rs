use std::path::PathBuf;

use crate::application::use_cases::list_projects::ListProjectsUseCase;
use crate::common::result::PjResult;
use crate::infrastructure::filesystem::project_store::ProjectStore;
use crate::presentation::ui::DisplayHelper;

/// Handler for `pj --list`
pub struct ListCommand {
    pub projects_dir: PathBuf,
}

impl ListCommand {
    pub fn new(projects_dir: PathBuf) -> Self {
        Self { projects_dir }
    }

    pub fn execute(&self, display: &DisplayHelper) -> PjResult<()> {
        let store = ProjectStore::in_dir(&self.projects_dir);
        let projects = ListProjectsUseCase::new(&store).execute()?;
        display.print_project_list(&projects);
        Ok(())
    }
}
