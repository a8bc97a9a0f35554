use std::path::Path;

use crate::application::use_cases::register_repository::{
    RegisterOptions, RegisterRepositoryUseCase, RegistrationOutcome,
};
use crate::common::result::{PjResult, ResultExt};
use crate::presentation::ui::DisplayHelper;

/// Handler for `pj --add`
pub struct AddCommand {
    /// Git URL, or an existing directory registered in place
    pub target: String,
    pub options: RegisterOptions,
}

impl AddCommand {
    pub fn new(target: impl Into<String>, options: RegisterOptions) -> Self {
        Self {
            target: target.into(),
            options,
        }
    }

    pub async fn execute(
        &self,
        registrar: &RegisterRepositoryUseCase,
        display: &DisplayHelper,
    ) -> PjResult<()> {
        let local = Path::new(&self.target);
        let outcome = if local.is_dir() {
            let dir = local
                .canonicalize()
                .with_filesystem_error("Cannot resolve directory", Some(local.to_path_buf()))?;
            registrar.register_local(&dir, &self.options)?
        } else {
            display.info(&format!("Registering {}", display.format_url(&self.target)));
            registrar.register_url(&self.target, &self.options).await?
        };

        self.print_outcome(&outcome, display);
        Ok(())
    }

    fn print_outcome(&self, outcome: &RegistrationOutcome, display: &DisplayHelper) {
        let name = display.format_project(outcome.name.as_str());
        let verb = if outcome.replaced { "Updated" } else { "Added" };
        display.success(&format!(
            "{} {} at {}",
            verb,
            name,
            display.format_path(&outcome.record.path)
        ));
        if outcome.cloned {
            display.info("Repository cloned");
        }
    }
}
