use crate::application::use_cases::bulk_scan::{BulkScanConfig, BulkScanUseCase};
use crate::application::use_cases::register_repository::{
    RegisterOptions, RegisterRepositoryUseCase,
};
use crate::common::error::PjError;
use crate::common::result::PjResult;
use crate::presentation::ui::DisplayHelper;

/// Handler for `pj --all`
pub struct ScanCommand {
    pub refresh: bool,
    pub options: RegisterOptions,
}

impl ScanCommand {
    pub fn new(refresh: bool, options: RegisterOptions) -> Self {
        Self { refresh, options }
    }

    pub fn execute(
        &self,
        registrar: &RegisterRepositoryUseCase,
        display: &DisplayHelper,
    ) -> PjResult<()> {
        let root = registrar.projects_dir();
        display.info(&format!("Scanning {}", display.format_path(root)));

        let config = BulkScanConfig::new(root)
            .with_refresh(self.refresh)
            .with_options(self.options.clone());
        let report = BulkScanUseCase::new(registrar, config)
            .with_progress(display.create_progress_bar(0, "Scanning"))
            .execute()?;

        display.print_scan_report(&report);

        if !report.is_success() {
            return Err(PjError::ScanIncomplete {
                failed: report.failed.len(),
            });
        }
        Ok(())
    }
}
