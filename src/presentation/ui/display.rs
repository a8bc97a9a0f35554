use chrono::{DateTime, Local};
use colored::Colorize;
use console::measure_text_width;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

use crate::application::use_cases::bulk_scan::BulkScanReport;
use crate::application::use_cases::list_projects::ProjectSummary;
use crate::application::use_cases::open_project::{LaunchReport, StepOutcome};
use crate::domain::entities::project::Project;
use crate::domain::entities::workspace_config::AppRole;

/// Display utilities for the CLI interface
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[SUCCESS] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "✗".red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARNING] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Format a file path with appropriate styling
    pub fn format_path(&self, path: &Path) -> String {
        let path = path.display().to_string();
        if self.use_color {
            path.cyan().to_string()
        } else {
            path
        }
    }

    /// Format a URL with appropriate styling
    pub fn format_url(&self, url: &str) -> String {
        if self.use_color {
            url.blue().underline().to_string()
        } else {
            url.to_string()
        }
    }

    /// Format a project name with appropriate styling
    pub fn format_project(&self, name: &str) -> String {
        if self.use_color {
            name.cyan().bold().to_string()
        } else {
            name.to_string()
        }
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if !self.use_color {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>4}/{len:4} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb
    }

    /// Print the project info box shown before launching
    pub fn print_project_info(&self, project: &Project) {
        for line in self.project_info_lines(project) {
            println!("{}", line);
        }
    }

    /// Lines of the project info box
    pub fn project_info_lines(&self, project: &Project) -> Vec<String> {
        let record = &project.record;
        let config = &record.workspace_config;

        let mut items: Vec<(&str, String)> = vec![
            ("Path", self.format_path(&record.path)),
            (
                "Remote",
                record
                    .url
                    .as_deref()
                    .map(|u| self.format_url(u))
                    .unwrap_or_else(|| "(local only)".to_string()),
            ),
        ];
        for role in AppRole::LAUNCH_ORDER {
            let target = match config.url_for(role) {
                Some(url) => format!("{} -> {}", config.workspace_for(role), self.format_url(url)),
                None if role == AppRole::Editor => config.workspace_for(role).to_string(),
                None => format!("{} (not set)", config.workspace_for(role)),
            };
            items.push((role.label(), target));
        }
        if !record.added_date.is_empty() {
            items.push(("Added", record.added_date.clone()));
        }
        if let Some(last) = record.metadata.as_ref().and_then(|m| m.last_accessed) {
            items.push(("Last opened", format_timestamp(last)));
        }

        self.boxed(&project.name, &items)
    }

    /// Print registered projects for `--list`
    pub fn print_project_list(&self, projects: &[ProjectSummary]) {
        for line in self.project_list_lines(projects) {
            println!("{}", line);
        }
    }

    /// Lines of the project listing
    pub fn project_list_lines(&self, projects: &[ProjectSummary]) -> Vec<String> {
        if projects.is_empty() {
            return vec!["No projects found".to_string()];
        }

        let mut lines = Vec::with_capacity(projects.len() * 2);
        for project in projects {
            lines.push(format!(
                "{}: {}",
                self.format_project(&project.name),
                self.format_path(&project.path)
            ));
            if let Some(url) = &project.url {
                lines.push(format!("  {}", self.format_url(url)));
            }
            if let Some(last) = project.last_accessed {
                lines.push(format!("  last opened {}", format_timestamp(last)));
            }
        }
        lines
    }

    /// Print the per-step result of a launch
    pub fn print_launch_report(&self, report: &LaunchReport) {
        for line in self.launch_report_lines(report) {
            println!("{}", line);
        }
    }

    /// Lines of the launch report
    pub fn launch_report_lines(&self, report: &LaunchReport) -> Vec<String> {
        report
            .steps
            .iter()
            .map(|step| {
                let label = match step.workspace {
                    Some(ws) => format!("{} (workspace {})", step.step, ws),
                    None => step.step.to_string(),
                };
                match &step.outcome {
                    StepOutcome::Done if self.use_color => format!("  {} {}", "✓".green(), label),
                    StepOutcome::Done => format!("  [OK] {}", label),
                    StepOutcome::Skipped(reason) if self.use_color => {
                        format!("  {} {} {}", "-".dimmed(), label, reason.dimmed())
                    }
                    StepOutcome::Skipped(reason) => format!("  [SKIP] {}: {}", label, reason),
                    StepOutcome::Failed(error) if self.use_color => {
                        format!("  {} {} {}", "✗".red(), label, error.red())
                    }
                    StepOutcome::Failed(error) => format!("  [FAIL] {}: {}", label, error),
                }
            })
            .collect()
    }

    /// Print the result of a bulk scan
    pub fn print_scan_report(&self, report: &BulkScanReport) {
        for name in &report.added {
            self.success(&format!("Added {}", self.format_project(name)));
        }
        for name in &report.updated {
            self.success(&format!("Updated {}", self.format_project(name)));
        }
        for skipped in &report.skipped {
            self.info(&format!("Skipped {} ({})", skipped.name, skipped.reason));
        }
        for failed in &report.failed {
            self.error(&format!(
                "Failed {}: {}",
                self.format_path(&failed.path),
                failed.error
            ));
        }

        self.print_summary(
            "Scan summary",
            &[
                ("Added", report.added.len().to_string()),
                ("Updated", report.updated.len().to_string()),
                ("Skipped", report.skipped.len().to_string()),
                ("Failed", report.failed.len().to_string()),
            ],
        );
    }

    /// Print a summary box
    pub fn print_summary(&self, title: &str, items: &[(&str, String)]) {
        println!();
        for line in self.boxed(title, items) {
            println!("{}", line);
        }
    }

    fn boxed(&self, title: &str, items: &[(&str, String)]) -> Vec<String> {
        let key_width = items
            .iter()
            .map(|(key, _)| measure_text_width(key))
            .max()
            .unwrap_or(0);

        if !self.use_color {
            let mut lines = vec![format!("=== {} ===", title)];
            lines.extend(
                items
                    .iter()
                    .map(|(key, value)| format!("{:<width$}  {}", key, value, width = key_width)),
            );
            lines.push("=".repeat(measure_text_width(title) + 8));
            return lines;
        }

        let rows: Vec<String> = items
            .iter()
            .map(|(key, value)| {
                let padding = " ".repeat(key_width - measure_text_width(key));
                format!("{}{}  {}", key.bold(), padding, value)
            })
            .collect();
        let inner = rows
            .iter()
            .map(|row| measure_text_width(row))
            .chain(std::iter::once(measure_text_width(title) + 2))
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format!(
            "┌─ {} {}┐",
            title.bold(),
            "─".repeat(inner - measure_text_width(title) - 1)
        ));
        for row in rows {
            let padding = " ".repeat(inner - measure_text_width(&row));
            lines.push(format!("│ {}{} │", row, padding));
        }
        lines.push(format!("└{}┘", "─".repeat(inner + 2)));
        lines
    }
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Helper functions for common display patterns
pub mod helpers {
    use super::*;

    /// Create a display helper with color detection
    pub fn auto_display(no_color: bool) -> DisplayHelper {
        let use_color =
            !no_color && atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err();
        DisplayHelper::new(use_color)
    }
}
