use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::common::templates::{TemplateError, TemplateProcessor};
use crate::domain::entities::project::Project;
use crate::domain::entities::workspace_config::{AppRole, WorkspaceConfig};
use crate::infrastructure::desktop::launcher::AppLauncher;
use crate::infrastructure::desktop::window_manager::{WindowId, WindowManager, WindowManagerError};
use crate::infrastructure::filesystem::config_store::AppConfig;
use crate::infrastructure::process::command_runner::{CommandSpec, ProcessError};

/// OpenProject関連のエラー（起動前に中断するもの）
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Project directory for '{name}' does not exist: {}", .path.display())]
    MissingDirectory { name: String, path: PathBuf },
}

/// 個々のステップの失敗理由
#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Window(#[from] WindowManagerError),
}

/// 起動の設定
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// エディタのコマンドテンプレート（`{path}`）
    pub editor_command: Vec<String>,

    /// ブラウザのコマンドテンプレート（`{url}`）
    pub browser_command: Vec<String>,

    /// チャットのコマンドテンプレート（`{url}`）
    pub chat_command: Vec<String>,

    /// 新しいウィンドウを待つ最大回数
    pub poll_attempts: u32,

    /// ポーリング間隔
    pub poll_interval: Duration,

    /// 対象ワークスペースの既存ウィンドウを最小化するか
    pub minimize_existing: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl LaunchConfig {
    /// アプリケーション設定から作成
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            editor_command: config.editor_command.clone(),
            browser_command: config.browser_command.clone(),
            chat_command: config.chat_command().to_vec(),
            poll_attempts: config.window_poll_attempts,
            poll_interval: Duration::from_millis(config.window_poll_interval_ms),
            minimize_existing: config.minimize_existing,
        }
    }

    pub fn with_poll(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }

    pub fn with_minimize_existing(mut self, minimize_existing: bool) -> Self {
        self.minimize_existing = minimize_existing;
        self
    }

    fn command_for(&self, role: AppRole) -> &[String] {
        match role {
            AppRole::Editor => &self.editor_command,
            AppRole::Issues | AppRole::LocalDev => &self.browser_command,
            AppRole::Chat => &self.chat_command,
        }
    }
}

/// 起動手順の各ステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStep {
    /// 必要な数のワークスペースを用意
    EnsureWorkspaces,
    /// 対象ワークスペースの既存ウィンドウを最小化
    MinimizeExisting,
    /// アプリケーションの起動と配置
    Launch(AppRole),
    /// 開始ワークスペースへの切り替え
    SwitchWorkspace,
}

impl fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStep::EnsureWorkspaces => f.write_str("workspaces"),
            LaunchStep::MinimizeExisting => f.write_str("minimize"),
            LaunchStep::Launch(role) => write!(f, "{}", role),
            LaunchStep::SwitchWorkspace => f.write_str("focus"),
        }
    }
}

/// ステップの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    Failed(String),
}

/// ステップごとの報告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: LaunchStep,
    pub workspace: Option<u32>,
    pub outcome: StepOutcome,
}

/// 起動結果の報告
#[derive(Debug, Clone, Default)]
pub struct LaunchReport {
    /// プロジェクト名
    pub project: String,

    /// 実行順のステップ報告
    pub steps: Vec<StepReport>,
}

impl LaunchReport {
    pub fn failed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// 指定したステップの報告
    pub fn step(&self, step: LaunchStep) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }

    fn record(&mut self, step: LaunchStep, workspace: Option<u32>, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Failed(error) => warn!("Step {} failed: {}", step, error),
            StepOutcome::Skipped(reason) => debug!("Step {} skipped: {}", step, reason),
            StepOutcome::Done => debug!("Step {} done", step),
        }
        self.steps.push(StepReport {
            step,
            workspace,
            outcome,
        });
    }
}

fn outcome_of(result: Result<(), StepError>) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Done,
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}

/// プロジェクトを開いてウィンドウをワークスペースに配置するユースケース
///
/// 各ステップは失敗しても次のステップに進み、結果はLaunchReportに残る。
pub struct OpenProjectUseCase {
    window_manager: Box<dyn WindowManager>,
    launcher: Box<dyn AppLauncher>,
    config: LaunchConfig,
    templates: TemplateProcessor,
}

impl OpenProjectUseCase {
    /// 新しいOpenProjectUseCaseインスタンスを作成
    pub fn new(
        window_manager: Box<dyn WindowManager>,
        launcher: Box<dyn AppLauncher>,
        config: LaunchConfig,
    ) -> Self {
        Self {
            window_manager,
            launcher,
            config,
            templates: TemplateProcessor::new(),
        }
    }

    /// プロジェクトディレクトリが存在するか確認
    pub fn verify(&self, project: &Project) -> Result<(), LaunchError> {
        if !project.record.path.is_dir() {
            return Err(LaunchError::MissingDirectory {
                name: project.name.clone(),
                path: project.record.path.clone(),
            });
        }
        Ok(())
    }

    /// 起動を実行
    pub async fn execute(&self, project: &Project) -> Result<LaunchReport, LaunchError> {
        // 0. ディレクトリの確認（存在しなければ何も起動しない）
        self.verify(project)?;

        let wc = &project.record.workspace_config;
        let mut report = LaunchReport {
            project: project.name.clone(),
            steps: Vec::new(),
        };

        // 1. ワークスペースの用意
        let count = wc.max_workspace();
        let result = self
            .window_manager
            .ensure_workspaces(count)
            .await
            .map(|_| ())
            .map_err(StepError::from);
        report.record(LaunchStep::EnsureWorkspaces, Some(count), outcome_of(result));

        // 2. 既存ウィンドウの最小化
        let outcome = if self.config.minimize_existing {
            outcome_of(self.minimize_existing(wc).await)
        } else {
            StepOutcome::Skipped("disabled".to_string())
        };
        report.record(LaunchStep::MinimizeExisting, None, outcome);

        // 3-6. エディタ、Issue、ローカル開発、チャット
        let dir = project.record.path.as_path();
        let path = dir.to_string_lossy().to_string();
        for role in AppRole::LAUNCH_ORDER {
            let workspace = wc.workspace_for(role);
            let outcome = match (role, wc.url_for(role)) {
                (AppRole::Editor, _) => outcome_of(
                    self.launch_app(role, &[("path", path.as_str())], workspace, dir)
                        .await,
                ),
                (_, Some(url)) => outcome_of(
                    self.launch_app(role, &[("path", path.as_str()), ("url", url)], workspace, dir)
                        .await,
                ),
                (_, None) => StepOutcome::Skipped(format!("no {} URL", role)),
            };
            report.record(LaunchStep::Launch(role), Some(workspace), outcome);
        }

        // 7. 開始ワークスペースへ切り替え
        let start = wc.starting_workspace();
        let result = self
            .window_manager
            .switch_to_workspace(start)
            .await
            .map_err(StepError::from);
        report.record(LaunchStep::SwitchWorkspace, Some(start), outcome_of(result));

        Ok(report)
    }

    async fn minimize_existing(&self, wc: &WorkspaceConfig) -> Result<(), StepError> {
        let targets = wc.target_workspaces();
        let windows = self.window_manager.list_windows().await?;

        let mut first_error = None;
        for window in windows
            .iter()
            .filter(|w| w.workspace.map_or(false, |ws| targets.contains(&ws)))
        {
            debug!("Minimizing {} ({})", window.id, window.title);
            if let Err(e) = self.window_manager.minimize(&window.id).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// アプリを起動し、新しいウィンドウをワークスペースへ移動して最大化
    async fn launch_app(
        &self,
        role: AppRole,
        values: &[(&str, &str)],
        workspace: u32,
        project_dir: &Path,
    ) -> Result<(), StepError> {
        let argv = self.templates.render(self.config.command_for(role), values)?;
        let command = CommandSpec::from_argv(argv)?.with_working_directory(project_dir);

        // 起動前の一覧が取れなければ既存ウィンドウと区別できない
        let before = self.window_ids().await?;
        self.launcher.launch(&command).await?;

        let window = self.wait_for_new_window(&before, &command).await?;
        self.window_manager
            .move_to_workspace(&window, workspace)
            .await?;
        self.window_manager.maximize(&window).await?;
        Ok(())
    }

    async fn window_ids(&self) -> Result<HashSet<WindowId>, WindowManagerError> {
        let windows = self.window_manager.list_windows().await?;
        Ok(windows.into_iter().map(|w| w.id).collect())
    }

    /// 新しいウィンドウが現れるまで待つ（複数あれば最も新しいもの）
    async fn wait_for_new_window(
        &self,
        before: &HashSet<WindowId>,
        command: &CommandSpec,
    ) -> Result<WindowId, WindowManagerError> {
        for attempt in 1..=self.config.poll_attempts {
            match self.window_manager.list_windows().await {
                Ok(windows) => {
                    let newest = windows
                        .into_iter()
                        .map(|w| w.id)
                        .filter(|id| !before.contains(id))
                        .max_by_key(WindowId::numeric);
                    if let Some(id) = newest {
                        debug!("Window {} appeared after {} attempts", id, attempt);
                        return Ok(id);
                    }
                }
                Err(e) => debug!("Window poll {} failed: {}", attempt, e),
            }

            if !self.config.poll_interval.is_zero() {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Err(WindowManagerError::WindowNotFound {
            command: command.display(),
            attempts: self.config.poll_attempts,
        })
    }
}
