use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::register_repository::{RegisterOptions, RegisterRepositoryUseCase};
use crate::domain::entities::project::ProjectCatalog;
use crate::domain::value_objects::project_name::ProjectName;
use crate::infrastructure::filesystem::project_store::ProjectStoreError;

/// BulkScan関連のエラー
#[derive(Debug, Error)]
pub enum BulkScanError {
    #[error("Projects directory not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error(transparent)]
    Store(#[from] ProjectStoreError),
}

/// 一括登録の設定
#[derive(Debug, Clone)]
pub struct BulkScanConfig {
    /// 走査するディレクトリ
    pub root: PathBuf,

    /// 登録済みのプロジェクトも更新するか
    pub refresh: bool,

    /// 新規レコードに使うURL
    pub options: RegisterOptions,
}

impl BulkScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            refresh: false,
            options: RegisterOptions::default(),
        }
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_options(mut self, options: RegisterOptions) -> Self {
        self.options = options;
        self
    }
}

/// スキップされたディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

/// 失敗したディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub path: PathBuf,
    pub error: String,
}

/// 一括登録の結果
#[derive(Debug, Clone, Default)]
pub struct BulkScanReport {
    /// 新規登録されたプロジェクト
    pub added: Vec<String>,

    /// 更新されたプロジェクト（refresh時）
    pub updated: Vec<String>,

    /// スキップされたプロジェクト
    pub skipped: Vec<SkippedEntry>,

    /// 失敗したディレクトリ
    pub failed: Vec<FailedEntry>,
}

impl BulkScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// ストアに変更があったか
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty()
    }
}

/// プロジェクトディレクトリ直下のGitリポジトリを一括登録するユースケース
///
/// 1つのディレクトリで失敗しても残りの走査は続ける。
pub struct BulkScanUseCase<'a> {
    registrar: &'a RegisterRepositoryUseCase,
    config: BulkScanConfig,
    progress: Option<ProgressBar>,
}

impl<'a> BulkScanUseCase<'a> {
    /// 新しいBulkScanUseCaseインスタンスを作成
    pub fn new(registrar: &'a RegisterRepositoryUseCase, config: BulkScanConfig) -> Self {
        Self {
            registrar,
            config,
            progress: None,
        }
    }

    /// 進捗表示を設定
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 一括登録を実行
    pub fn execute(&self) -> Result<BulkScanReport, BulkScanError> {
        // 1. ルートディレクトリの確認
        let root = &self.config.root;
        if !root.is_dir() {
            return Err(BulkScanError::RootNotFound { path: root.clone() });
        }

        // 2. 既存カタログの読み込み（壊れていれば中断し、上書きしない）
        let store = self.registrar.store();
        let mut catalog = store.load()?;

        // 3. 直下のディレクトリを名前順に走査
        let candidates = self.repository_dirs(root);
        if let Some(progress) = &self.progress {
            progress.set_length(candidates.len() as u64);
        }

        let mut report = BulkScanReport::new();
        for candidate in candidates {
            match candidate {
                Ok(dir) => self.scan_one(&dir, &mut catalog, &mut report),
                Err(failed) => {
                    warn!("Skipping {}: {}", failed.path.display(), failed.error);
                    report.failed.push(failed);
                }
            }
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        // 4. 変更があれば一度だけ保存
        if report.has_changes() {
            store.save(&catalog)?;
        }

        info!(
            "Scan of {}: {} added, {} updated, {} skipped, {} failed",
            root.display(),
            report.added.len(),
            report.updated.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// `.git`を含む直下のディレクトリ（読めなかったエントリは失敗として返す）
    fn repository_dirs(&self, root: &Path) -> Vec<Result<PathBuf, FailedEntry>> {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    if self.registrar.scm().is_repository(entry.path()) {
                        Some(Ok(entry.into_path()))
                    } else {
                        debug!("Ignoring {}: not a Git repository", entry.path().display());
                        None
                    }
                }
                Ok(_) => None,
                Err(e) => Some(Err(FailedEntry {
                    path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                    error: e.to_string(),
                })),
            })
            .collect()
    }

    fn scan_one(
        &self,
        dir: &Path,
        catalog: &mut ProjectCatalog,
        report: &mut BulkScanReport,
    ) {
        let name = match ProjectName::from_directory(dir) {
            Ok(name) => name,
            Err(e) => {
                report.failed.push(FailedEntry {
                    path: dir.to_path_buf(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let previous = catalog.get(name.as_str()).cloned();
        if previous.is_some() && !self.config.refresh {
            report.skipped.push(SkippedEntry {
                name: name.into_string(),
                reason: "already registered".to_string(),
            });
            return;
        }

        let record = match self.registrar.prepare_local(dir, &self.config.options) {
            Ok((_, record)) => record,
            Err(e) => {
                warn!("Skipping {}: {}", dir.display(), e);
                report.failed.push(FailedEntry {
                    path: dir.to_path_buf(),
                    error: e.to_string(),
                });
                return;
            }
        };

        match previous {
            Some(previous) => {
                let mut record = record
                    .with_added_date(previous.added_date)
                    .with_metadata(previous.metadata);
                record.workspace_config = previous.workspace_config;
                record.extra = previous.extra;
                catalog.insert(name.as_str(), record);
                report.updated.push(name.into_string());
            }
            None => {
                catalog.insert(name.as_str(), record);
                report.added.push(name.into_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::project::ProjectRecord;
    use crate::domain::entities::workspace_config::WorkspaceConfig;
    use crate::infrastructure::filesystem::project_store::ProjectStore;
    use crate::infrastructure::scm::scm_interface::MockScmOperations;
    use crate::infrastructure::scm::ScmError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn make_repo_dir(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    fn mock_scm() -> MockScmOperations {
        let mut scm = MockScmOperations::new();
        scm.expect_is_repository()
            .returning(|path| path.join(".git").exists());
        scm.expect_remote_url().returning(|path| {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            match name.as_str() {
                "broken" => Err(ScmError::unreadable(
                    path,
                    git2::Error::from_str("corrupt repository"),
                )),
                "local" => Ok(None),
                "mirror" => Ok(Some("../upstream.git".to_string())),
                _ => Ok(Some(format!("git@github.com:me/{}.git", name))),
            }
        });
        scm
    }

    fn registrar(root: &Path) -> RegisterRepositoryUseCase {
        RegisterRepositoryUseCase::new(Box::new(mock_scm()), ProjectStore::in_dir(root), root)
    }

    #[test]
    fn test_registers_only_git_directories() {
        let temp_dir = TempDir::new().unwrap();
        make_repo_dir(temp_dir.path(), "beta");
        make_repo_dir(temp_dir.path(), "alpha");
        fs::create_dir_all(temp_dir.path().join("plain")).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        let registrar = registrar(temp_dir.path());
        let report = BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path()))
            .execute()
            .unwrap();

        assert_eq!(report.added, vec!["alpha", "beta"]);
        assert!(report.is_success());

        let catalog = registrar.store().load().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("alpha").unwrap().workspace_config.issues_url.as_deref(),
            Some("https://github.com/me/alpha/issues")
        );
    }

    #[test]
    fn test_broken_repository_does_not_stop_the_scan() {
        let temp_dir = TempDir::new().unwrap();
        make_repo_dir(temp_dir.path(), "alpha");
        make_repo_dir(temp_dir.path(), "broken");
        make_repo_dir(temp_dir.path(), "local");

        let registrar = registrar(temp_dir.path());
        let report = BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path()))
            .execute()
            .unwrap();

        assert_eq!(report.added, vec!["alpha", "local"]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("broken"));
        assert!(!report.is_success());

        let catalog = registrar.store().load().unwrap();
        assert_eq!(catalog.get("local").unwrap().url, None);
    }

    #[test]
    fn test_relative_remote_is_added_without_url() {
        let temp_dir = TempDir::new().unwrap();
        make_repo_dir(temp_dir.path(), "mirror");

        let registrar = registrar(temp_dir.path());
        let report = BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path()))
            .execute()
            .unwrap();

        assert_eq!(report.added, vec!["mirror"]);
        assert!(report.is_success());

        let catalog = registrar.store().load().unwrap();
        let record = catalog.get("mirror").unwrap();
        assert_eq!(record.url, None);
        assert_eq!(record.workspace_config.issues_url, None);
    }

    #[test]
    fn test_existing_names_are_skipped_unless_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let alpha = make_repo_dir(temp_dir.path(), "alpha");

        let registrar = registrar(temp_dir.path());
        let custom = WorkspaceConfig {
            editor_workspace: 1,
            ..WorkspaceConfig::default()
        };
        registrar
            .store()
            .upsert(
                "alpha",
                ProjectRecord::new(&alpha, custom.clone()).with_added_date("2020-01-01 00:00:00"),
            )
            .unwrap();

        let report = BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path()))
            .execute()
            .unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(!report.has_changes());

        let report = BulkScanUseCase::new(
            &registrar,
            BulkScanConfig::new(temp_dir.path()).with_refresh(true),
        )
        .execute()
        .unwrap();
        assert_eq!(report.updated, vec!["alpha"]);

        let record = registrar.store().load().unwrap().get("alpha").cloned().unwrap();
        assert_eq!(record.added_date, "2020-01-01 00:00:00");
        assert_eq!(record.workspace_config, custom);
        assert_eq!(record.url.as_deref(), Some("git@github.com:me/alpha.git"));
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let registrar = registrar(temp_dir.path());
        let result =
            BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path().join("nope")))
                .execute();
        assert!(matches!(result, Err(BulkScanError::RootNotFound { .. })));
    }

    #[test]
    fn test_malformed_store_aborts_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        make_repo_dir(temp_dir.path(), "alpha");
        let registrar = registrar(temp_dir.path());
        fs::write(registrar.store().path(), "[oops").unwrap();

        let result =
            BulkScanUseCase::new(&registrar, BulkScanConfig::new(temp_dir.path())).execute();
        assert!(matches!(result, Err(BulkScanError::Store(_))));
        assert_eq!(fs::read_to_string(registrar.store().path()).unwrap(), "[oops");
    }
}
