use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::project::ProjectRecord;
use crate::domain::entities::workspace_config::WorkspaceConfig;
use crate::domain::value_objects::git_url::{GitUrl, GitUrlError};
use crate::domain::value_objects::project_name::{ProjectName, ProjectNameError};
use crate::infrastructure::filesystem::project_store::{ProjectStore, ProjectStoreError};
use crate::infrastructure::scm::{ScmError, ScmOperations};

/// RegisterRepository関連のエラー
#[derive(Debug, Error)]
pub enum RegisterRepositoryError {
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(#[from] GitUrlError),

    #[error("Invalid project name: {0}")]
    InvalidName(#[from] ProjectNameError),

    #[error("{} already exists and is not a Git repository", .path.display())]
    DestinationNotRepository { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error(transparent)]
    Scm(#[from] ScmError),

    #[error(transparent)]
    Store(#[from] ProjectStoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// レコード作成時に上書きするURL
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// チャットURL（Noneの場合はデフォルト）
    pub chat_url: Option<String>,

    /// ローカル開発サーバーURL（Noneの場合はデフォルト）
    pub localhost_url: Option<String>,
}

impl RegisterOptions {
    pub fn with_chat_url(mut self, chat_url: impl Into<String>) -> Self {
        self.chat_url = Some(chat_url.into());
        self
    }

    pub fn with_localhost_url(mut self, localhost_url: impl Into<String>) -> Self {
        self.localhost_url = Some(localhost_url.into());
        self
    }
}

/// 登録結果
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// プロジェクト名
    pub name: ProjectName,

    /// 書き込まれたレコード
    pub record: ProjectRecord,

    /// 今回クローンしたか（既存のリポジトリを使った場合はfalse）
    pub cloned: bool,

    /// 同名の既存レコードを上書きしたか
    pub replaced: bool,
}

/// リポジトリをプロジェクトとして登録するユースケース
pub struct RegisterRepositoryUseCase {
    scm: Box<dyn ScmOperations>,
    store: ProjectStore,
    projects_dir: PathBuf,
}

impl RegisterRepositoryUseCase {
    /// 新しいRegisterRepositoryUseCaseインスタンスを作成
    pub fn new(
        scm: Box<dyn ScmOperations>,
        store: ProjectStore,
        projects_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scm,
            store,
            projects_dir: projects_dir.into(),
        }
    }

    pub fn scm(&self) -> &dyn ScmOperations {
        self.scm.as_ref()
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// URLからリポジトリを登録（必要ならクローン）
    ///
    /// クローンに失敗した場合はレコードを書き込まない。
    pub async fn register_url(
        &self,
        url: &str,
        options: &RegisterOptions,
    ) -> Result<RegistrationOutcome, RegisterRepositoryError> {
        // 1. URLとプロジェクト名の決定
        let git_url = GitUrl::new(url)?;
        let name = ProjectName::from_git_url(&git_url)?;
        let target = self.projects_dir.join(name.as_str());

        // 壊れたストアに登録できないクローンを残さない
        self.store.load()?;

        // 2. クローン（既存のリポジトリがあればスキップ）
        let cloned = if target.exists() {
            if !self.scm.is_repository(&target) {
                return Err(RegisterRepositoryError::DestinationNotRepository { path: target });
            }
            debug!("{} already exists, skipping clone", target.display());
            false
        } else {
            fs::create_dir_all(&self.projects_dir)?;
            self.scm.clone_repository(&git_url, &target).await?;
            true
        };

        // 3. レコードの作成と保存
        let record = Self::build_record(&target, Some(&git_url), options);
        let replaced = self.store.upsert(name.as_str(), record.clone())?.is_some();

        info!("Registered project {} at {}", name, target.display());
        Ok(RegistrationOutcome {
            name,
            record,
            cloned,
            replaced,
        })
    }

    /// 既存のディレクトリを登録（クローンしない）
    pub fn register_local(
        &self,
        dir: &Path,
        options: &RegisterOptions,
    ) -> Result<RegistrationOutcome, RegisterRepositoryError> {
        let (name, record) = self.prepare_local(dir, options)?;
        let replaced = self.store.upsert(name.as_str(), record.clone())?.is_some();

        info!("Registered local project {} at {}", name, dir.display());
        Ok(RegistrationOutcome {
            name,
            record,
            cloned: false,
            replaced,
        })
    }

    /// 既存ディレクトリの名前とレコードを作成（保存はしない）
    ///
    /// リモートはoriginを優先し、なければ最初のリモート、どちらもなければローカルのみ。
    /// 解釈できないリモート（相対パスなど）もローカルのみとして扱う。
    pub fn prepare_local(
        &self,
        dir: &Path,
        options: &RegisterOptions,
    ) -> Result<(ProjectName, ProjectRecord), RegisterRepositoryError> {
        if !dir.is_dir() {
            return Err(RegisterRepositoryError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let name = ProjectName::from_directory(dir)?;

        let remote = if self.scm.is_repository(dir) {
            self.scm
                .remote_url(dir)?
                .and_then(|url| match GitUrl::new(&url) {
                    Ok(git_url) => Some(git_url),
                    Err(e) => {
                        warn!("Ignoring remote {} of {}: {}", url, dir.display(), e);
                        None
                    }
                })
        } else {
            None
        };

        Ok((name, Self::build_record(dir, remote.as_ref(), options)))
    }

    /// デフォルトのワークスペース設定でレコードを作成
    ///
    /// Issue URLはリモートのWeb URLに`/issues`を付けたもの。
    pub fn build_record(
        path: &Path,
        remote: Option<&GitUrl>,
        options: &RegisterOptions,
    ) -> ProjectRecord {
        let mut workspace_config = WorkspaceConfig::for_remote(remote);
        if let Some(chat_url) = &options.chat_url {
            workspace_config = workspace_config.with_chat_url(chat_url.as_str());
        }
        if let Some(localhost_url) = &options.localhost_url {
            workspace_config = workspace_config.with_localhost_url(localhost_url.as_str());
        }

        let record = ProjectRecord::new(path, workspace_config);
        match remote {
            Some(url) => record.with_url(url.as_str()),
            None => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scm::scm_interface::MockScmOperations;
    use mockall::predicate::always;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn use_case(scm: MockScmOperations, dir: &Path) -> RegisterRepositoryUseCase {
        RegisterRepositoryUseCase::new(Box::new(scm), ProjectStore::in_dir(dir), dir)
    }

    #[tokio::test]
    async fn test_register_url_clones_and_writes_record() {
        let temp_dir = TempDir::new().unwrap();
        let mut scm = MockScmOperations::new();
        scm.expect_clone_repository()
            .withf(|url, dest| url.as_str() == "https://example.com/foo.git" && dest.ends_with("foo"))
            .times(1)
            .returning(|_, dest| {
                std::fs::create_dir_all(dest.join(".git")).unwrap();
                Ok(())
            });

        let use_case = use_case(scm, temp_dir.path());
        let outcome = use_case
            .register_url("https://example.com/foo.git", &RegisterOptions::default())
            .await
            .unwrap();

        assert!(outcome.cloned);
        assert!(!outcome.replaced);
        assert_eq!(outcome.name.as_str(), "foo");

        let catalog = use_case.store().load().unwrap();
        let record = catalog.get("foo").unwrap();
        assert_eq!(record.url.as_deref(), Some("https://example.com/foo.git"));
        assert_eq!(record.path, temp_dir.path().join("foo"));
        let wc = &record.workspace_config;
        assert_eq!(
            (wc.editor_workspace, wc.issues_workspace, wc.chat_workspace, wc.localhost_workspace),
            (2, 4, 5, 3)
        );
        assert_eq!(
            wc.issues_url.as_deref(),
            Some("https://example.com/foo/issues")
        );
    }

    #[tokio::test]
    async fn test_existing_repository_skips_clone() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("foo")).unwrap();

        let mut scm = MockScmOperations::new();
        scm.expect_is_repository().return_const(true);
        scm.expect_clone_repository().never();

        let use_case = use_case(scm, temp_dir.path());
        let options = RegisterOptions::default();
        let first = use_case
            .register_url("git@github.com:me/foo.git", &options)
            .await
            .unwrap();
        let second = use_case
            .register_url("git@github.com:me/foo.git", &options)
            .await
            .unwrap();

        assert!(!first.cloned);
        assert!(second.replaced);
        assert_eq!(use_case.store().load().unwrap().len(), 1);
        assert_eq!(
            second.record.workspace_config.issues_url.as_deref(),
            Some("https://github.com/me/foo/issues")
        );
    }

    #[tokio::test]
    async fn test_existing_plain_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("foo")).unwrap();

        let mut scm = MockScmOperations::new();
        scm.expect_is_repository().return_const(false);
        scm.expect_clone_repository().never();

        let use_case = use_case(scm, temp_dir.path());
        let result = use_case
            .register_url("https://example.com/foo.git", &RegisterOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(RegisterRepositoryError::DestinationNotRepository { .. })
        ));
        assert!(use_case.store().load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clone_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut scm = MockScmOperations::new();
        scm.expect_clone_repository()
            .with(always(), always())
            .returning(|url, _| Err(ScmError::clone_failed(url.as_str(), "repository not found")));

        let use_case = use_case(scm, temp_dir.path());
        let result = use_case
            .register_url("https://example.com/missing.git", &RegisterOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(RegisterRepositoryError::Scm(ScmError::CloneFailed { .. }))
        ));
        assert!(!use_case.store().path().exists());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_cloning() {
        let temp_dir = TempDir::new().unwrap();
        let mut scm = MockScmOperations::new();
        scm.expect_clone_repository().never();

        let use_case = use_case(scm, temp_dir.path());
        let result = use_case
            .register_url("--upload-pack=evil", &RegisterOptions::default())
            .await;
        assert!(matches!(result, Err(RegisterRepositoryError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_malformed_store_stops_before_cloning() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("projects.json"), "{ not json").unwrap();
        let mut scm = MockScmOperations::new();
        scm.expect_clone_repository().never();

        let use_case = use_case(scm, temp_dir.path());
        let result = use_case
            .register_url("https://example.com/foo.git", &RegisterOptions::default())
            .await;

        assert!(matches!(result, Err(RegisterRepositoryError::Store(_))));
        assert!(!temp_dir.path().join("foo").exists());
    }

    #[test]
    fn test_unparseable_remote_registers_local_only() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("fork");
        std::fs::create_dir_all(&dir).unwrap();

        let mut scm = MockScmOperations::new();
        scm.expect_is_repository().return_const(true);
        scm.expect_remote_url()
            .returning(|_| Ok(Some("../upstream.git".to_string())));

        let use_case = use_case(scm, temp_dir.path());
        let (name, record) = use_case
            .prepare_local(&dir, &RegisterOptions::default())
            .unwrap();

        assert_eq!(name.as_str(), "fork");
        assert_eq!(record.url, None);
        assert_eq!(record.workspace_config.issues_url, None);
    }

    #[test]
    fn test_register_local_without_remote() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("scratch");
        std::fs::create_dir_all(&dir).unwrap();

        let mut scm = MockScmOperations::new();
        scm.expect_is_repository().return_const(true);
        scm.expect_remote_url().returning(|_| Ok(None));

        let use_case = use_case(scm, temp_dir.path());
        let outcome = use_case
            .register_local(&dir, &RegisterOptions::default())
            .unwrap();

        assert_eq!(outcome.name.as_str(), "scratch");
        assert_eq!(outcome.record.url, None);
        assert_eq!(outcome.record.workspace_config.issues_url, None);
    }

    #[test]
    fn test_register_local_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let use_case = use_case(MockScmOperations::new(), temp_dir.path());
        let result =
            use_case.register_local(&temp_dir.path().join("nope"), &RegisterOptions::default());
        assert!(matches!(
            result,
            Err(RegisterRepositoryError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_build_record_applies_overrides() {
        let url = GitUrl::new("https://gitlab.com/group/app.git").unwrap();
        let options = RegisterOptions::default()
            .with_chat_url("https://claude.ai")
            .with_localhost_url("http://localhost:8080");
        let record =
            RegisterRepositoryUseCase::build_record(Path::new("/p/app"), Some(&url), &options);

        assert_eq!(
            record.workspace_config.chat_url.as_deref(),
            Some("https://claude.ai")
        );
        assert_eq!(
            record.workspace_config.localhost_url.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(
            record.workspace_config.issues_url.as_deref(),
            Some("https://gitlab.com/group/app/issues")
        );
    }
}
