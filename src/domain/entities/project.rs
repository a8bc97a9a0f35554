use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::workspace_config::WorkspaceConfig;

/// 登録日時のフォーマット
pub const ADDED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// プロジェクトの付加情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// 最後に開いた時刻（UNIX秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<i64>,

    /// プロジェクトの状態（自由記述）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// 未知のキー（書き戻し時にそのまま残す）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// プロジェクトレコード
///
/// ストアのJSONではプロジェクト名をキーとしたオブジェクトの値になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// 作業ディレクトリの絶対パス
    pub path: PathBuf,

    /// GitリモートURL（ローカルのみのプロジェクトではNone）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// 登録日時
    #[serde(default)]
    pub added_date: String,

    /// ワークスペース設定
    #[serde(default)]
    pub workspace_config: WorkspaceConfig,

    /// 付加情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProjectMetadata>,

    /// 未知のキー（書き戻し時にそのまま残す）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectRecord {
    /// 新しいレコードを作成（登録日時は現在時刻）
    pub fn new(path: impl Into<PathBuf>, workspace_config: WorkspaceConfig) -> Self {
        Self {
            path: path.into(),
            url: None,
            added_date: chrono::Local::now().format(ADDED_DATE_FORMAT).to_string(),
            workspace_config,
            metadata: None,
            extra: Map::new(),
        }
    }

    /// リモートURLを設定
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// 登録日時を設定
    pub fn with_added_date(mut self, added_date: impl Into<String>) -> Self {
        self.added_date = added_date.into();
        self
    }

    /// 付加情報を設定
    pub fn with_metadata(mut self, metadata: Option<ProjectMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// 最終アクセス時刻を記録
    pub fn touch(&mut self, timestamp: i64) {
        self.metadata
            .get_or_insert_with(ProjectMetadata::default)
            .last_accessed = Some(timestamp);
    }

    /// 作業ディレクトリのパス
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 名前解決済みのプロジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// プロジェクト名（ストアのキー）
    pub name: String,

    /// プロジェクトレコード
    pub record: ProjectRecord,
}

impl Project {
    /// 新しいProjectを作成
    pub fn new(name: impl Into<String>, record: ProjectRecord) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }
}

/// プロジェクト名からレコードへのマッピング
///
/// キー順に並ぶため、保存されるJSONは常に同じ順序になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCatalog {
    projects: BTreeMap<String, ProjectRecord>,
}

impl ProjectCatalog {
    /// 空のカタログを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// 名前が登録済みかどうか
    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// レコードを取得
    pub fn get(&self, name: &str) -> Option<&ProjectRecord> {
        self.projects.get(name)
    }

    /// レコードを追加または上書き（以前のレコードを返す）
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        record: ProjectRecord,
    ) -> Option<ProjectRecord> {
        self.projects.insert(name.into(), record)
    }

    /// 名前の一覧（昇順）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// 名前とレコードの一覧（名前の昇順）
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectRecord)> {
        self.projects.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// 名前を指定してProjectを取り出す
    pub fn project(&self, name: &str) -> Option<Project> {
        self.projects
            .get(name)
            .map(|record| Project::new(name, record.clone()))
    }
}
