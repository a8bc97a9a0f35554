use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::value_objects::git_url::GitUrl;

/// エディタのデフォルトワークスペース番号
pub const DEFAULT_EDITOR_WORKSPACE: u32 = 2;

/// ローカル開発サーバーのデフォルトワークスペース番号
pub const DEFAULT_LOCALHOST_WORKSPACE: u32 = 3;

/// Issue一覧のデフォルトワークスペース番号
pub const DEFAULT_ISSUES_WORKSPACE: u32 = 4;

/// チャットのデフォルトワークスペース番号
pub const DEFAULT_CHAT_WORKSPACE: u32 = 5;

/// デフォルトのチャットURL
pub const DEFAULT_CHAT_URL: &str = "https://chat.openai.com";

/// デフォルトのローカル開発サーバーURL
pub const DEFAULT_LOCALHOST_URL: &str = "http://localhost:3000";

/// ワークスペースに配置するアプリケーションの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRole {
    /// プロジェクトディレクトリを開くエディタ
    Editor,
    /// Issue一覧を表示するブラウザ
    Issues,
    /// ローカル開発サーバーを表示するブラウザ
    LocalDev,
    /// チャットアプリケーション
    Chat,
}

impl AppRole {
    /// 起動順に並べた全ての役割
    pub const LAUNCH_ORDER: [AppRole; 4] = [
        AppRole::Editor,
        AppRole::Issues,
        AppRole::LocalDev,
        AppRole::Chat,
    ];

    /// 表示用の名前
    pub fn label(self) -> &'static str {
        match self {
            AppRole::Editor => "editor",
            AppRole::Issues => "issues",
            AppRole::LocalDev => "local-dev",
            AppRole::Chat => "chat",
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_editor_workspace() -> u32 {
    DEFAULT_EDITOR_WORKSPACE
}

fn default_issues_workspace() -> u32 {
    DEFAULT_ISSUES_WORKSPACE
}

fn default_chat_workspace() -> u32 {
    DEFAULT_CHAT_WORKSPACE
}

fn default_localhost_workspace() -> u32 {
    DEFAULT_LOCALHOST_WORKSPACE
}

fn default_chat_url() -> Option<String> {
    Some(DEFAULT_CHAT_URL.to_string())
}

fn default_localhost_url() -> Option<String> {
    Some(DEFAULT_LOCALHOST_URL.to_string())
}

/// プロジェクトごとのワークスペース設定
///
/// ワークスペース番号は1始まり。古い形式のキー（cursor_workspace、
/// github_workspace、github_url）も読み込め、保存時は新しいキー名で書かれる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// エディタのワークスペース番号
    #[serde(default = "default_editor_workspace", alias = "cursor_workspace")]
    pub editor_workspace: u32,

    /// Issue一覧のワークスペース番号
    #[serde(default = "default_issues_workspace", alias = "github_workspace")]
    pub issues_workspace: u32,

    /// チャットのワークスペース番号
    #[serde(default = "default_chat_workspace")]
    pub chat_workspace: u32,

    /// ローカル開発サーバーのワークスペース番号
    #[serde(default = "default_localhost_workspace")]
    pub localhost_workspace: u32,

    /// Issue一覧のURL
    #[serde(
        default,
        alias = "github_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub issues_url: Option<String>,

    /// チャットのURL
    #[serde(default = "default_chat_url", skip_serializing_if = "Option::is_none")]
    pub chat_url: Option<String>,

    /// ローカル開発サーバーのURL
    #[serde(
        default = "default_localhost_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub localhost_url: Option<String>,

    /// 未知のキー（書き戻し時にそのまま残す）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            editor_workspace: DEFAULT_EDITOR_WORKSPACE,
            issues_workspace: DEFAULT_ISSUES_WORKSPACE,
            chat_workspace: DEFAULT_CHAT_WORKSPACE,
            localhost_workspace: DEFAULT_LOCALHOST_WORKSPACE,
            issues_url: None,
            chat_url: default_chat_url(),
            localhost_url: default_localhost_url(),
            extra: Map::new(),
        }
    }
}

impl WorkspaceConfig {
    /// リモートURLからデフォルト設定を作成
    pub fn for_remote(remote: Option<&GitUrl>) -> Self {
        Self {
            issues_url: remote.and_then(GitUrl::issues_url),
            ..Self::default()
        }
    }

    /// チャットURLを設定
    pub fn with_chat_url(mut self, chat_url: impl Into<String>) -> Self {
        self.chat_url = Some(chat_url.into());
        self
    }

    /// ローカル開発サーバーURLを設定
    pub fn with_localhost_url(mut self, localhost_url: impl Into<String>) -> Self {
        self.localhost_url = Some(localhost_url.into());
        self
    }

    /// 役割に対応するワークスペース番号を取得
    pub fn workspace_for(&self, role: AppRole) -> u32 {
        match role {
            AppRole::Editor => self.editor_workspace,
            AppRole::Issues => self.issues_workspace,
            AppRole::LocalDev => self.localhost_workspace,
            AppRole::Chat => self.chat_workspace,
        }
    }

    /// 役割に対応するURLを取得（エディタはURLを持たない）
    pub fn url_for(&self, role: AppRole) -> Option<&str> {
        match role {
            AppRole::Editor => None,
            AppRole::Issues => self.issues_url.as_deref(),
            AppRole::LocalDev => self.localhost_url.as_deref(),
            AppRole::Chat => self.chat_url.as_deref(),
        }
    }

    /// 使用する最大のワークスペース番号
    pub fn max_workspace(&self) -> u32 {
        AppRole::LAUNCH_ORDER
            .iter()
            .map(|role| self.workspace_for(*role))
            .max()
            .unwrap_or(DEFAULT_EDITOR_WORKSPACE)
    }

    /// 起動後にフォーカスするワークスペース（エディタのワークスペース）
    pub fn starting_workspace(&self) -> u32 {
        self.editor_workspace
    }

    /// 使用するワークスペース番号の一覧（重複なし、昇順）
    pub fn target_workspaces(&self) -> Vec<u32> {
        let mut workspaces: Vec<u32> = AppRole::LAUNCH_ORDER
            .iter()
            .map(|role| self.workspace_for(*role))
            .collect();
        workspaces.sort_unstable();
        workspaces.dedup();
        workspaces
    }
}
