use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum GitUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Missing repository path")]
    MissingRepoPath,

    #[error("Invalid characters in URL: {0}")]
    InvalidCharacters(String),

    #[error("URL must not start with '-': {0}")]
    OptionInjection(String),
}

/// scp形式（[user@]host:path）のパターン
fn scp_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9._-]+@)?([A-Za-z0-9.-]+):(.+)$").expect("scp-like pattern is valid")
    })
}

/// Git URLの値オブジェクト
///
/// 入力されたURL文字列はそのまま保持し、`git clone` にはその文字列を渡す。
/// プロジェクト名やブラウザ用URLは解析結果から導出する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitUrl {
    /// 入力されたURL（前後の空白のみ除去）
    raw: String,

    /// スキーム（https、http、ssh、git、file）
    scheme: String,

    /// ホスト名（fileスキームではNone）
    host: Option<String>,

    /// ポート番号（明示されている場合のみ）
    port: Option<u16>,

    /// リポジトリパス（先頭と末尾の/を除去済み、.gitは残す）
    repo_path: String,
}

impl GitUrl {
    /// 新しいGitUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        let trimmed = url.trim();
        Self::validate_characters(trimmed)?;

        let (scheme, host, port, repo_path) = Self::parse_url(trimmed)?;

        let url = Self {
            raw: trimmed.to_string(),
            scheme,
            host,
            port,
            repo_path,
        };

        if url.repo_name().is_empty() {
            return Err(GitUrlError::MissingRepoPath);
        }

        Ok(url)
    }

    /// 文字レベルの検証
    fn validate_characters(url: &str) -> Result<(), GitUrlError> {
        if url.is_empty() {
            return Err(GitUrlError::InvalidFormat("Empty URL".to_string()));
        }

        // git clone のオプションとして解釈されるのを防ぐ
        if url.starts_with('-') {
            return Err(GitUrlError::OptionInjection(url.to_string()));
        }

        for ch in url.chars() {
            if ch.is_control() || ch.is_whitespace() {
                return Err(GitUrlError::InvalidCharacters(format!(
                    "Unexpected character: {:?}",
                    ch
                )));
            }
        }

        Ok(())
    }

    /// URLを解析してコンポーネントに分割
    fn parse_url(
        url: &str,
    ) -> Result<(String, Option<String>, Option<u16>, String), GitUrlError> {
        // ローカルの絶対パス
        if url.starts_with('/') {
            let repo_path = Self::clean_path(url)?;
            return Ok(("file".to_string(), None, None, repo_path));
        }

        // SSH形式（git@host:path）
        if !url.contains("://") {
            let captures = scp_like_pattern()
                .captures(url)
                .ok_or_else(|| GitUrlError::InvalidFormat(url.to_string()))?;
            let host = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .ok_or(GitUrlError::MissingHost)?;
            let path = captures
                .get(2)
                .map(|m| m.as_str())
                .ok_or(GitUrlError::MissingRepoPath)?;
            let repo_path = Self::clean_path(path)?;
            return Ok(("ssh".to_string(), Some(host), None, repo_path));
        }

        let parsed = Url::parse(url).map_err(|_| GitUrlError::InvalidFormat(url.to_string()))?;
        let scheme = parsed.scheme().to_string();

        // サポートされるスキームのチェック
        if !matches!(scheme.as_str(), "https" | "http" | "ssh" | "git" | "file") {
            return Err(GitUrlError::UnsupportedScheme(scheme));
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(GitUrlError::InvalidCharacters(
                "Query strings and fragments are not allowed".to_string(),
            ));
        }

        let host = if scheme == "file" {
            None
        } else {
            Some(
                parsed
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .ok_or(GitUrlError::MissingHost)?
                    .to_string(),
            )
        };

        let repo_path = Self::clean_path(parsed.path())?;

        Ok((scheme, host, parsed.port(), repo_path))
    }

    /// パスの先頭と末尾の/を除去し、空でないことを確認
    fn clean_path(path: &str) -> Result<String, GitUrlError> {
        let cleaned = path.trim_matches('/');
        if cleaned.is_empty() {
            return Err(GitUrlError::MissingRepoPath);
        }
        if cleaned.split('/').any(|segment| segment == "..") {
            return Err(GitUrlError::InvalidFormat(format!(
                "Path traversal in repository path: {}",
                path
            )));
        }
        Ok(cleaned.to_string())
    }

    /// 入力されたURL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// スキームを取得
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// ホスト名を取得
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// リポジトリパスを取得
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// リポジトリ名（最後のパス要素から.gitを除去したもの）を取得
    pub fn repo_name(&self) -> &str {
        let last = self.repo_path.rsplit('/').next().unwrap_or(&self.repo_path);
        last.strip_suffix(".git").unwrap_or(last)
    }

    /// ブラウザで開けるURLを生成
    ///
    /// SSH形式やgit://はhttpsに変換する。ローカルパスの場合はNone。
    pub fn web_url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let path = self
            .repo_path
            .strip_suffix(".git")
            .unwrap_or(&self.repo_path);

        match self.scheme.as_str() {
            "http" | "https" => match self.port {
                Some(port) => Some(format!("{}://{}:{}/{}", self.scheme, host, port, path)),
                None => Some(format!("{}://{}/{}", self.scheme, host, path)),
            },
            _ => Some(format!("https://{}/{}", host, path)),
        }
    }

    /// Issue一覧のURLを生成
    pub fn issues_url(&self) -> Option<String> {
        self.web_url().map(|web| format!("{}/issues", web))
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::new(url)
    }
}

impl TryFrom<String> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        GitUrl::new(&url)
    }
}
