use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::git_url::GitUrl;

/// プロジェクト名関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum ProjectNameError {
    #[error("Project name cannot be empty")]
    Empty,

    #[error("Project name is reserved: {0}")]
    Reserved(String),

    #[error("Invalid character {character:?} in project name: {name}")]
    InvalidCharacter { name: String, character: char },

    #[error("Cannot derive a project name from path: {0}")]
    NotDerivable(String),
}

/// プロジェクト名の値オブジェクト
///
/// ストアのキーであり、プロジェクトディレクトリ名としても使われる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(String);

impl ProjectName {
    /// 新しいProjectNameを作成
    pub fn new(name: impl Into<String>) -> Result<Self, ProjectNameError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ProjectNameError::Empty);
        }

        if name == "." || name == ".." {
            return Err(ProjectNameError::Reserved(name));
        }

        if let Some(character) = name
            .chars()
            .find(|c| *c == '/' || *c == '\\' || c.is_control())
        {
            return Err(ProjectNameError::InvalidCharacter { name, character });
        }

        Ok(Self(name))
    }

    /// Git URLの最後のパス要素から導出（.gitは除去）
    pub fn from_git_url(url: &GitUrl) -> Result<Self, ProjectNameError> {
        Self::new(url.repo_name())
    }

    /// ディレクトリのベース名から導出
    pub fn from_directory(path: &Path) -> Result<Self, ProjectNameError> {
        let base = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ProjectNameError::NotDerivable(path.display().to_string()))?;
        Self::new(base)
    }

    /// 文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stringに変換
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
