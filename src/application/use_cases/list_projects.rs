use std::path::PathBuf;

use crate::infrastructure::filesystem::project_store::{ProjectStore, ProjectStoreError};

/// 一覧表示用のプロジェクト情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub path: PathBuf,
    pub url: Option<String>,
    pub last_accessed: Option<i64>,
}

/// 登録済みプロジェクトを名前順に返すユースケース
pub struct ListProjectsUseCase<'a> {
    store: &'a ProjectStore,
}

impl<'a> ListProjectsUseCase<'a> {
    pub fn new(store: &'a ProjectStore) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<Vec<ProjectSummary>, ProjectStoreError> {
        let catalog = self.store.load()?;
        Ok(catalog
            .iter()
            .map(|(name, record)| ProjectSummary {
                name: name.to_string(),
                path: record.path.clone(),
                url: record.url.clone(),
                last_accessed: record.metadata.as_ref().and_then(|m| m.last_accessed),
            })
            .collect())
    }
}
