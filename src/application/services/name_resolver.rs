use thiserror::Error;

use crate::domain::entities::project::{Project, ProjectCatalog};

/// 名前解決関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("No project matches '{query}'")]
    NotFound { query: String },

    #[error("'{query}' matches several projects: {}", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },

    #[error("No projects registered yet")]
    EmptyCatalog,

    #[error("Project name cannot be empty")]
    EmptyQuery,
}

/// 部分一致によるプロジェクト名の解決
///
/// 完全一致（大文字小文字を区別）があればそれを優先し、なければ
/// 大文字小文字を無視した部分一致で候補を探す。候補が複数ある場合は
/// 対話的に選ばせず、曖昧エラーとして全候補を返す。
#[derive(Debug, Default)]
pub struct NameResolver;

impl NameResolver {
    /// 新しいNameResolverを作成
    pub fn new() -> Self {
        Self
    }

    /// クエリをプロジェクトに解決
    pub fn resolve(&self, query: &str, catalog: &ProjectCatalog) -> Result<Project, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        if catalog.is_empty() {
            return Err(ResolveError::EmptyCatalog);
        }

        if let Some(project) = catalog.project(query) {
            return Ok(project);
        }

        let candidates = self.candidates(query, catalog);
        match candidates.as_slice() {
            [] => Err(ResolveError::NotFound {
                query: query.to_string(),
            }),
            [only] => catalog.project(only).ok_or_else(|| ResolveError::NotFound {
                query: query.to_string(),
            }),
            _ => Err(ResolveError::Ambiguous {
                query: query.to_string(),
                candidates,
            }),
        }
    }

    /// クエリを含む名前の一覧（昇順）
    pub fn candidates(&self, query: &str, catalog: &ProjectCatalog) -> Vec<String> {
        let needle = query.to_lowercase();
        catalog
            .names()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect()
    }
}
