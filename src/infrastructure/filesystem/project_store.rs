use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::project::{ProjectCatalog, ProjectRecord};

/// File name of the store inside the projects directory
pub const STORE_FILE_NAME: &str = "projects.json";

/// Project store related errors
#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("Project store {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read project store {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write project store {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// JSON file holding every registered project, keyed by name
///
/// There is no locking; concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<projects_dir>/projects.json`
    pub fn in_dir(projects_dir: impl AsRef<Path>) -> Self {
        Self::new(projects_dir.as_ref().join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog; a missing file is an empty catalog
    pub fn load(&self) -> Result<ProjectCatalog, ProjectStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No project store at {}, starting empty", self.path.display());
                return Ok(ProjectCatalog::new());
            }
            Err(source) => {
                return Err(ProjectStoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(ProjectCatalog::new());
        }

        serde_json::from_str(&contents).map_err(|source| ProjectStoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the catalog atomically as pretty JSON with sorted keys
    pub fn save(&self, catalog: &ProjectCatalog) -> Result<(), ProjectStoreError> {
        let content = Self::render(catalog)?;
        let write_failed = |source| ProjectStoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let temp_path = self.temp_path();
        let result = fs::File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(content.as_bytes())?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(write_failed(e));
        }

        debug!(
            "Saved {} projects to {}",
            catalog.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Insert or overwrite one record and save
    pub fn upsert(
        &self,
        name: &str,
        record: ProjectRecord,
    ) -> Result<Option<ProjectRecord>, ProjectStoreError> {
        let mut catalog = self.load()?;
        let previous = catalog.insert(name, record);
        self.save(&catalog)?;
        Ok(previous)
    }

    fn render(catalog: &ProjectCatalog) -> Result<String, ProjectStoreError> {
        // serde_json's Map is ordered, so going through Value sorts nested keys too
        let value = serde_json::to_value(catalog)?;
        let mut content = serde_json::to_string_pretty(&value)?;
        content.push('\n');
        Ok(content)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| STORE_FILE_NAME.to_string());
        self.path
            .with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()))
    }
}
