//! # pj - project launcher
//!
//! `pj` keeps a small registry of development projects in
//! `<projects_dir>/projects.json` and opens a project by name: the editor on
//! the working tree, the issue tracker, the local development server and a chat
//! page, each placed maximized on its own virtual-desktop workspace.
//!
//! ## Usage
//!
//! ```bash
//! pj --add https://github.com/acme/web.git   # clone and register
//! pj --all                                    # register every repository in ~/Projects
//! pj --list                                   # show registered projects
//! pj web                                      # open by full or partial name
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: project records, workspace layout, Git URLs and project names
//! - [`application`]: name resolution, registration, bulk scan and the launcher
//! - [`infrastructure`]: JSON store, YAML config, git, wmctrl and process spawning
//! - [`presentation`]: CLI parsing and terminal output
//! - [`common`]: crate-wide error type, exit codes and command templates
//!
//! ## Library use
//!
//! ```rust,no_run
//! use pj::application::services::name_resolver::NameResolver;
//! use pj::infrastructure::filesystem::project_store::ProjectStore;
//!
//! # fn example() -> pj::Result<()> {
//! let store = ProjectStore::in_dir("/home/me/Projects");
//! let catalog = store.load()?;
//! let project = NameResolver::new().resolve("web", &catalog)?;
//! println!("{} -> {}", project.name, project.record.path.display());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::common::error::{ExitCode, PjError};
pub use crate::common::result::PjResult as Result;
