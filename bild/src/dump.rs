//! Orchestration for `bild dump`: copy a global project into the repository.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::error::BildError;
use crate::io::config::{load_config, save_local_config};
use crate::io::context::ConfigContext;
use crate::io::git::RepoLocator;

/// Write `project_name` from the global config to `<repo root>/.bild.json`.
///
/// Returns the written path. Requires a repository root.
#[instrument(skip_all, fields(project = project_name))]
pub fn dump_project<L: RepoLocator>(
    ctx: &ConfigContext,
    locator: &L,
    project_name: &str,
) -> Result<PathBuf, BildError> {
    let cfg = load_config(ctx)?;
    let project = cfg
        .projects
        .get(project_name)
        .ok_or_else(|| BildError::ProjectNotFound {
            project: project_name.to_string(),
        })?;
    let root = locator.find_root().ok_or(BildError::NotInRepository)?;
    let path = save_local_config(&root, project_name, project)?;
    info!(path = %path.display(), "local config written");
    Ok(path)
}
