//! Orchestration for `bild run`.
//!
//! Resolution order:
//! 1. the repository root (if any) becomes the working directory;
//! 2. a `.bild.json` there wins over everything, whatever project was asked for;
//! 3. otherwise the requested (or auto-detected) project is read from the
//!    global config.
//!
//! Phases then run one shell process each, in order, stopping at the first
//! failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::core::script::phase_script;
use crate::core::selector::select_phases;
use crate::core::types::ProjectConfig;
use crate::error::BildError;
use crate::highlight::Presenter;
use crate::io::config::{load_config, load_local_config};
use crate::io::context::ConfigContext;
use crate::io::git::{RepoLocator, root_name};
use crate::io::process::ScriptRunner;

/// What the caller asked to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunRequest<'a> {
    /// Project name; auto-detected from the repository when `None`.
    pub project: Option<&'a str>,
    /// Single phase to run; all phases when `None`.
    pub phase: Option<&'a str>,
}

/// Which file the executed project came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Local,
    Global,
}

/// Project chosen for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    pub name: String,
    pub project: ProjectConfig,
    pub source: ConfigSource,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub project: String,
    pub source: ConfigSource,
    pub workdir: PathBuf,
    /// Names of executed phases, in order.
    pub phases_run: Vec<String>,
}

/// Resolve, then execute the requested phases.
#[instrument(skip_all, fields(project = ?request.project, phase = ?request.phase))]
pub fn run_project<L, S, P>(
    ctx: &ConfigContext,
    cwd: &Path,
    locator: &L,
    runner: &S,
    presenter: &P,
    request: RunRequest<'_>,
) -> Result<RunOutcome, BildError>
where
    L: RepoLocator,
    S: ScriptRunner,
    P: Presenter,
{
    let root = locator.find_root();
    let workdir = enter_workdir(cwd, root.as_deref())?;
    presenter.workdir(root.as_deref());

    let detected = root.as_deref().and_then(root_name);
    let target = resolve_target(ctx, &workdir, request.project, detected)?;
    info!(project = %target.name, source = ?target.source, "project resolved");

    let phases_run = execute_phases(
        &target.name,
        &target.project,
        request.phase,
        &workdir,
        runner,
        presenter,
    )?;
    Ok(RunOutcome {
        project: target.name,
        source: target.source,
        workdir,
        phases_run,
    })
}

/// Working directory for the run: the repository root when known.
fn enter_workdir(cwd: &Path, root: Option<&Path>) -> Result<PathBuf, BildError> {
    let Some(root) = root else {
        debug!(cwd = %cwd.display(), "no repository, using current directory");
        return Ok(cwd.to_path_buf());
    };
    let is_dir = fs::metadata(root).and_then(|meta| {
        if meta.is_dir() {
            Ok(())
        } else {
            Err(io::Error::from(io::ErrorKind::NotADirectory))
        }
    });
    match is_dir {
        Ok(()) => Ok(root.to_path_buf()),
        Err(source) => Err(BildError::WorkdirUnavailable {
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Pick the project to run from `workdir`'s local config or the global one.
///
/// The global config is only read when no local config exists.
pub fn resolve_target(
    ctx: &ConfigContext,
    workdir: &Path,
    requested: Option<&str>,
    detected: Option<String>,
) -> Result<RunTarget, BildError> {
    if let Some(local) = load_local_config(workdir)? {
        if let Some(requested) = requested.filter(|name| *name != local.project) {
            info!(
                requested,
                local = %local.project,
                "local config overrides requested project"
            );
        }
        return Ok(RunTarget {
            name: local.project,
            project: local.config,
            source: ConfigSource::Local,
        });
    }

    let name = requested
        .map(str::to_string)
        .or(detected)
        .filter(|name| !name.is_empty())
        .ok_or(BildError::ProjectRequired)?;
    let mut cfg = load_config(ctx)?;
    let project = cfg
        .projects
        .remove(&name)
        .ok_or_else(|| BildError::ProjectNotFound {
            project: name.clone(),
        })?;
    Ok(RunTarget {
        name,
        project,
        source: ConfigSource::Global,
    })
}

/// Run the selected phases of `project` in order, stopping at the first
/// failing phase.
pub fn execute_phases<S, P>(
    project_name: &str,
    project: &ProjectConfig,
    requested_phase: Option<&str>,
    workdir: &Path,
    runner: &S,
    presenter: &P,
) -> Result<Vec<String>, BildError>
where
    S: ScriptRunner,
    P: Presenter,
{
    let selected = select_phases(project_name, project, requested_phase)?;
    let mut ran = Vec::with_capacity(selected.len());
    for phase in selected {
        presenter.phase_started(&phase.name);
        for command in &phase.commands {
            presenter.command(command);
        }

        let script = phase_script(phase);
        let exit = runner
            .run(&script, workdir)
            .map_err(|source| BildError::PhaseSpawn {
                phase: phase.name.clone(),
                source,
            })?;
        if !exit.success {
            return Err(BildError::PhaseFailed {
                phase: phase.name.clone(),
                code: exit.code,
            });
        }
        debug!(phase = %phase.name, "phase succeeded");
        ran.push(phase.name.clone());
    }
    Ok(ran)
}
