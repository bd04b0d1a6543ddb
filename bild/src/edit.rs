//! Orchestration for `bild edit`.
//!
//! Both flavors load the global config, round-trip text through an
//! [`Editor`], and save immediately. Local `.bild.json` files are never edited
//! here.

use tracing::{info, instrument};

use crate::core::document::{parse_document, render_project};
use crate::core::phase_text::{parse_phase, render_phase};
use crate::core::types::{Phase, ProjectConfig};
use crate::error::BildError;
use crate::io::config::{load_config, save_config};
use crate::io::context::ConfigContext;
use crate::io::editor::Editor;

/// Phase names and command counts after a whole-project edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEdit {
    pub project: String,
    pub phases: Vec<(String, usize)>,
}

/// Result of a single-phase edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEdit {
    /// Phase saved with this many commands.
    Updated(usize),
    /// Edit left no commands, so the phase was removed.
    Removed,
}

/// Edit every phase of a project as one Markdown document.
///
/// Missing projects are created. Phases left without commands are dropped,
/// and the document order becomes the new execution order.
#[instrument(skip_all, fields(project = project_name))]
pub fn edit_project<E: Editor>(
    ctx: &ConfigContext,
    project_name: &str,
    editor: &E,
) -> Result<ProjectEdit, BildError> {
    let mut cfg = load_config(ctx)?;
    let project = cfg.projects.entry(project_name.to_string()).or_default();

    let edited = editor.edit(&render_project(project_name, project))?;
    project.phases = parse_document(&edited);

    let phases = project
        .phases
        .iter()
        .map(|phase| (phase.name.clone(), phase.commands.len()))
        .collect::<Vec<_>>();
    save_config(ctx, &cfg)?;
    info!(phases = phases.len(), "project updated");
    Ok(ProjectEdit {
        project: project_name.to_string(),
        phases,
    })
}

/// Edit one phase as plain text, one command per line.
///
/// Missing projects and phases are created; a new phase goes last. A blank
/// phase name is rejected before the editor opens.
#[instrument(skip_all, fields(project = project_name, phase = phase_name))]
pub fn edit_phase<E: Editor>(
    ctx: &ConfigContext,
    project_name: &str,
    phase_name: &str,
    editor: &E,
) -> Result<PhaseEdit, BildError> {
    if phase_name.trim().is_empty() {
        return Err(BildError::PhaseNameRequired);
    }
    let mut cfg = load_config(ctx)?;
    let project = cfg.projects.entry(project_name.to_string()).or_default();

    let current = project
        .phase(phase_name)
        .map(|phase| phase.commands.clone())
        .unwrap_or_default();
    let edited = editor.edit(&render_phase(phase_name, &current))?;
    let outcome = apply_phase_commands(project, phase_name, parse_phase(&edited));

    save_config(ctx, &cfg)?;
    info!(outcome = ?outcome, "phase updated");
    Ok(outcome)
}

fn apply_phase_commands(
    project: &mut ProjectConfig,
    phase_name: &str,
    commands: Vec<String>,
) -> PhaseEdit {
    if commands.is_empty() {
        if let Some(index) = project.phases.iter().position(|p| p.name == phase_name) {
            project.phases.remove(index);
        }
        return PhaseEdit::Removed;
    }
    let count = commands.len();
    match project.phase_mut(phase_name) {
        Some(phase) => phase.commands = commands,
        None => project.phases.push(Phase {
            name: phase_name.to_string(),
            commands,
        }),
    }
    PhaseEdit::Updated(count)
}
