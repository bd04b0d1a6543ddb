//! Phase selection for `bild run`.

use crate::error::BildError;

use super::types::{Phase, ProjectConfig};

/// Phases to execute, in execution order.
///
/// With `requested = Some(name)` only the first phase with that exact name is
/// selected; otherwise every phase is selected in list order.
pub fn select_phases<'a>(
    project_name: &str,
    project: &'a ProjectConfig,
    requested: Option<&str>,
) -> Result<Vec<&'a Phase>, BildError> {
    match requested {
        None => Ok(project.phases.iter().collect()),
        Some(name) => project
            .phase(name)
            .map(|phase| vec![phase])
            .ok_or_else(|| BildError::PhaseNotFound {
                project: project_name.to_string(),
                phase: name.to_string(),
            }),
    }
}
