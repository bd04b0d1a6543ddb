//! Rendering for `bild list`.

use crate::core::types::Config;
use crate::highlight::highlight_command;

/// Human-readable listing of every project, phase and command.
pub fn render_listing(cfg: &Config) -> String {
    if cfg.projects.is_empty() {
        return "No projects registered.\n".to_string();
    }

    let mut out = String::from("📋 Registered projects:\n");
    for (name, project) in &cfg.projects {
        out.push_str(&format!("\n🔷 Project: {name}\n"));
        if project.phases.is_empty() {
            out.push_str("  No phases defined.\n");
            continue;
        }
        for phase in &project.phases {
            let count = phase.commands.len();
            let plural = if count == 1 { "" } else { "s" };
            out.push_str(&format!(
                "  📎 Phase: {} ({count} command{plural})\n",
                phase.name
            ));
            for command in &phase.commands {
                out.push_str(&format!("      $ {}\n", highlight_command(command)));
            }
        }
    }
    out
}
