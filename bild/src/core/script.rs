//! Shell script assembly for a phase.

use super::types::Phase;

/// Directive that makes the shell abort on the first failing command.
pub const ABORT_ON_ERROR: &str = "set -e";

/// One script running every command of `phase` in order.
pub fn phase_script(phase: &Phase) -> String {
    let mut script = String::from(ABORT_ON_ERROR);
    script.push('\n');
    for command in &phase.commands {
        script.push_str(command);
        script.push('\n');
    }
    script
}
