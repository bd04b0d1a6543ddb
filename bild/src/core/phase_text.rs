//! Plain-text format for editing a single phase: one command per line.

/// Initial editor contents for a phase.
///
/// Existing commands are listed as-is; an empty phase gets a short comment
/// template instead.
pub fn render_phase(phase_name: &str, commands: &[String]) -> String {
    if commands.is_empty() {
        return format!(
            "# Enter one command per line for phase '{phase_name}'.\n# Lines starting with '#' are ignored.\n"
        );
    }
    commands.join("\n")
}

/// Commands from edited text. Blank lines and `#` comments are skipped.
pub fn parse_phase(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
