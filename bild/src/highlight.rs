//! Terminal presentation of runs and commands.
//!
//! Purely cosmetic: nothing here affects what gets executed. Colors follow
//! `console`'s terminal detection, so piped output and `NO_COLOR` stay plain.

use std::path::Path;
use std::sync::LazyLock;

use console::{Emoji, style};
use regex::Regex;

static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");

/// Receives run progress for display.
pub trait Presenter {
    /// Working directory decision: `Some(root)` when a repository root was
    /// found, `None` when running in the current directory.
    fn workdir(&self, root: Option<&Path>);
    fn phase_started(&self, name: &str);
    fn command(&self, command: &str);
}

/// Presenter printing to stdout with highlighted commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn workdir(&self, root: Option<&Path>) {
        match root {
            Some(root) => println!(
                "Changing working directory to repository root: {}",
                root.display()
            ),
            None => println!("Not a git repository; running in current directory."),
        }
    }

    fn phase_started(&self, name: &str) {
        println!("\n{PACKAGE}Running phase: {}", style(name).bold());
    }

    fn command(&self, command: &str) {
        println!("$ {}", highlight_command(command));
    }
}

const KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "in", "function", "select", "time",
];

const BUILTINS: &[&str] = &[
    "cd", "echo", "export", "set", "unset", "source", ".", "exit", "return", "local", "read",
    "test", "[", "[[", "eval", "exec", "true", "false",
];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<comment>#.*$)"#,
        r#"|(?P<string>'[^']*'|"(?:[^"\\]|\\.)*")"#,
        r#"|(?P<var>\$\{[^}]*\}|\$[A-Za-z_][A-Za-z0-9_]*|\$[0-9?@#*$!-])"#,
        r#"|(?P<sep>&&|\|\||[|;&])"#,
        r#"|(?P<redirect>[0-9]*>>?|<)"#,
        r#"|(?P<flag>--?[A-Za-z0-9][A-Za-z0-9_=.-]*)"#,
        r#"|(?P<word>[^\s'"$|;&<>]+)"#,
    ))
    .expect("token regex should be valid")
});

/// Syntax-highlight one shell command line.
///
/// The visible text is never altered: stripping ANSI codes from the result
/// yields `command` exactly.
pub fn highlight_command(command: &str) -> String {
    let mut out = String::with_capacity(command.len() * 2);
    let mut last = 0;
    let mut command_position = true;

    for caps in TOKEN_RE.captures_iter(command) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        out.push_str(&command[last..token.start()]);
        last = token.end();
        let text = token.as_str();

        let styled = if caps.name("comment").is_some() {
            style(text).dim().to_string()
        } else if caps.name("string").is_some() {
            command_position = false;
            style(text).yellow().to_string()
        } else if caps.name("var").is_some() {
            command_position = false;
            style(text).cyan().to_string()
        } else if caps.name("sep").is_some() {
            command_position = true;
            style(text).red().to_string()
        } else if caps.name("redirect").is_some() {
            style(text).red().to_string()
        } else if caps.name("flag").is_some() {
            style(text).blue().to_string()
        } else if KEYWORDS.contains(&text) {
            command_position = true;
            style(text).magenta().bold().to_string()
        } else if command_position && !text.contains('=') {
            command_position = false;
            if BUILTINS.contains(&text) {
                style(text).green().to_string()
            } else {
                style(text).green().bold().to_string()
            }
        } else {
            text.to_string()
        };
        out.push_str(&styled);
    }
    out.push_str(&command[last..]);
    out
}
