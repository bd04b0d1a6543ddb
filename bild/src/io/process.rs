//! Phase script execution.
//!
//! Scripts run through `sh -c` with the terminal's stdin/stdout/stderr
//! inherited, so interactive commands behave as if typed by hand. There is no
//! timeout: the call blocks until the shell exits.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, instrument};

/// Exit information for a finished script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptExit {
    pub success: bool,
    /// `None` when the shell was killed by a signal.
    pub code: Option<i32>,
}

impl From<ExitStatus> for ScriptExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over script execution. Tests use recording runners.
pub trait ScriptRunner {
    /// Run `script` in `workdir` and wait for it.
    ///
    /// An `Err` means the shell could not be started at all.
    fn run(&self, script: &str, workdir: &Path) -> std::io::Result<ScriptExit>;
}

/// Runs scripts with `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ScriptRunner for ShellRunner {
    #[instrument(skip_all, fields(workdir = %workdir.display()))]
    fn run(&self, script: &str, workdir: &Path) -> std::io::Result<ScriptExit> {
        debug!(bytes = script.len(), "spawning sh");
        let status = Command::new("sh")
            .arg("-c")
            .arg(script)
            .current_dir(workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        debug!(exit_code = ?status.code(), "sh finished");
        Ok(status.into())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn runs_in_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let exit = ShellRunner
            .run("set -e\ntouch marker\n", temp.path())
            .expect("run");
        assert!(exit.success);
        assert!(temp.path().join("marker").exists());
    }

    #[test]
    fn reports_exit_code() {
        let temp = tempfile::tempdir().expect("tempdir");
        let exit = ShellRunner.run("exit 7\n", temp.path()).expect("run");
        assert_eq!(
            exit,
            ScriptExit {
                success: false,
                code: Some(7)
            }
        );
    }

    #[test]
    fn abort_directive_stops_at_first_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let exit = ShellRunner
            .run("set -e\necho one >> log\nfalse\necho two >> log\n", temp.path())
            .expect("run");
        assert!(!exit.success);
        let log = fs::read_to_string(temp.path().join("log")).expect("read log");
        assert_eq!(log, "one\n");
    }

    #[test]
    fn missing_workdir_is_spawn_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("gone");
        assert!(ShellRunner.run("true\n", &missing).is_err());
    }
}
