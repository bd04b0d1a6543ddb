//! Test-only fixtures and scripted collaborators.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::types::{Config, Phase, ProjectConfig};
use crate::error::BildError;
use crate::highlight::Presenter;
use crate::io::editor::Editor;
use crate::io::git::RepoLocator;
use crate::io::process::{ScriptExit, ScriptRunner};

/// Phase with the given commands.
pub fn phase(name: &str, commands: &[&str]) -> Phase {
    Phase::new(name, commands.iter().copied())
}

/// The configure/build/test project used across tests.
pub fn demo_project() -> ProjectConfig {
    ProjectConfig {
        phases: vec![
            phase("configure", &["echo configuring"]),
            phase("build", &["echo building"]),
            phase("test", &["echo testing"]),
        ],
    }
}

/// Global config holding a single project.
pub fn config_with(name: &str, project: ProjectConfig) -> Config {
    let mut cfg = Config::default();
    cfg.projects.insert(name.to_string(), project);
    cfg
}

/// Initialize an empty git repository in `dir`.
pub fn git_init(dir: &Path) {
    let status = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(dir)
        .status()
        .expect("spawn git init");
    assert!(status.success(), "git init failed in {}", dir.display());
}

/// Repo locator returning a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    pub root: Option<PathBuf>,
}

impl FixedLocator {
    pub fn at(root: &Path) -> Self {
        Self {
            root: Some(root.to_path_buf()),
        }
    }

    pub fn none() -> Self {
        Self { root: None }
    }
}

impl RepoLocator for FixedLocator {
    fn find_root(&self) -> Option<PathBuf> {
        self.root.clone()
    }
}

/// Editor that returns queued responses and records what it was shown.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    responses: RefCell<VecDeque<String>>,
    seen: RefCell<Vec<String>>,
}

impl ScriptedEditor {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Initial contents handed to the editor, one entry per session.
    pub fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, initial: &str) -> Result<String, BildError> {
        self.seen.borrow_mut().push(initial.to_string());
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| initial.to_string()))
    }
}

/// Script runner that records scripts and answers with queued exit codes.
///
/// Once the queue is empty every script succeeds.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    exits: RefCell<VecDeque<i32>>,
    scripts: RefCell<Vec<(String, PathBuf)>>,
}

impl RecordingRunner {
    pub fn new(exits: &[i32]) -> Self {
        Self {
            exits: RefCell::new(exits.iter().copied().collect()),
            scripts: RefCell::new(Vec::new()),
        }
    }

    /// Scripts run so far with their working directories.
    pub fn scripts(&self) -> Vec<(String, PathBuf)> {
        self.scripts.borrow().clone()
    }
}

impl ScriptRunner for RecordingRunner {
    fn run(&self, script: &str, workdir: &Path) -> std::io::Result<ScriptExit> {
        self.scripts
            .borrow_mut()
            .push((script.to_string(), workdir.to_path_buf()));
        let code = self.exits.borrow_mut().pop_front().unwrap_or(0);
        Ok(ScriptExit {
            success: code == 0,
            code: Some(code),
        })
    }
}

/// Presenter that records events instead of printing.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: RefCell<Vec<String>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn workdir(&self, root: Option<&Path>) {
        let event = match root {
            Some(root) => format!("workdir {}", root.display()),
            None => "workdir cwd".to_string(),
        };
        self.events.borrow_mut().push(event);
    }

    fn phase_started(&self, name: &str) {
        self.events.borrow_mut().push(format!("phase {name}"));
    }

    fn command(&self, command: &str) {
        self.events.borrow_mut().push(format!("$ {command}"));
    }
}
