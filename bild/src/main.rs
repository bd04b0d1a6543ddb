//! `bild`: run, edit, list and dump per-project build phases.

use std::env;

use anyhow::{Context, Result};
use bild::dump::dump_project;
use bild::edit::{PhaseEdit, edit_phase, edit_project};
use bild::exit_codes;
use bild::highlight::TerminalPresenter;
use bild::io::config::load_config;
use bild::io::context::ConfigContext;
use bild::io::editor::ExternalEditor;
use bild::io::git::Git;
use bild::io::process::ShellRunner;
use bild::list::render_listing;
use bild::logging;
use bild::run::{RunRequest, run_project};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bild",
    version,
    about = "Run named build phases for the current project",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Global config file [default: ~/.config/bild/bild.json].
    #[arg(long, global = true)]
    config: Option<String>,

    /// Project to run (defaults to the repository directory name).
    project: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run all phases of a project, or a single phase.
    Run {
        project: Option<String>,
        phase: Option<String>,
    },
    /// Edit a project's phases in $EDITOR, or a single phase's commands.
    Edit {
        project: String,
        phase: Option<String>,
    },
    /// List all registered projects and their phases.
    List,
    /// Write a project's config to `.bild.json` at the repository root.
    Dump { project: String },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = ConfigContext::from_flag(cli.config.as_deref())?;
    match cli.command {
        None => cmd_run(&ctx, cli.project.as_deref(), None),
        Some(Command::Run { project, phase }) => {
            cmd_run(&ctx, project.as_deref(), phase.as_deref())
        }
        Some(Command::Edit { project, phase }) => cmd_edit(&ctx, &project, phase.as_deref()),
        Some(Command::List) => cmd_list(&ctx),
        Some(Command::Dump { project }) => cmd_dump(&ctx, &project),
    }
}

fn cmd_run(ctx: &ConfigContext, project: Option<&str>, phase: Option<&str>) -> Result<()> {
    let cwd = env::current_dir().context("read current directory")?;
    let locator = Git::new(&cwd);
    run_project(
        ctx,
        &cwd,
        &locator,
        &ShellRunner,
        &TerminalPresenter,
        RunRequest { project, phase },
    )?;
    Ok(())
}

fn cmd_edit(ctx: &ConfigContext, project: &str, phase: Option<&str>) -> Result<()> {
    let editor = ExternalEditor::from_env();
    let Some(phase) = phase else {
        let edit = edit_project(ctx, project, &editor)?;
        println!(
            "Project {} updated with {} phase(s).",
            edit.project,
            edit.phases.len()
        );
        for (name, count) in &edit.phases {
            println!("  Phase {name}: {count} command(s)");
        }
        return Ok(());
    };

    match edit_phase(ctx, project, phase, &editor)? {
        PhaseEdit::Updated(count) => {
            println!("Project {project}, phase {phase} updated with {count} command(s).");
        }
        PhaseEdit::Removed => {
            println!("Project {project}, phase {phase} removed (no commands left).");
        }
    }
    Ok(())
}

fn cmd_list(ctx: &ConfigContext) -> Result<()> {
    let cfg = load_config(ctx)?;
    print!("{}", render_listing(&cfg));
    Ok(())
}

fn cmd_dump(ctx: &ConfigContext, project: &str) -> Result<()> {
    let cwd = env::current_dir().context("read current directory")?;
    let path = dump_project(ctx, &Git::new(cwd), project)?;
    println!(
        "Successfully dumped configuration for project '{project}' to {}",
        path.display()
    );
    Ok(())
}
