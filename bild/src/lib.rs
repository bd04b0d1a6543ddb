//! Named phases of shell commands, per project.
//!
//! Projects live in a global JSON config (`~/.config/bild/bild.json`) or in a
//! `.bild.json` file at a repository root, which takes precedence. The crate is
//! split the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (types, the Markdown edit document,
//!   phase selection, script building). No I/O.
//! - **[`io`]**: Side-effecting operations (config files, git, editor, shell
//!   processes), each behind a trait where tests need a fake.
//!
//! Orchestration modules ([`run`], [`edit`], [`list`], [`dump`]) coordinate
//! core logic with I/O to implement CLI commands.

pub mod core;
pub mod dump;
pub mod edit;
pub mod error;
pub mod exit_codes;
pub mod highlight;
pub mod io;
pub mod list;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
