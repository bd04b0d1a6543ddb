//! I/O adapters for bild commands.

pub mod config;
pub mod context;
pub mod editor;
pub mod git;
pub mod process;
