//! Deterministic, pure logic shared by bild commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod document;
pub mod phase_text;
pub mod script;
pub mod selector;
pub mod types;
