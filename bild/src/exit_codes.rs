//! Stable exit codes for bild CLI commands.

use crate::error::{BildError, ErrorKind};

/// Command succeeded.
pub const OK: i32 = 0;
/// A phase script failed, or an error without a more specific class.
pub const FAILURE: i32 = 1;
/// Configuration file could not be read, written or decoded.
pub const CONFIG: i32 = 2;
/// Project, phase or repository could not be resolved.
pub const RESOLUTION: i32 = 3;
/// The external editor could not be used.
pub const EDITOR: i32 = 4;

/// Map a top-level error to the process exit status.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BildError>().map(BildError::kind) {
        Some(ErrorKind::Config) => CONFIG,
        Some(ErrorKind::Resolution) => RESOLUTION,
        Some(ErrorKind::Editor) => EDITOR,
        Some(ErrorKind::Execution) | None => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn maps_typed_errors_through_context() {
        let err = Err::<(), _>(BildError::ProjectNotFound {
            project: "demo".to_string(),
        })
        .context("run project")
        .unwrap_err();
        assert_eq!(for_error(&err), RESOLUTION);
    }

    #[test]
    fn untyped_errors_use_generic_failure() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(for_error(&err), FAILURE);
    }
}
