//! Global (`~/.config/bild/bild.json`) and local (`.bild.json`) config stores.
//!
//! Both files are JSON. They are checked against embedded JSON Schemas before
//! typed decoding so shape errors name the file and the offending value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::types::{Config, LocalConfig, ProjectConfig};
use crate::error::BildError;
use crate::io::context::{ConfigContext, local_config_path};

const CONFIG_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/config.schema.json"
));
const LOCAL_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/local.schema.json"
));

static CONFIG_VALIDATOR: LazyLock<Validator> =
    LazyLock::new(|| compile_schema(CONFIG_SCHEMA, "config"));
static LOCAL_VALIDATOR: LazyLock<Validator> =
    LazyLock::new(|| compile_schema(LOCAL_SCHEMA, "local config"));

fn compile_schema(raw: &str, label: &str) -> Validator {
    let value: Value = serde_json::from_str(raw)
        .unwrap_or_else(|err| panic!("embedded {label} schema should be json: {err}"));
    jsonschema::validator_for(&value)
        .unwrap_or_else(|err| panic!("embedded {label} schema should be valid: {err}"))
}

/// Load the global config.
///
/// A missing file yields an empty config.
#[instrument(skip_all, fields(path = %ctx.config_path().display()))]
pub fn load_config(ctx: &ConfigContext) -> Result<Config, BildError> {
    let path = ctx.config_path();
    if !path.exists() {
        debug!("config file missing, starting empty");
        return Ok(Config::default());
    }
    let value = read_json(path)?;
    validate(&CONFIG_VALIDATOR, path, &value)?;
    let cfg: Config = decode(path, value)?;
    debug!(projects = cfg.projects.len(), "config loaded");
    Ok(cfg)
}

/// Write the global config (temp file + rename).
#[instrument(skip_all, fields(path = %ctx.config_path().display()))]
pub fn save_config(ctx: &ConfigContext, cfg: &Config) -> Result<(), BildError> {
    write_json(ctx.config_path(), cfg)?;
    debug!(projects = cfg.projects.len(), "config saved");
    Ok(())
}

/// Load `.bild.json` from `dir`, if present.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_local_config(dir: &Path) -> Result<Option<LocalConfig>, BildError> {
    let path = local_config_path(dir);
    if !path.exists() {
        debug!("no local config");
        return Ok(None);
    }
    let value = read_json(&path)?;
    validate(&LOCAL_VALIDATOR, &path, &value)?;
    let entries: BTreeMap<String, ProjectConfig> = decode(&path, value)?;
    let local = LocalConfig::from_entries(entries).ok_or_else(|| BildError::ConfigInvalid {
        path: path.clone(),
        messages: vec!["local config must contain exactly one project".to_string()],
    })?;
    debug!(project = %local.project, "local config loaded");
    Ok(Some(local))
}

/// Write `.bild.json` into `dir` holding only `project`.
#[instrument(skip_all, fields(dir = %dir.display(), project = project_name))]
pub fn save_local_config(
    dir: &Path,
    project_name: &str,
    project: &ProjectConfig,
) -> Result<PathBuf, BildError> {
    let path = local_config_path(dir);
    let local = LocalConfig::new(project_name, project.clone());
    write_json(&path, &local.to_entries())?;
    Ok(path)
}

fn read_json(path: &Path) -> Result<Value, BildError> {
    let contents = fs::read_to_string(path).map_err(|source| BildError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| BildError::ConfigDecode {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(validator: &Validator, path: &Path, value: &Value) -> Result<(), BildError> {
    let messages: Vec<String> = validator
        .iter_errors(value)
        .map(|err| err.to_string())
        .collect();
    if messages.is_empty() {
        return Ok(());
    }
    Err(BildError::ConfigInvalid {
        path: path.to_path_buf(),
        messages,
    })
}

fn decode<T: serde::de::DeserializeOwned>(path: &Path, value: Value) -> Result<T, BildError> {
    serde_json::from_value(value).map_err(|source| BildError::ConfigDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` to pretty-printed JSON with trailing newline and
/// atomically replace `path`.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BildError> {
    let mut payload =
        serde_json::to_string_pretty(value).map_err(|source| BildError::ConfigEncode {
            path: path.to_path_buf(),
            source,
        })?;
    payload.push('\n');
    write_atomic(path, &payload).map_err(|source| BildError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` via a sibling temp file. An existing symlink is followed,
/// so the link stays in place and its target gets the new contents.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let target = if path.exists() {
        fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = target.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = target.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, &target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_with, demo_project};

    #[test]
    fn load_missing_returns_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ctx = ConfigContext::new(temp.path().join("missing.json"));
        assert_eq!(load_config(&ctx).expect("load"), Config::default());
    }

    #[test]
    fn save_then_load_round_trips_and_creates_parent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ctx = ConfigContext::new(temp.path().join("nested/dir/bild.json"));
        let cfg = config_with("demo", demo_project());
        save_config(&ctx, &cfg).expect("save");
        assert_eq!(load_config(&ctx).expect("load"), cfg);

        let raw = fs::read_to_string(ctx.config_path()).expect("read");
        assert!(raw.ends_with('\n'));
        assert!(!temp.path().join("nested/dir/bild.json.tmp").exists());
    }

    #[test]
    fn saved_global_file_uses_projects_wrapper() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ctx = ConfigContext::new(temp.path().join("bild.json"));
        save_config(&ctx, &config_with("demo", demo_project())).expect("save");
        let value: Value =
            serde_json::from_str(&fs::read_to_string(ctx.config_path()).expect("read"))
                .expect("json");
        assert_eq!(
            value["projects"]["demo"]["phases"][1]["commands"][0],
            "echo building"
        );
    }

    #[test]
    fn load_rejects_malformed_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bild.json");
        fs::write(&path, "{ not json").expect("write");
        let err = load_config(&ConfigContext::new(&path)).unwrap_err();
        assert!(matches!(err, BildError::ConfigDecode { .. }));
        assert!(err.to_string().contains("bild.json"));
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bild.json");
        fs::write(&path, r#"{"projects":{"demo":{"phases":[{"commands":["x"]}]}}}"#)
            .expect("write");
        let err = load_config(&ConfigContext::new(&path)).unwrap_err();
        assert!(matches!(err, BildError::ConfigInvalid { .. }), "{err}");
    }

    #[test]
    fn local_absent_is_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_local_config(temp.path()).expect("load"), None);
    }

    #[test]
    fn local_save_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = save_local_config(temp.path(), "demo", &demo_project()).expect("save");
        assert_eq!(path, temp.path().join(".bild.json"));

        let local = load_local_config(temp.path())
            .expect("load")
            .expect("present");
        assert_eq!(local, LocalConfig::new("demo", demo_project()));
    }

    #[test]
    fn local_file_has_no_projects_wrapper() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = save_local_config(temp.path(), "demo", &demo_project()).expect("save");
        let value: Value =
            serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json");
        let keys: Vec<&String> = value.as_object().expect("object").keys().collect();
        assert_eq!(keys, vec!["demo"]);
    }

    #[test]
    fn local_with_several_projects_is_invalid() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(".bild.json"),
            r#"{"a":{"phases":[]},"b":{"phases":[]}}"#,
        )
        .expect("write");
        let err = load_local_config(temp.path()).unwrap_err();
        assert!(matches!(err, BildError::ConfigInvalid { .. }));
    }

    #[test]
    fn local_in_global_shape_is_invalid() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(".bild.json"),
            r#"{"projects":{"demo":{"phases":[]}}}"#,
        )
        .expect("write");
        let err = load_local_config(temp.path()).unwrap_err();
        assert!(matches!(err, BildError::ConfigInvalid { .. }), "{err}");
    }

    #[test]
    fn global_null_lists_load_as_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bild.json");
        fs::write(
            &path,
            r#"{"projects":{"a":{"phases":null},"b":{"phases":[{"name":"x","commands":null}]}}}"#,
        )
        .expect("write");
        let cfg = load_config(&ConfigContext::new(&path)).expect("load");
        assert!(cfg.projects["a"].phases.is_empty());
        assert_eq!(cfg.projects["b"].phases[0].name, "x");
        assert!(cfg.projects["b"].phases[0].commands.is_empty());
    }

    #[test]
    fn local_null_lists_load_as_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(".bild.json"),
            r#"{"a":{"phases":[{"name":"x","commands":null}]}}"#,
        )
        .expect("write");
        let local = load_local_config(temp.path())
            .expect("load")
            .expect("present");
        assert_eq!(local.project, "a");
        assert!(local.config.phases[0].commands.is_empty());

        fs::write(temp.path().join(".bild.json"), r#"{"a":{"phases":null}}"#).expect("write");
        let local = load_local_config(temp.path())
            .expect("load")
            .expect("present");
        assert!(local.config.phases.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn save_through_symlink_keeps_link() {
        let temp = tempfile::tempdir().expect("tempdir");
        let real = temp.path().join("dotfiles/bild.json");
        fs::create_dir_all(real.parent().expect("parent")).expect("mkdir");
        fs::write(&real, "{}\n").expect("write");
        let link = temp.path().join("bild.json");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        let ctx = ConfigContext::new(&link);
        let cfg = config_with("demo", demo_project());
        save_config(&ctx, &cfg).expect("save");

        assert!(
            fs::symlink_metadata(&link)
                .expect("link metadata")
                .file_type()
                .is_symlink()
        );
        assert_eq!(load_config(&ConfigContext::new(&real)).expect("load"), cfg);
    }
}
