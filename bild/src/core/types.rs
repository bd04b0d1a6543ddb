//! Configuration data model shared by every bild command.
//!
//! Phase order and command order are execution order, so every collection
//! here that carries behavior is a `Vec`. Projects are keyed in a `BTreeMap`
//! to keep listings and saved files stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A named, ordered group of shell command lines run as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<String>,
}

impl Phase {
    pub fn new<I, S>(name: impl Into<String>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub phases: Vec<Phase>,
}

impl ProjectConfig {
    /// First phase whose name matches exactly (case-sensitive).
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.name == name)
    }

    pub fn phase_mut(&mut self, name: &str) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|phase| phase.name == name)
    }
}

/// Global configuration: every registered project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// Explicit `null` decodes like a missing field. Older config writers emit
/// `"phases": null` and `"commands": null` for empty lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Project-root override holding exactly one project.
///
/// On disk this is a bare `{ "<name>": { "phases": [...] } }` object, without
/// the `projects` wrapper used by [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub project: String,
    pub config: ProjectConfig,
}

impl LocalConfig {
    pub fn new(project: impl Into<String>, config: ProjectConfig) -> Self {
        Self {
            project: project.into(),
            config,
        }
    }

    /// On-disk representation: a single-entry map.
    pub fn to_entries(&self) -> BTreeMap<&str, &ProjectConfig> {
        BTreeMap::from([(self.project.as_str(), &self.config)])
    }

    /// Build from a decoded map; `None` unless it has exactly one entry.
    pub fn from_entries(entries: BTreeMap<String, ProjectConfig>) -> Option<Self> {
        if entries.len() != 1 {
            return None;
        }
        entries
            .into_iter()
            .next()
            .map(|(project, config)| Self { project, config })
    }
}
