//! Configuration errors and TOML loading for cooldown definitions
//!
//! Definition files let users track cooldowns the built-in specializations
//! don't know about. A file may also name abilities the built-in catalog
//! lacks so their definitions pass validation:
//!
//! ```toml
//! [[ability]]
//! id = 900001
//! name = "Custom Trinket"
//!
//! [[cooldown]]
//! ability_id = 900001
//! duration_ms = 20000
//! summary = ["damage"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use throughput_types::WindowTrigger;

use super::CooldownSpellDefinition;
use crate::game_data::AbilityCatalog;

/// Errors surfaced while building or registering a cooldown configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cooldown definition references unknown ability {ability_id}")]
    UnknownAbility { ability_id: u64 },

    #[error("ability {ability_id} has more than one cooldown definition")]
    DuplicateDefinition { ability_id: u64 },

    #[error("granted cooldown {ability_id} needs a fixed duration")]
    MissingDuration { ability_id: u64 },

    #[error("cooldown {ability_id} has an out-of-range duration ({duration_ms}ms)")]
    InvalidDuration { ability_id: u64, duration_ms: i64 },

    #[error("cooldown {ability_id} uses the `{}` trigger, which this tracker doesn't handle", .trigger.as_str())]
    UnsupportedTrigger {
        ability_id: u64,
        trigger: WindowTrigger,
    },

    #[error("unknown spec `{0}`")]
    UnknownSpec(String),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub id: u64,
    pub name: String,
}

/// Contents of one definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default, rename = "ability", skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<AbilityEntry>,

    #[serde(default, rename = "cooldown")]
    pub cooldowns: Vec<CooldownSpellDefinition>,
}

impl DefinitionFile {
    /// Make the file's abilities known to `catalog`.
    pub fn register_abilities(&self, catalog: &mut AbilityCatalog) {
        for ability in &self.abilities {
            catalog.register(ability.id, ability.name.clone());
        }
    }
}

pub fn parse_definitions(contents: &str, path: &Path) -> Result<DefinitionFile, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a single TOML definition file.
pub fn load_definition_file(path: &Path) -> Result<DefinitionFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file = parse_definitions(&contents, path)?;
    tracing::debug!(
        path = ?path,
        abilities = file.abilities.len(),
        cooldowns = file.cooldowns.len(),
        "Loaded cooldown definitions"
    );
    Ok(file)
}

/// Load and concatenate several definition files, in order.
pub fn load_definition_files(paths: &[PathBuf]) -> Result<DefinitionFile, ConfigError> {
    let mut merged = DefinitionFile::default();
    for path in paths {
        let file = load_definition_file(path)?;
        merged.abilities.extend(file.abilities);
        merged.cooldowns.extend(file.cooldowns);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use throughput_types::SummaryKind;

    #[test]
    fn test_parse_definition_toml() {
        let toml = r#"
[[ability]]
id = 900001
name = "Custom Trinket"

[[cooldown]]
ability_id = 900001
duration_ms = 20000
summary = ["damage", "healing"]

[[cooldown]]
ability_id = 196098
trigger = "buff"
"#;

        let file = parse_definitions(toml, Path::new("test.toml")).unwrap();
        assert_eq!(file.abilities.len(), 1);
        assert_eq!(file.cooldowns.len(), 2);

        let trinket = &file.cooldowns[0];
        assert_eq!(trinket.ability_id, 900001);
        assert_eq!(trinket.duration_ms, Some(20000));
        assert_eq!(trinket.trigger, WindowTrigger::Cast);
        assert_eq!(trinket.summary, vec![SummaryKind::Damage, SummaryKind::Healing]);
        assert!(!trinket.allow_overlap);

        let buff = &file.cooldowns[1];
        assert_eq!(buff.trigger, WindowTrigger::Buff);
        assert_eq!(buff.duration_ms, None);
        assert_eq!(buff.summary, vec![SummaryKind::Damage]);
    }

    #[test]
    fn test_register_abilities_extends_catalog() {
        let file = DefinitionFile {
            abilities: vec![AbilityEntry {
                id: 900001,
                name: "Custom Trinket".to_string(),
            }],
            cooldowns: vec![],
        };
        let mut catalog = AbilityCatalog::empty();
        file.register_abilities(&mut catalog);
        assert_eq!(catalog.name(900001), Some("Custom Trinket"));
    }

    #[test]
    fn test_oversized_duration_fails_validation() {
        let toml = "[[cooldown]]\nability_id = 26297\nduration_ms = 9223372036854775807\n";
        let file = parse_definitions(toml, Path::new("huge.toml")).unwrap();
        assert!(matches!(
            file.cooldowns[0].validate(&AbilityCatalog::builtin()),
            Err(ConfigError::InvalidDuration { ability_id: 26297, .. })
        ));
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let err = parse_definitions("[[cooldown]]\nability_id = \"x\"", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == Path::new("bad.toml")));
    }
}
