//! Cooldown definitions and the registry a tracker is built from.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use throughput_types::{SummaryKind, WindowTrigger};

use super::ConfigError;
use crate::game_data::{AbilityCatalog, SPELL_NAMES};

/// Longest accepted window; no recorded fight comes close to a day.
pub const MAX_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

fn default_summary() -> Vec<SummaryKind> {
    vec![SummaryKind::Damage]
}

/// One ability whose usage windows are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownSpellDefinition {
    pub ability_id: u64,

    /// Display name (None = catalog name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Window length; None means the window stays open until something closes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,

    /// Quantities added up for each window
    #[serde(default = "default_summary")]
    pub summary: Vec<SummaryKind>,

    #[serde(default)]
    pub trigger: WindowTrigger,

    /// Allow a new use to open a window while the previous one is still open
    #[serde(default)]
    pub allow_overlap: bool,
}

impl CooldownSpellDefinition {
    pub fn cast(ability_id: u64, duration_ms: Option<i64>, summary: &[SummaryKind]) -> Self {
        Self {
            ability_id,
            name: None,
            duration_ms,
            summary: summary.to_vec(),
            trigger: WindowTrigger::Cast,
            allow_overlap: false,
        }
    }

    pub fn buff(ability_id: u64, summary: &[SummaryKind]) -> Self {
        Self {
            trigger: WindowTrigger::Buff,
            ..Self::cast(ability_id, None, summary)
        }
    }

    pub fn granted(ability_id: u64, duration_ms: i64, summary: &[SummaryKind]) -> Self {
        Self {
            trigger: WindowTrigger::Granted,
            ..Self::cast(ability_id, Some(duration_ms), summary)
        }
    }

    pub fn overlapping(mut self) -> Self {
        self.allow_overlap = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> String {
        match (&self.name, SPELL_NAMES.get(&self.ability_id)) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => (*name).to_string(),
            (None, None) => format!("Ability {}", self.ability_id),
        }
    }

    pub fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        let ability_id = self.ability_id;
        if !catalog.contains(ability_id) {
            return Err(ConfigError::UnknownAbility { ability_id });
        }
        match self.duration_ms {
            Some(duration_ms) if duration_ms <= 0 || duration_ms > MAX_DURATION_MS => {
                Err(ConfigError::InvalidDuration { ability_id, duration_ms })
            }
            None if self.trigger == WindowTrigger::Granted => {
                Err(ConfigError::MissingDuration { ability_id })
            }
            _ => Ok(()),
        }
    }
}

/// Ordered set of cooldown definitions, at most one per ability.
///
/// Specializations compose a registry from a shared base list plus their own
/// entries; the same ability appearing twice is rejected instead of one
/// definition silently winning.
#[derive(Debug, Clone, Default)]
pub struct CooldownRegistry {
    definitions: Vec<Arc<CooldownSpellDefinition>>,
    by_ability: HashMap<u64, usize>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CooldownSpellDefinition>,
    ) -> Result<Self, ConfigError> {
        Self::new().with(definitions)
    }

    /// Append definitions, rejecting any ability that is already present.
    pub fn with(
        mut self,
        definitions: impl IntoIterator<Item = CooldownSpellDefinition>,
    ) -> Result<Self, ConfigError> {
        for def in definitions {
            self.insert(def)?;
        }
        Ok(self)
    }

    pub fn insert(&mut self, def: CooldownSpellDefinition) -> Result<(), ConfigError> {
        let ability_id = def.ability_id;
        if self.by_ability.contains_key(&ability_id) {
            return Err(ConfigError::DuplicateDefinition { ability_id });
        }
        self.by_ability.insert(ability_id, self.definitions.len());
        self.definitions.push(Arc::new(def));
        Ok(())
    }

    pub fn get(&self, ability_id: u64) -> Option<&Arc<CooldownSpellDefinition>> {
        self.by_ability.get(&ability_id).map(|&idx| &self.definitions[idx])
    }

    /// Definition for `ability_id` if it opens on the given trigger.
    pub fn get_triggered(
        &self,
        ability_id: u64,
        trigger: WindowTrigger,
    ) -> Option<&Arc<CooldownSpellDefinition>> {
        self.get(ability_id).filter(|def| def.trigger == trigger)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CooldownSpellDefinition>> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Reject definitions whose trigger the owning tracker never acts on.
    pub fn check_triggers(&self, supported: &[WindowTrigger]) -> Result<(), ConfigError> {
        match self.definitions.iter().find(|def| !supported.contains(&def.trigger)) {
            Some(def) => Err(ConfigError::UnsupportedTrigger {
                ability_id: def.ability_id,
                trigger: def.trigger,
            }),
            None => Ok(()),
        }
    }

    /// Check every definition against the ability catalog.
    pub fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        self.definitions.iter().try_for_each(|def| def.validate(catalog))
    }
}
