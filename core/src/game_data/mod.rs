//! Static game data: the ability catalog and the ids the built-in cooldown
//! definitions refer to.

mod spell_ids;

pub use spell_ids::*;

use hashbrown::HashMap;

include!(concat!(env!("OUT_DIR"), "/spell_catalog.rs"));

/// Known ability ids, used to validate cooldown definitions before a replay.
///
/// Built from the generated `SPELL_NAMES` table plus any abilities registered
/// at runtime (user definition files naming spells the table doesn't carry).
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    include_builtin: bool,
    extra: HashMap<u64, String>,
}

impl AbilityCatalog {
    /// Catalog backed by the generated spell table.
    pub fn builtin() -> Self {
        Self {
            include_builtin: true,
            extra: HashMap::new(),
        }
    }

    /// Catalog with no abilities at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_ability(mut self, id: u64, name: impl Into<String>) -> Self {
        self.register(id, name);
        self
    }

    pub fn register(&mut self, id: u64, name: impl Into<String>) {
        self.extra.insert(id, name.into());
    }

    pub fn contains(&self, id: u64) -> bool {
        self.extra.contains_key(&id) || (self.include_builtin && SPELL_NAMES.contains_key(&id))
    }

    pub fn name(&self, id: u64) -> Option<&str> {
        if let Some(name) = self.extra.get(&id) {
            return Some(name.as_str());
        }
        if self.include_builtin {
            return SPELL_NAMES.get(&id).copied();
        }
        None
    }
}
