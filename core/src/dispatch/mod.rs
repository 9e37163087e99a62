//! Module dispatcher
//!
//! Delivers each event, in sequence order, to every registered module. The
//! dispatcher owns the analyzed player's identity (to derive relations) and
//! the failure ledger; it never looks at module state.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat_log::{CombatEvent, EventType};
use crate::cooldowns::ConfigError;
use crate::game_data::AbilityCatalog;
use crate::modules::{self, AnalysisModule, HandlerKey, ModuleError, ModuleResult, Relation};
use crate::summary::AnalysisResults;


/// What happens when a module handler returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Record the failure, stop feeding that module, keep replaying the rest
    #[default]
    Isolate,
    /// Stop the replay at the first failure
    FailFast,
}

/// A handler failure recorded against a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFailure {
    pub module: String,
    /// Sequence number of the event being handled (None for `on_finished`)
    pub sequence: Option<u64>,
    pub timestamp: i64,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("module `{module}` failed at {timestamp}ms: {source}")]
    Halted {
        module: &'static str,
        sequence: Option<u64>,
        timestamp: i64,
        source: ModuleError,
    },
}

/// The analyzed player and the pets known to belong to them.
#[derive(Debug, Clone, Default)]
pub struct Combatant {
    pub player_id: i64,
    pets: HashSet<i64>,
}

impl Combatant {
    pub fn new(player_id: i64) -> Self {
        Self {
            player_id,
            pets: HashSet::new(),
        }
    }

    pub fn with_pets(mut self, pets: impl IntoIterator<Item = i64>) -> Self {
        self.pets.extend(pets);
        self
    }

    pub fn add_pet(&mut self, pet_id: i64) -> bool {
        pet_id != self.player_id && self.pets.insert(pet_id)
    }

    pub fn is_pet(&self, id: i64) -> bool {
        self.pets.contains(&id)
    }

    pub fn relation_of(&self, event: &CombatEvent) -> Relation {
        if event.source_id == self.player_id {
            Relation::ByPlayer
        } else if event.source_is_pet && self.is_pet(event.source_id) {
            Relation::ByPlayerPet
        } else if event.target_id == self.player_id {
            Relation::ToPlayer
        } else if self.is_pet(event.target_id) {
            Relation::ToPlayerPet
        } else {
            Relation::Other
        }
    }
}

struct Registered {
    module: Box<dyn AnalysisModule + Send>,
    failed: bool,
}

pub struct Dispatcher {
    combatant: Combatant,
    catalog: AbilityCatalog,
    mode: DispatchMode,
    modules: Vec<Registered>,
    failures: Vec<ModuleFailure>,
    dispatched: u64,
}

impl Dispatcher {
    pub fn new(combatant: Combatant, catalog: AbilityCatalog, mode: DispatchMode) -> Self {
        Self {
            combatant,
            catalog,
            mode,
            modules: Vec::new(),
            failures: Vec::new(),
            dispatched: 0,
        }
    }

    /// Validate a module's configuration and add it to the active set.
    pub fn register(&mut self, module: Box<dyn AnalysisModule + Send>) -> Result<(), ConfigError> {
        module.validate(&self.catalog)?;
        tracing::debug!(module = module.name(), "Registered analysis module");
        self.modules.push(Registered {
            module,
            failed: false,
        });
        Ok(())
    }

    pub fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn failures(&self) -> &[ModuleFailure] {
        &self.failures
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn module_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|r| r.module.name())
    }

    /// Deliver one event to every healthy module.
    pub fn dispatch(&mut self, event: &CombatEvent) -> Result<(), DispatchError> {
        let relation = self.combatant.relation_of(event);

        // The summoned unit belongs to the player from this event on
        if relation == Relation::ByPlayer
            && event.event_type == EventType::Summon
            && self.combatant.add_pet(event.target_id)
        {
            tracing::debug!(pet_id = event.target_id, "Learned player pet from summon");
        }

        let key = HandlerKey::resolve(relation, event.event_type);
        self.dispatched += 1;

        for registered in self.modules.iter_mut().filter(|r| !r.failed) {
            let module = registered.module.as_mut();
            let outcome = module.on_event(event).and_then(|()| match key {
                Some(key) => modules::invoke(module, key, event),
                None => Ok(()),
            });
            handle_outcome(
                self.mode,
                &mut self.failures,
                registered,
                outcome,
                Some(event.sequence),
                event.timestamp,
            )?;
        }
        Ok(())
    }

    /// Tell every healthy module the replay is over.
    pub fn finish(&mut self, fight_end: i64) -> Result<(), DispatchError> {
        for registered in self.modules.iter_mut().filter(|r| !r.failed) {
            let outcome = registered.module.on_finished(fight_end);
            handle_outcome(self.mode, &mut self.failures, registered, outcome, None, fight_end)?;
        }
        Ok(())
    }

    /// Let every module that never failed contribute to the results.
    pub fn collect(&self, results: &mut AnalysisResults) {
        for registered in self.modules.iter().filter(|r| !r.failed) {
            registered.module.contribute(results);
        }
        results.failures.extend(self.failures.iter().cloned());
    }
}

fn handle_outcome(
    mode: DispatchMode,
    failures: &mut Vec<ModuleFailure>,
    registered: &mut Registered,
    outcome: ModuleResult,
    sequence: Option<u64>,
    timestamp: i64,
) -> Result<(), DispatchError> {
    let Err(error) = outcome else {
        return Ok(());
    };
    let module = registered.module.name();
    tracing::warn!(module, ?sequence, timestamp, %error, "Analysis module failed");

    registered.failed = true;
    failures.push(ModuleFailure {
        module: module.to_string(),
        sequence,
        timestamp,
        error: error.to_string(),
    });

    match mode {
        DispatchMode::Isolate => Ok(()),
        DispatchMode::FailFast => Err(DispatchError::Halted {
            module,
            sequence,
            timestamp,
            source: error,
        }),
    }
}
