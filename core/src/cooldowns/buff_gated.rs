use throughput_types::WindowTrigger;

use super::{ConfigError, CooldownRegistry, CooldownTracker};
use crate::combat_log::CombatEvent;
use crate::game_data::AbilityCatalog;
use crate::modules::{AnalysisModule, ModuleResult};
use crate::summary::AnalysisResults;

/// Cooldown tracker that also follows the player's buffs.
///
/// `buff` definitions open when the player gains the buff and close when it
/// drops; everything else behaves like [`CooldownTracker`].
#[derive(Debug, Clone)]
pub struct BuffGatedTracker {
    tracker: CooldownTracker,
}

impl BuffGatedTracker {
    pub fn new(registry: CooldownRegistry) -> Self {
        Self {
            tracker: CooldownTracker::new(registry),
        }
    }

    pub fn tracker(&self) -> &CooldownTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut CooldownTracker {
        &mut self.tracker
    }

    fn check(&self, catalog: &AbilityCatalog, supported: &[WindowTrigger]) -> Result<(), ConfigError> {
        self.tracker.registry().validate(catalog)?;
        self.tracker.registry().check_triggers(supported)
    }
}

impl AnalysisModule for BuffGatedTracker {
    fn name(&self) -> &'static str {
        "buff_gated_cooldowns"
    }

    fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        self.check(catalog, &[WindowTrigger::Cast, WindowTrigger::Buff])
    }

    fn on_cast_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.on_cast_by_player(event)
    }

    fn on_apply_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker
            .open_triggered(event.ability.id, WindowTrigger::Buff, event.timestamp)
            .map(|_| ())
    }

    fn on_remove_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        let ability_id = event.ability.id;
        if self
            .tracker
            .registry()
            .get_triggered(ability_id, WindowTrigger::Buff)
            .is_none()
        {
            return Ok(());
        }
        self.tracker.force_close(ability_id, event.timestamp).map(|_| ())
    }

    fn on_damage_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.track_event(event)
    }

    fn on_damage_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.track_event(event)
    }

    fn on_heal_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.track_event(event)
    }

    fn on_heal_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.track_event(event)
    }

    fn on_absorbed_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.tracker.track_event(event)
    }

    fn on_finished(&mut self, fight_end: i64) -> ModuleResult {
        self.tracker.on_finished(fight_end)
    }

    fn contribute(&self, results: &mut AnalysisResults) {
        self.tracker.contribute(results);
    }
}

/// Affliction Warlock cooldowns.
///
/// Infernals and Doomguards are summoned pets whose damage counts towards a
/// fixed window from the moment they arrive, so their `granted` definitions
/// open on the player's summon event rather than on a cast.
#[derive(Debug, Clone)]
pub struct AfflictionCooldownTracker {
    inner: BuffGatedTracker,
}

impl AfflictionCooldownTracker {
    pub fn new(registry: CooldownRegistry) -> Self {
        Self {
            inner: BuffGatedTracker::new(registry),
        }
    }

    pub fn tracker(&self) -> &CooldownTracker {
        self.inner.tracker()
    }
}

impl AnalysisModule for AfflictionCooldownTracker {
    fn name(&self) -> &'static str {
        "affliction_cooldowns"
    }

    fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        self.inner.check(
            catalog,
            &[WindowTrigger::Cast, WindowTrigger::Buff, WindowTrigger::Granted],
        )
    }

    fn on_cast_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_cast_by_player(event)
    }

    fn on_summon_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        let ability_id = event.ability.id;
        let tracker = self.inner.tracker_mut();
        if tracker
            .registry()
            .get_triggered(ability_id, WindowTrigger::Granted)
            .is_none()
        {
            return Ok(());
        }
        tracker.grant(ability_id, event.timestamp)
    }

    fn on_apply_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_apply_buff_by_player(event)
    }

    fn on_remove_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_remove_buff_by_player(event)
    }

    fn on_damage_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_damage_by_player(event)
    }

    fn on_damage_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_damage_by_player_pet(event)
    }

    fn on_heal_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_heal_by_player(event)
    }

    fn on_heal_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_heal_by_player_pet(event)
    }

    fn on_absorbed_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.inner.on_absorbed_by_player(event)
    }

    fn on_finished(&mut self, fight_end: i64) -> ModuleResult {
        self.inner.on_finished(fight_end)
    }

    fn contribute(&self, results: &mut AnalysisResults) {
        self.inner.contribute(results);
    }
}
