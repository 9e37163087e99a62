//! Cooldown window tracker
//!
//! Opens a window for every use of a tracked ability and attributes the
//! player's (and their pets') damage and healing to the windows still open.
//! Windows close lazily: an expired window is moved to history when the next
//! trackable event shows replay time has reached its end.

use std::sync::Arc;

use throughput_types::WindowTrigger;

use super::{CooldownRegistry, CooldownSpellDefinition, CooldownWindow, ConfigError};
use crate::combat_log::CombatEvent;
use crate::game_data::AbilityCatalog;
use crate::modules::{AnalysisModule, ModuleError, ModuleResult};
use crate::summary::{AnalysisResults, build_reports};

#[derive(Debug, Clone)]
pub struct CooldownTracker {
    registry: CooldownRegistry,

    /// Open windows, in the order they were opened
    active: Vec<CooldownWindow>,

    /// Closed windows, in the order they were closed
    history: Vec<CooldownWindow>,

    /// Latest replay timestamp seen by this tracker
    last_timestamp: Option<i64>,
}

impl CooldownTracker {
    pub fn new(registry: CooldownRegistry) -> Self {
        Self {
            registry,
            active: Vec::new(),
            history: Vec::new(),
            last_timestamp: None,
        }
    }

    pub fn registry(&self) -> &CooldownRegistry {
        &self.registry
    }

    pub fn active_windows(&self) -> &[CooldownWindow] {
        &self.active
    }

    pub fn history(&self) -> &[CooldownWindow] {
        &self.history
    }

    /// Windows of one ability that have already closed.
    pub fn history_for(&self, ability_id: u64) -> impl Iterator<Item = &CooldownWindow> {
        self.history.iter().filter(move |w| w.ability_id() == ability_id)
    }

    fn advance_to(&mut self, timestamp: i64) -> ModuleResult {
        if let Some(last_seen) = self.last_timestamp
            && timestamp < last_seen
        {
            return Err(ModuleError::TimeWentBackwards { timestamp, last_seen });
        }
        self.last_timestamp = Some(timestamp);
        Ok(())
    }

    /// Open a window for `def` at `timestamp`.
    ///
    /// Unless the ability allows overlapping uses, any window of the same
    /// ability that is still open ends here.
    fn open(&mut self, def: Arc<CooldownSpellDefinition>, timestamp: i64) -> ModuleResult {
        self.advance_to(timestamp)?;

        if !def.allow_overlap {
            self.close_where(timestamp, |w| w.ability_id() == def.ability_id);
        }

        let window = CooldownWindow::open(def, timestamp);
        tracing::debug!(
            ability_id = window.ability_id(),
            start = window.start,
            end = ?window.end,
            "Cooldown window opened"
        );
        self.active.push(window);
        Ok(())
    }

    /// Open a window for a definition of the given trigger kind.
    ///
    /// Returns `Ok(false)` if the ability isn't tracked with that trigger.
    pub fn open_triggered(
        &mut self,
        ability_id: u64,
        trigger: WindowTrigger,
        timestamp: i64,
    ) -> Result<bool, ModuleError> {
        let Some(def) = self.registry.get_triggered(ability_id, trigger).cloned() else {
            return Ok(false);
        };
        self.open(def, timestamp)?;
        Ok(true)
    }

    /// Explicitly open a fixed-duration window not tied to a cast.
    pub fn grant(&mut self, ability_id: u64, timestamp: i64) -> ModuleResult {
        let def = self
            .registry
            .get(ability_id)
            .cloned()
            .ok_or(ModuleError::UnknownCooldown { ability_id })?;
        if def.trigger != WindowTrigger::Granted {
            return Err(ModuleError::RejectedWindow {
                ability_id,
                action: "granted",
                reason: "definition is not a granted cooldown",
            });
        }
        self.open(def, timestamp)
    }

    /// Close every open window of `ability_id` at `timestamp`.
    ///
    /// Returns how many windows were closed.
    pub fn force_close(&mut self, ability_id: u64, timestamp: i64) -> Result<usize, ModuleError> {
        self.advance_to(timestamp)?;
        Ok(self.close_where(timestamp, |w| w.ability_id() == ability_id))
    }

    /// Close everything still open, e.g. when the fight ends.
    pub fn close_all(&mut self, timestamp: i64) -> Result<usize, ModuleError> {
        self.advance_to(timestamp)?;
        Ok(self.close_where(timestamp, |_| true))
    }

    /// Evict expired windows, then attribute `event` to every open window.
    ///
    /// Events that carry no throughput (casts, buffs, energizes) are ignored.
    pub fn track_event(&mut self, event: &CombatEvent) -> ModuleResult {
        if !event.event_type.is_trackable() {
            return Ok(());
        }
        let timestamp = event.timestamp;
        self.advance_to(timestamp)?;
        self.close_where(timestamp, |w| w.has_expired(timestamp));

        for window in self.active.iter_mut().filter(|w| w.covers(timestamp)) {
            window.attribute(event);
        }
        Ok(())
    }

    fn close_where(&mut self, timestamp: i64, should_close: impl Fn(&CooldownWindow) -> bool) -> usize {
        let before = self.history.len();
        let (closing, still_open): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(|w| should_close(w));
        self.active = still_open;

        for window in closing {
            let window = window.close(timestamp);
            tracing::debug!(
                ability_id = window.ability_id(),
                start = window.start,
                end = ?window.end,
                events = window.events.len(),
                "Cooldown window closed"
            );
            self.history.push(window);
        }
        self.history.len() - before
    }
}

impl AnalysisModule for CooldownTracker {
    fn name(&self) -> &'static str {
        "cooldowns"
    }

    fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        self.registry.validate(catalog)?;
        self.registry.check_triggers(&[WindowTrigger::Cast])
    }

    fn on_cast_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.open_triggered(event.ability.id, WindowTrigger::Cast, event.timestamp)
            .map(|_| ())
    }

    fn on_damage_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.track_event(event)
    }

    fn on_damage_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.track_event(event)
    }

    fn on_heal_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.track_event(event)
    }

    fn on_heal_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        self.track_event(event)
    }

    fn on_absorbed_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        self.track_event(event)
    }

    fn on_finished(&mut self, fight_end: i64) -> ModuleResult {
        self.close_all(fight_end).map(|_| ())
    }

    fn contribute(&self, results: &mut AnalysisResults) {
        results
            .cooldowns
            .extend(build_reports(&self.registry, &self.history));
    }
}
