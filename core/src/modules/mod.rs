//! Analysis module interface
//!
//! A module is anything that wants to see the replayed event sequence. The
//! dispatcher works out how each event relates to the analyzed player and
//! calls the one handler matching that relation and event type. Every handler
//! has a no-op default, so a module only implements the capabilities it needs.
//!
//! ```text
//!   CombatEvent ──► Relation (by player / by player's pet / to player / other)
//!                        │
//!                        ▼
//!   (Relation, EventType) ──► HandlerKey ──► module.on_<key>(event)
//! ```

use thiserror::Error;

use crate::combat_log::{CombatEvent, EventType};
use crate::cooldowns::ConfigError;
use crate::game_data::AbilityCatalog;
use crate::summary::AnalysisResults;

/// How an event's actors relate to the analyzed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    ByPlayer,
    ByPlayerPet,
    /// Someone else acting on the player
    ToPlayer,
    /// Someone else acting on one of the player's pets
    ToPlayerPet,
    Other,
}

/// The fixed set of keyed handlers a module can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    CastByPlayer,
    BeginCastByPlayer,
    DamageByPlayer,
    DamageByPlayerPet,
    HealByPlayer,
    HealByPlayerPet,
    AbsorbedByPlayer,
    ApplyBuffByPlayer,
    RemoveBuffByPlayer,
    EnergizeByPlayer,
    SummonByPlayer,
    DamageToPlayer,
    DeathOfPlayer,
    DeathOfPlayerPet,
}

impl HandlerKey {
    /// Pick the handler for an event, if any module capability covers it.
    pub fn resolve(relation: Relation, event_type: EventType) -> Option<Self> {
        use EventType as T;
        use Relation as R;

        let key = match (relation, event_type) {
            (R::ByPlayer, T::Cast) => Self::CastByPlayer,
            (R::ByPlayer, T::BeginCast) => Self::BeginCastByPlayer,
            (R::ByPlayer, T::Damage) => Self::DamageByPlayer,
            (R::ByPlayerPet, T::Damage) => Self::DamageByPlayerPet,
            (R::ByPlayer, T::Heal) => Self::HealByPlayer,
            (R::ByPlayerPet, T::Heal) => Self::HealByPlayerPet,
            (R::ByPlayer, T::Absorbed) => Self::AbsorbedByPlayer,
            (R::ByPlayer, T::ApplyBuff) => Self::ApplyBuffByPlayer,
            (R::ByPlayer, T::RemoveBuff) => Self::RemoveBuffByPlayer,
            (R::ByPlayer, T::Energize) => Self::EnergizeByPlayer,
            (R::ByPlayer, T::Summon) => Self::SummonByPlayer,
            (R::ToPlayer, T::Damage) => Self::DamageToPlayer,
            (R::ToPlayer, T::Death) => Self::DeathOfPlayer,
            (R::ToPlayerPet, T::Death) => Self::DeathOfPlayerPet,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("no cooldown definition for ability {ability_id}")]
    UnknownCooldown { ability_id: u64 },

    #[error("cooldown {ability_id} can't be {action}: {reason}")]
    RejectedWindow {
        ability_id: u64,
        action: &'static str,
        reason: &'static str,
    },

    #[error("event at {timestamp} arrived after {last_seen}")]
    TimeWentBackwards { timestamp: i64, last_seen: i64 },

    #[error("{0}")]
    Other(String),
}

pub type ModuleResult = Result<(), ModuleError>;

/// A pluggable analysis over one player's events.
///
/// Handlers only touch the module's own state. `validate` runs once when the
/// module is registered, before any event is replayed.
///
/// Failures must come back as a `ModuleError`; that is what the dispatcher
/// isolates. A handler that panics takes the whole run down with it.
#[allow(unused_variables)]
pub trait AnalysisModule {
    /// Stable name used in failure reports and logs.
    fn name(&self) -> &'static str;

    fn validate(&self, catalog: &AbilityCatalog) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Called for every event regardless of who it involves.
    fn on_event(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }

    fn on_cast_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_begin_cast_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_damage_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_damage_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_heal_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_heal_by_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_absorbed_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_apply_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_remove_buff_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_energize_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_summon_by_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_damage_to_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_death_of_player(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }
    fn on_death_of_player_pet(&mut self, event: &CombatEvent) -> ModuleResult {
        Ok(())
    }

    /// The replay reached the end of the fight.
    fn on_finished(&mut self, fight_end: i64) -> ModuleResult {
        Ok(())
    }

    /// Add this module's section to the results.
    fn contribute(&self, results: &mut AnalysisResults) {}
}

/// Route an event to the handler for `key`.
pub(crate) fn invoke(
    module: &mut dyn AnalysisModule,
    key: HandlerKey,
    event: &CombatEvent,
) -> ModuleResult {
    match key {
        HandlerKey::CastByPlayer => module.on_cast_by_player(event),
        HandlerKey::BeginCastByPlayer => module.on_begin_cast_by_player(event),
        HandlerKey::DamageByPlayer => module.on_damage_by_player(event),
        HandlerKey::DamageByPlayerPet => module.on_damage_by_player_pet(event),
        HandlerKey::HealByPlayer => module.on_heal_by_player(event),
        HandlerKey::HealByPlayerPet => module.on_heal_by_player_pet(event),
        HandlerKey::AbsorbedByPlayer => module.on_absorbed_by_player(event),
        HandlerKey::ApplyBuffByPlayer => module.on_apply_buff_by_player(event),
        HandlerKey::RemoveBuffByPlayer => module.on_remove_buff_by_player(event),
        HandlerKey::EnergizeByPlayer => module.on_energize_by_player(event),
        HandlerKey::SummonByPlayer => module.on_summon_by_player(event),
        HandlerKey::DamageToPlayer => module.on_damage_to_player(event),
        HandlerKey::DeathOfPlayer => module.on_death_of_player(event),
        HandlerKey::DeathOfPlayerPet => module.on_death_of_player_pet(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_relations_resolve() {
        assert_eq!(
            HandlerKey::resolve(Relation::ByPlayer, EventType::Cast),
            Some(HandlerKey::CastByPlayer)
        );
        assert_eq!(
            HandlerKey::resolve(Relation::ByPlayerPet, EventType::Damage),
            Some(HandlerKey::DamageByPlayerPet)
        );
        assert_eq!(
            HandlerKey::resolve(Relation::ToPlayer, EventType::Death),
            Some(HandlerKey::DeathOfPlayer)
        );
    }

    #[test]
    fn test_uncovered_combinations_have_no_handler() {
        assert_eq!(HandlerKey::resolve(Relation::ByPlayerPet, EventType::Cast), None);
        assert_eq!(HandlerKey::resolve(Relation::Other, EventType::Damage), None);
        assert_eq!(HandlerKey::resolve(Relation::ByPlayer, EventType::Other), None);
        assert_eq!(HandlerKey::resolve(Relation::ToPlayer, EventType::Heal), None);
    }
}
