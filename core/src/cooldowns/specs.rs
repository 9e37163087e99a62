//! Built-in cooldown lists per specialization.
//!
//! Every specialization starts from [`base_definitions`] and appends its own
//! entries; an ability listed twice fails with
//! [`ConfigError::DuplicateDefinition`].

use throughput_types::SummaryKind;

use super::{
    AfflictionCooldownTracker, BuffGatedTracker, ConfigError, CooldownRegistry,
    CooldownSpellDefinition, CooldownTracker,
};
use crate::game_data::*;
use crate::modules::AnalysisModule;

const DAMAGE: &[SummaryKind] = &[SummaryKind::Damage];
const DAMAGE_AND_HEALING: &[SummaryKind] = &[SummaryKind::Damage, SummaryKind::Healing];

/// Summoned pets fight for a fixed 25 seconds.
const PET_WINDOW_MS: i64 = 25_000;

/// Racials and potions any class may use.
pub fn base_definitions() -> Vec<CooldownSpellDefinition> {
    vec![
        CooldownSpellDefinition::cast(BERSERKING, Some(10_000), DAMAGE_AND_HEALING),
        CooldownSpellDefinition::cast(BLOOD_FURY_PHYSICAL, Some(15_000), DAMAGE_AND_HEALING),
        CooldownSpellDefinition::cast(BLOOD_FURY_SPELL, Some(15_000), DAMAGE_AND_HEALING),
        CooldownSpellDefinition::cast(BLOOD_FURY_HYBRID, Some(15_000), DAMAGE_AND_HEALING),
        CooldownSpellDefinition::cast(POTION_OF_PROLONGED_POWER, Some(60_000), DAMAGE_AND_HEALING),
        CooldownSpellDefinition::cast(POTION_OF_DEADLY_GRACE, Some(25_000), DAMAGE_AND_HEALING),
    ]
}

pub fn base_registry() -> Result<CooldownRegistry, ConfigError> {
    CooldownRegistry::from_definitions(base_definitions())
}

pub fn affliction_registry() -> Result<CooldownRegistry, ConfigError> {
    base_registry()?.with([
        CooldownSpellDefinition::buff(SOUL_HARVEST, DAMAGE),
        CooldownSpellDefinition::granted(SUMMON_INFERNAL, PET_WINDOW_MS, DAMAGE),
        CooldownSpellDefinition::granted(SUMMON_DOOMGUARD, PET_WINDOW_MS, DAMAGE),
        CooldownSpellDefinition::cast(GRIMOIRE_IMP, Some(PET_WINDOW_MS), DAMAGE),
        CooldownSpellDefinition::cast(GRIMOIRE_VOIDWALKER, Some(PET_WINDOW_MS), DAMAGE),
        CooldownSpellDefinition::cast(GRIMOIRE_SUCCUBUS, Some(PET_WINDOW_MS), DAMAGE),
        CooldownSpellDefinition::cast(GRIMOIRE_FELHUNTER, Some(PET_WINDOW_MS), DAMAGE),
    ])
}

pub fn balance_registry() -> Result<CooldownRegistry, ConfigError> {
    base_registry()?.with([
        CooldownSpellDefinition::buff(CELESTIAL_ALIGNMENT, DAMAGE),
        CooldownSpellDefinition::buff(INCARNATION_CHOSEN_OF_ELUNE, DAMAGE),
    ])
}

/// Specializations with a built-in cooldown list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spec {
    /// Shared cooldowns only
    Base,
    AfflictionWarlock,
    BalanceDruid,
}

impl Spec {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "base" => Ok(Self::Base),
            "affliction" | "affliction_warlock" => Ok(Self::AfflictionWarlock),
            "balance" | "balance_druid" => Ok(Self::BalanceDruid),
            _ => Err(ConfigError::UnknownSpec(name.to_string())),
        }
    }

    pub fn registry(&self) -> Result<CooldownRegistry, ConfigError> {
        match self {
            Self::Base => base_registry(),
            Self::AfflictionWarlock => affliction_registry(),
            Self::BalanceDruid => balance_registry(),
        }
    }

    /// Build the tracker module for this spec, with `extra` user definitions
    /// appended to the built-in list.
    pub fn build_module(
        &self,
        extra: Vec<CooldownSpellDefinition>,
    ) -> Result<Box<dyn AnalysisModule + Send>, ConfigError> {
        let registry = self.registry()?.with(extra)?;
        tracing::debug!(spec = ?self, cooldowns = registry.len(), "Built cooldown registry");

        Ok(match self {
            Self::Base => Box::new(CooldownTracker::new(registry)),
            Self::AfflictionWarlock => Box::new(AfflictionCooldownTracker::new(registry)),
            Self::BalanceDruid => Box::new(BuffGatedTracker::new(registry)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use throughput_types::WindowTrigger;

    #[test]
    fn test_affliction_extends_base() {
        let base = base_registry().unwrap();
        let affliction = affliction_registry().unwrap();
        assert_eq!(affliction.len(), base.len() + 7);

        // Base entries come first, in their original order
        let base_ids: Vec<u64> = base.iter().map(|d| d.ability_id).collect();
        let prefix: Vec<u64> = affliction.iter().take(base.len()).map(|d| d.ability_id).collect();
        assert_eq!(base_ids, prefix);

        let infernal = affliction.get(SUMMON_INFERNAL).unwrap();
        assert_eq!(infernal.trigger, WindowTrigger::Granted);
        assert_eq!(infernal.duration_ms, Some(25_000));
        assert_eq!(
            affliction.get(SOUL_HARVEST).unwrap().trigger,
            WindowTrigger::Buff
        );
    }

    #[test]
    fn test_builtin_registries_validate() {
        let catalog = AbilityCatalog::builtin();
        for spec in [Spec::Base, Spec::AfflictionWarlock, Spec::BalanceDruid] {
            let module = spec.build_module(vec![]).unwrap();
            assert!(module.validate(&catalog).is_ok(), "{spec:?}");
        }
    }

    #[test]
    fn test_extra_definition_cannot_shadow_builtin() {
        let extra = vec![CooldownSpellDefinition::cast(SOUL_HARVEST, Some(1_000), DAMAGE)];
        let result = Spec::AfflictionWarlock.build_module(extra);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateDefinition { ability_id: SOUL_HARVEST })
        ));
    }

    #[test]
    fn test_base_tracker_rejects_buff_definitions() {
        let extra = vec![CooldownSpellDefinition::buff(CELESTIAL_ALIGNMENT, DAMAGE)];
        let module = Spec::Base.build_module(extra).unwrap();
        assert!(matches!(
            module.validate(&AbilityCatalog::builtin()),
            Err(ConfigError::UnsupportedTrigger { .. })
        ));
    }

    #[test]
    fn test_spec_names() {
        assert_eq!(Spec::from_name("Affliction").unwrap(), Spec::AfflictionWarlock);
        assert_eq!(Spec::from_name("balance-druid").unwrap(), Spec::BalanceDruid);
        assert!(matches!(Spec::from_name("frost"), Err(ConfigError::UnknownSpec(_))));
    }
}
