//! Types shared between the analysis core and whatever renders its output.

pub mod formatting;

use serde::{Deserialize, Serialize};

/// Which quantity a cooldown window's summary adds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// `amount` of damage events
    Damage,
    /// `amount` of heal events
    Healing,
    /// `overheal` of heal events
    Overhealing,
    /// `amount` of absorb events (damage soaked by the player's shields)
    AbsorbShield,
}

impl SummaryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Damage => "Damage",
            Self::Healing => "Healing",
            Self::Overhealing => "Overhealing",
            Self::AbsorbShield => "Absorbed",
        }
    }
}

/// What opens a cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowTrigger {
    /// The analyzed player casting the ability
    #[default]
    Cast,
    /// The player gaining the buff; the window closes when the buff drops
    Buff,
    /// An explicit grant from a specialization (pet summons and the like)
    Granted,
}

impl WindowTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cast => "cast",
            Self::Buff => "buff",
            Self::Granted => "granted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        kinds: Vec<SummaryKind>,
        trigger: WindowTrigger,
    }

    #[test]
    fn test_snake_case_round_trip_from_toml() {
        let row: Row = toml::from_str(
            r#"
kinds = ["damage", "absorb_shield"]
trigger = "granted"
"#,
        )
        .unwrap();
        assert_eq!(row.kinds, vec![SummaryKind::Damage, SummaryKind::AbsorbShield]);
        assert_eq!(row.trigger, WindowTrigger::Granted);
    }

    #[test]
    fn test_summary_kind_orders_damage_first() {
        let mut kinds = vec![SummaryKind::Overhealing, SummaryKind::Healing, SummaryKind::Damage];
        kinds.sort();
        assert_eq!(kinds[0], SummaryKind::Damage);
        assert_eq!(SummaryKind::AbsorbShield.label(), "Absorbed");
    }
}
