use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::{IStr, empty_istr, intern, resolve};

/// Actor id the log provider uses when an event has no source or target
/// (environment damage, deaths without a killer).
pub const NO_ACTOR: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Cast,
    BeginCast,
    Damage,
    Heal,
    /// Damage soaked by an absorb shield the source applied
    Absorbed,
    ApplyBuff,
    RemoveBuff,
    Death,
    /// Resource change (mana, soul shards, astral power)
    Energize,
    Summon,
    /// Provider event types the engine doesn't route to a specific handler
    #[serde(other)]
    Other,
}

impl EventType {
    /// Event types that close expired cooldown windows and get attributed
    /// to the ones still open.
    pub fn is_trackable(&self) -> bool {
        matches!(self, Self::Damage | Self::Heal | Self::Absorbed)
    }

    fn requires_source(&self) -> bool {
        !matches!(self, Self::Death | Self::Other)
    }

    fn requires_ability(&self) -> bool {
        !matches!(self, Self::Death | Self::Other)
    }

    fn requires_amount(&self) -> bool {
        self.is_trackable()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cast => "cast",
            Self::BeginCast => "begincast",
            Self::Damage => "damage",
            Self::Heal => "heal",
            Self::Absorbed => "absorbed",
            Self::ApplyBuff => "applybuff",
            Self::RemoveBuff => "removebuff",
            Self::Death => "death",
            Self::Energize => "energize",
            Self::Summon => "summon",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub id: u64,
    pub name: IStr,
}

impl Ability {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: intern(name),
        }
    }

    pub fn none() -> Self {
        Self {
            id: 0,
            name: empty_istr(),
        }
    }

    pub fn name(&self) -> &'static str {
        resolve(self.name)
    }
}

/// One validated entry of the event sequence.
///
/// `sequence` is the event's position in the replayed input and is what
/// identifies an event instance inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatEvent {
    pub sequence: u64,
    pub timestamp: i64,
    pub event_type: EventType,
    pub source_id: i64,
    pub target_id: i64,
    pub ability: Ability,
    pub amount: Option<i64>,
    pub overheal: Option<i64>,
    pub source_is_pet: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAbility {
    pub guid: Option<u64>,
    pub name: Option<String>,
}

/// An event as the log provider hands it over, before validation.
///
/// Every field is optional here so one bad record can be reported and
/// skipped instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCombatEvent {
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    #[serde(rename = "sourceID")]
    pub source_id: Option<i64>,
    #[serde(rename = "targetID")]
    pub target_id: Option<i64>,
    pub ability: Option<RawAbility>,
    pub amount: Option<i64>,
    pub overheal: Option<i64>,
    #[serde(default)]
    pub source_is_pet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event is missing required field `{field}`")]
    MissingField {
        field: &'static str,
        event_type: Option<EventType>,
    },

    #[error("{event_type:?} event has a negative amount ({amount})")]
    NegativeAmount { event_type: EventType, amount: i64 },

    #[error("timestamp {timestamp} is earlier than the previous event ({previous})")]
    OutOfOrder { timestamp: i64, previous: i64 },
}

impl RawCombatEvent {
    /// Validate the record and assign it its position in the sequence.
    pub fn into_event(self, sequence: u64) -> Result<CombatEvent, EventError> {
        let timestamp = self.timestamp.ok_or(EventError::MissingField {
            field: "timestamp",
            event_type: self.event_type,
        })?;
        let event_type = self.event_type.ok_or(EventError::MissingField {
            field: "type",
            event_type: None,
        })?;
        let missing = |field| EventError::MissingField {
            field,
            event_type: Some(event_type),
        };

        let source_id = match self.source_id {
            Some(id) => id,
            None if event_type.requires_source() => return Err(missing("sourceID")),
            None => NO_ACTOR,
        };
        let target_id = match self.target_id {
            Some(id) => id,
            None if event_type == EventType::Death => return Err(missing("targetID")),
            None => NO_ACTOR,
        };

        let ability = match self.ability {
            Some(RawAbility {
                guid: Some(guid),
                name,
            }) => Ability::new(guid, name.as_deref().unwrap_or_default()),
            _ if event_type.requires_ability() => return Err(missing("ability.guid")),
            _ => Ability::none(),
        };

        if event_type.requires_amount() {
            let amount = self.amount.ok_or_else(|| missing("amount"))?;
            if amount < 0 {
                return Err(EventError::NegativeAmount { event_type, amount });
            }
        }

        Ok(CombatEvent {
            sequence,
            timestamp,
            event_type,
            source_id,
            target_id,
            ability,
            amount: self.amount,
            overheal: self.overheal,
            source_is_pet: self.source_is_pet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawCombatEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_provider_field_names() {
        let raw = parse(
            r#"{"timestamp": 5000, "type": "damage", "sourceID": 7, "targetID": 42,
                "ability": {"guid": 980, "name": "Agony"}, "amount": 100, "sourceIsPet": false}"#,
        );
        let event = raw.into_event(3).unwrap();
        assert_eq!(event.sequence, 3);
        assert_eq!(event.timestamp, 5000);
        assert_eq!(event.event_type, EventType::Damage);
        assert_eq!(event.source_id, 7);
        assert_eq!(event.target_id, 42);
        assert_eq!(event.ability.id, 980);
        assert_eq!(event.ability.name(), "Agony");
        assert_eq!(event.amount, Some(100));
    }

    #[test]
    fn test_unknown_type_maps_to_other() {
        let raw = parse(r#"{"timestamp": 1, "type": "combatantinfo"}"#);
        assert_eq!(raw.event_type, Some(EventType::Other));
        let event = raw.into_event(0).unwrap();
        assert_eq!(event.source_id, NO_ACTOR);
        assert_eq!(event.ability.id, 0);
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let raw = parse(r#"{"type": "cast", "sourceID": 1, "ability": {"guid": 1122}}"#);
        assert!(matches!(
            raw.into_event(0),
            Err(EventError::MissingField { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_damage_without_amount_is_rejected() {
        let raw = parse(r#"{"timestamp": 10, "type": "damage", "sourceID": 1, "ability": {"guid": 980}}"#);
        assert_eq!(
            raw.into_event(0),
            Err(EventError::MissingField {
                field: "amount",
                event_type: Some(EventType::Damage)
            })
        );
    }

    #[test]
    fn test_cast_without_ability_is_rejected() {
        let raw = parse(r#"{"timestamp": 10, "type": "cast", "sourceID": 1}"#);
        assert!(matches!(
            raw.into_event(0),
            Err(EventError::MissingField { field: "ability.guid", .. })
        ));
    }

    #[test]
    fn test_death_needs_target_not_source() {
        let ok = parse(r#"{"timestamp": 10, "type": "death", "targetID": 1}"#);
        assert!(ok.into_event(0).is_ok());

        let bad = parse(r#"{"timestamp": 10, "type": "death", "sourceID": 1}"#);
        assert!(matches!(
            bad.into_event(0),
            Err(EventError::MissingField { field: "targetID", .. })
        ));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let raw = parse(
            r#"{"timestamp": 10, "type": "heal", "sourceID": 1, "ability": {"guid": 5}, "amount": -4}"#,
        );
        assert!(matches!(raw.into_event(0), Err(EventError::NegativeAmount { amount: -4, .. })));
    }
}
