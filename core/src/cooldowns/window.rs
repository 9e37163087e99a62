use std::sync::Arc;

use super::CooldownSpellDefinition;
use crate::combat_log::CombatEvent;

/// One use of a tracked cooldown and the events attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownWindow {
    pub definition: Arc<CooldownSpellDefinition>,
    /// Timestamp of the cast, buff or grant that opened the window
    pub start: i64,
    /// Exclusive end; None while the window waits for an explicit close
    pub end: Option<i64>,
    /// Replay time at which the window moved to history
    pub closed_at: Option<i64>,
    pub events: Vec<CombatEvent>,
}

impl CooldownWindow {
    pub(crate) fn open(definition: Arc<CooldownSpellDefinition>, start: i64) -> Self {
        let end = definition.duration_ms.map(|d| start.saturating_add(d));
        Self {
            definition,
            start,
            end,
            closed_at: None,
            events: Vec::new(),
        }
    }

    pub fn ability_id(&self) -> u64 {
        self.definition.ability_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    /// The window's end has been reached at `timestamp`.
    pub fn has_expired(&self, timestamp: i64) -> bool {
        self.end.is_some_and(|end| end <= timestamp)
    }

    /// `start <= timestamp < end`, an unknown end counting as still open.
    pub fn covers(&self, timestamp: i64) -> bool {
        self.start <= timestamp && self.end.is_none_or(|end| timestamp < end)
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    /// Append an event; the same event instance is never stored twice.
    pub(crate) fn attribute(&mut self, event: &CombatEvent) -> bool {
        // Events arrive in sequence order, so a repeat can only be the last entry
        if self.events.last().is_some_and(|last| last.sequence >= event.sequence) {
            return false;
        }
        self.events.push(*event);
        true
    }

    /// Seal the window at replay time `at`, cutting it short if still running.
    pub(crate) fn close(mut self, at: i64) -> Self {
        let end = self.end.map_or(at, |end| end.min(at));
        self.end = Some(end.max(self.start));
        self.closed_at = Some(at);
        self
    }
}
