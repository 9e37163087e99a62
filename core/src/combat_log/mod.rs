//! Combat log model and input reading
//!
//! - **event**: validated `CombatEvent` and the provider-shaped `RawCombatEvent`
//! - **reader**: memory-mapped event file reading (JSON array or one event per line)

mod event;
pub mod reader;

pub use event::{
    Ability, CombatEvent, EventError, EventType, NO_ACTOR, RawAbility, RawCombatEvent,
};
pub use reader::{ParsedRecord, ReadError, read_event_file};
