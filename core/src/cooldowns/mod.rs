//! Cooldown window tracking
//!
//! A [`CooldownRegistry`] lists the abilities worth tracking. Each use of one
//! of them opens a [`CooldownWindow`]; while a window is open, the player's
//! (and their pets') damage and healing is attributed to it. Closed windows
//! are kept in closure order and summarized once the replay is over.
//!
//! Specializations compose the shared base list with their own entries and
//! wrap [`CooldownTracker`] to add the event handlers they need:
//!
//! - [`CooldownTracker`] opens windows on the player's casts
//! - [`BuffGatedTracker`] also opens on buff application and closes on removal
//! - [`AfflictionCooldownTracker`] also grants pet windows on the player's summons

mod buff_gated;
mod config;
mod definition;
pub mod specs;
mod tracker;
mod window;


pub use buff_gated::{AfflictionCooldownTracker, BuffGatedTracker};
pub use config::{
    AbilityEntry, ConfigError, DefinitionFile, load_definition_file, load_definition_files,
    parse_definitions,
};
pub use definition::{CooldownRegistry, CooldownSpellDefinition};
pub use specs::Spec;
pub use tracker::CooldownTracker;
pub use window::CooldownWindow;
