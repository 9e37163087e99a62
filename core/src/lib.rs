pub mod combat_log;
pub mod context;
pub mod cooldowns;
pub mod dispatch;
pub mod game_data;
pub mod modules;
pub mod summary;

// Re-exports for convenience
pub use combat_log::{CombatEvent, EventType, RawCombatEvent, read_event_file};
pub use context::{AnalysisSession, AnalyzerSettings, CancelFlag};
pub use cooldowns::{ConfigError, CooldownRegistry, CooldownSpellDefinition, CooldownTracker, Spec};
pub use dispatch::{Combatant, DispatchError, DispatchMode, Dispatcher};
pub use game_data::AbilityCatalog;
pub use modules::{AnalysisModule, ModuleError, ModuleResult};
pub use summary::AnalysisResults;
