use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::combat_log::{CombatEvent, EventError, ParsedRecord, RawCombatEvent};
use crate::context::AnalyzerSettings;
use crate::cooldowns::ConfigError;
use crate::dispatch::{Combatant, DispatchError, Dispatcher};
use crate::game_data::AbilityCatalog;
use crate::modules::AnalysisModule;
use crate::summary::{AnalysisResults, Diagnostic};

/// Shared flag that stops a replay at the next event boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One analysis run: validates the raw sequence and replays it through the
/// dispatcher, then gathers every module's results.
pub struct AnalysisSession {
    dispatcher: Dispatcher,
    settings: AnalyzerSettings,
    cancel: CancelFlag,
    fight_start: Option<i64>,
    fight_end: Option<i64>,
}

impl AnalysisSession {
    pub fn new(combatant: Combatant, catalog: AbilityCatalog, settings: AnalyzerSettings) -> Self {
        Self {
            dispatcher: Dispatcher::new(combatant, catalog, settings.dispatch_mode),
            settings,
            cancel: CancelFlag::new(),
            fight_start: None,
            fight_end: None,
        }
    }

    /// Register an analysis module; its configuration is checked here.
    pub fn register(&mut self, module: Box<dyn AnalysisModule + Send>) -> Result<(), ConfigError> {
        self.dispatcher.register(module)
    }

    /// Handle for cancelling the run from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Fight boundaries from the log provider. Without them the first and
    /// last replayed events are used.
    pub fn with_fight_bounds(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.fight_start = start;
        self.fight_end = end;
        self
    }

    pub fn run(
        self,
        events: impl IntoIterator<Item = RawCombatEvent>,
    ) -> Result<AnalysisResults, DispatchError> {
        self.replay(events.into_iter().map(|raw| (None, Ok(raw))))
    }

    /// Replay records read from an event file, keeping their line numbers
    /// for diagnostics.
    pub fn run_records(self, records: Vec<ParsedRecord>) -> Result<AnalysisResults, DispatchError> {
        self.replay(
            records
                .into_iter()
                .map(|record| (Some(record.line_number), record.event)),
        )
    }

    fn replay(
        mut self,
        records: impl Iterator<Item = (Option<usize>, Result<RawCombatEvent, String>)>,
    ) -> Result<AnalysisResults, DispatchError> {
        let mut results = AnalysisResults {
            player_id: self.dispatcher.combatant().player_id,
            ..Default::default()
        };
        let mut first_timestamp = None;
        let mut last_timestamp: Option<i64> = None;

        for (sequence, (line, record)) in (0u64..).zip(records) {
            if self.cancel.is_cancelled() {
                tracing::info!(sequence, "Analysis cancelled");
                results.cancelled = true;
                break;
            }

            let event = match record
                .and_then(|raw| raw.into_event(sequence).map_err(|e| e.to_string()))
                .and_then(|event| self.check_order(event, last_timestamp))
            {
                Ok(event) => event,
                Err(message) => {
                    tracing::warn!(?line, sequence, %message, "Skipping event");
                    results.skipped_events += 1;
                    results.diagnostics.push(Diagnostic {
                        line,
                        sequence: Some(sequence),
                        message,
                    });
                    continue;
                }
            };

            first_timestamp.get_or_insert(event.timestamp);
            last_timestamp = Some(last_timestamp.map_or(event.timestamp, |t| t.max(event.timestamp)));

            self.dispatcher.dispatch(&event)?;
            results.events_replayed += 1;
        }

        results.fight_start = self.fight_start.or(first_timestamp);
        results.fight_end = match (self.fight_end, last_timestamp) {
            (Some(end), Some(last)) => Some(end.max(last)),
            (end, last) => end.or(last),
        };

        if !results.cancelled
            && let Some(fight_end) = results.fight_end
        {
            self.dispatcher.finish(fight_end)?;
        }

        self.dispatcher.collect(&mut results);
        tracing::info!(
            events = results.events_replayed,
            skipped = results.skipped_events,
            cooldowns = results.cooldowns.len(),
            failures = results.failures.len(),
            "Analysis complete"
        );
        Ok(results)
    }

    fn check_order(&self, event: CombatEvent, previous: Option<i64>) -> Result<CombatEvent, String> {
        match previous {
            Some(previous) if self.settings.reject_out_of_order && event.timestamp < previous => {
                Err(EventError::OutOfOrder {
                    timestamp: event.timestamp,
                    previous,
                }
                .to_string())
            }
            _ => Ok(event),
        }
    }
}
