//! Window summaries and the results object handed to the presentation layer
//!
//! Totals are derived from a window's collected events on demand, never kept
//! as running sums, so a summary always matches the window it came from.

use std::collections::BTreeMap;

use serde::Serialize;
use throughput_types::formatting::{
    format_amount, format_duration_ms, format_rate, format_window_span,
};
use throughput_types::{SummaryKind, WindowTrigger};

use crate::combat_log::{CombatEvent, EventType};
use crate::cooldowns::{CooldownRegistry, CooldownWindow};
use crate::dispatch::ModuleFailure;

/// Sum one quantity over a window's events.
pub fn total(events: &[CombatEvent], kind: SummaryKind) -> i64 {
    events
        .iter()
        .filter_map(|e| match (kind, e.event_type) {
            (SummaryKind::Damage, EventType::Damage) => e.amount,
            (SummaryKind::Healing, EventType::Heal) => e.amount,
            (SummaryKind::Overhealing, EventType::Heal) => e.overheal,
            (SummaryKind::AbsorbShield, EventType::Absorbed) => e.amount,
            _ => None,
        })
        .fold(0, i64::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub start: i64,
    pub end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    pub duration_ms: Option<i64>,
    pub event_count: usize,
    pub totals: BTreeMap<SummaryKind, i64>,
}

pub fn summarize(window: &CooldownWindow) -> WindowSummary {
    let totals = window
        .definition
        .summary
        .iter()
        .map(|&kind| (kind, total(&window.events, kind)))
        .collect();

    WindowSummary {
        start: window.start,
        end: window.end,
        closed_at: window.closed_at,
        duration_ms: window.duration_ms(),
        event_count: window.events.len(),
        totals,
    }
}

/// Every use of one tracked ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooldownReport {
    pub ability_id: u64,
    pub name: String,
    pub trigger: WindowTrigger,
    pub uses: usize,
    /// Totals over all uses
    pub totals: BTreeMap<SummaryKind, i64>,
    /// One entry per use, in closure order
    pub windows: Vec<WindowSummary>,
}

impl CooldownReport {
    /// Plain-text lines for a terminal report.
    pub fn render_lines(&self, fight_start: i64, european: bool) -> Vec<String> {
        let mut lines = vec![format!("{} ({}x)", self.name, self.uses)];
        for window in &self.windows {
            let mut line = format!(
                "  {}",
                format_window_span(fight_start, window.start, window.end)
            );
            if let Some(duration) = window.duration_ms {
                line.push_str(&format!(" [{}]", format_duration_ms(duration)));
            }
            for (kind, amount) in &window.totals {
                line.push_str(&format!(" {} {}", kind.label(), format_amount(*amount, european)));
                if let Some(duration) = window.duration_ms {
                    line.push_str(&format!(" ({}/s)", format_rate(*amount, duration, european)));
                }
            }
            lines.push(line);
        }
        lines
    }
}

/// Group closed windows by ability, in the registry's definition order.
///
/// Abilities that were never used are left out.
pub fn build_reports(registry: &CooldownRegistry, history: &[CooldownWindow]) -> Vec<CooldownReport> {
    registry
        .iter()
        .filter_map(|def| {
            let windows: Vec<WindowSummary> = history
                .iter()
                .filter(|w| w.ability_id() == def.ability_id)
                .map(summarize)
                .collect();
            if windows.is_empty() {
                return None;
            }

            let mut totals: BTreeMap<SummaryKind, i64> =
                def.summary.iter().map(|&kind| (kind, 0)).collect();
            for window in &windows {
                for (kind, amount) in &window.totals {
                    let total = totals.entry(*kind).or_default();
                    *total = total.saturating_add(*amount);
                }
            }

            Some(CooldownReport {
                ability_id: def.ability_id,
                name: def.display_name(),
                trigger: def.trigger,
                uses: windows.len(),
                totals,
                windows,
            })
        })
        .collect()
}

/// An input record that was skipped instead of replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Line (or array index) in the input file, when read from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    pub message: String,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResults {
    pub player_id: i64,
    pub fight_start: Option<i64>,
    pub fight_end: Option<i64>,
    pub events_replayed: u64,
    pub skipped_events: u64,
    /// The run stopped early; windows still open at that point are missing
    pub cancelled: bool,
    pub cooldowns: Vec<CooldownReport>,
    pub failures: Vec<ModuleFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResults {
    pub fn cooldown(&self, ability_id: u64) -> Option<&CooldownReport> {
        self.cooldowns.iter().find(|c| c.ability_id == ability_id)
    }

    pub fn render_text(&self, european: bool) -> String {
        let fight_start = self.fight_start.unwrap_or_default();
        let mut lines = Vec::new();
        for report in &self.cooldowns {
            lines.extend(report.render_lines(fight_start, european));
        }
        for failure in &self.failures {
            lines.push(format!("module {} failed: {}", failure.module, failure.error));
        }
        if self.skipped_events > 0 {
            lines.push(format!("{} events skipped", self.skipped_events));
        }
        if self.cancelled {
            lines.push("analysis cancelled".to_string());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::combat_log::Ability;
    use crate::cooldowns::CooldownSpellDefinition;
    use crate::game_data::{AGONY, SUMMON_INFERNAL};

    fn event(sequence: u64, event_type: EventType, amount: i64, overheal: Option<i64>) -> CombatEvent {
        CombatEvent {
            sequence,
            timestamp: sequence as i64 * 1_000,
            event_type,
            source_id: 1,
            target_id: 2,
            ability: Ability::new(AGONY, "Agony"),
            amount: Some(amount),
            overheal,
            source_is_pet: false,
        }
    }

    fn closed_window(kinds: &[SummaryKind], events: Vec<CombatEvent>) -> CooldownWindow {
        let def = CooldownSpellDefinition::cast(SUMMON_INFERNAL, Some(25_000), kinds);
        let mut window = CooldownWindow::open(Arc::new(def), 0);
        for event in &events {
            window.attribute(event);
        }
        window.close(30_000)
    }

    #[test]
    fn test_totals_filter_by_event_type() {
        let events = vec![
            event(1, EventType::Damage, 100, None),
            event(2, EventType::Heal, 40, Some(15)),
            event(3, EventType::Damage, 50, None),
            event(4, EventType::Absorbed, 30, None),
        ];
        assert_eq!(total(&events, SummaryKind::Damage), 150);
        assert_eq!(total(&events, SummaryKind::Healing), 40);
        assert_eq!(total(&events, SummaryKind::Overhealing), 15);
        assert_eq!(total(&events, SummaryKind::AbsorbShield), 30);
    }

    #[test]
    fn test_totals_saturate() {
        let events = vec![
            event(1, EventType::Damage, i64::MAX, None),
            event(2, EventType::Damage, i64::MAX, None),
        ];
        assert_eq!(total(&events, SummaryKind::Damage), i64::MAX);

        let registry = CooldownRegistry::from_definitions([CooldownSpellDefinition::cast(
            SUMMON_INFERNAL,
            Some(25_000),
            &[SummaryKind::Damage],
        )])
        .unwrap();
        let history = vec![
            closed_window(&[SummaryKind::Damage], vec![event(1, EventType::Damage, i64::MAX, None)]),
            closed_window(&[SummaryKind::Damage], vec![event(2, EventType::Damage, 10, None)]),
        ];
        let reports = build_reports(&registry, &history);
        assert_eq!(reports[0].totals[&SummaryKind::Damage], i64::MAX);
    }

    #[test]
    fn test_summary_only_includes_definition_kinds() {
        let window = closed_window(
            &[SummaryKind::Damage],
            vec![event(1, EventType::Damage, 100, None), event(2, EventType::Heal, 40, None)],
        );
        let summary = summarize(&window);
        assert_eq!(summary.totals.len(), 1);
        assert_eq!(summary.totals[&SummaryKind::Damage], 100);
        assert_eq!(summary.event_count, 2);
        assert_eq!(summary.duration_ms, Some(25_000));
        assert_eq!(summary.closed_at, Some(30_000));
    }

    #[test]
    fn test_reports_skip_unused_abilities() {
        let registry = CooldownRegistry::from_definitions([
            CooldownSpellDefinition::cast(AGONY, Some(1_000), &[SummaryKind::Damage]),
            CooldownSpellDefinition::cast(SUMMON_INFERNAL, Some(25_000), &[SummaryKind::Damage]),
        ])
        .unwrap();
        let history = vec![
            closed_window(&[SummaryKind::Damage], vec![event(1, EventType::Damage, 100, None)]),
            closed_window(&[SummaryKind::Damage], vec![event(2, EventType::Damage, 20, None)]),
        ];

        let reports = build_reports(&registry, &history);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].ability_id, SUMMON_INFERNAL);
        assert_eq!(reports[0].uses, 2);
        assert_eq!(reports[0].totals[&SummaryKind::Damage], 120);
    }

    #[test]
    fn test_results_serialize_totals_by_kind_name() {
        let registry = CooldownRegistry::from_definitions([CooldownSpellDefinition::cast(
            SUMMON_INFERNAL,
            Some(25_000),
            &[SummaryKind::Damage],
        )])
        .unwrap();
        let history = vec![closed_window(
            &[SummaryKind::Damage],
            vec![event(1, EventType::Damage, 150, None)],
        )];
        let results = AnalysisResults {
            cooldowns: build_reports(&registry, &history),
            ..Default::default()
        };

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["cooldowns"][0]["totals"]["damage"], 150);
        assert_eq!(json["cooldowns"][0]["trigger"], "cast");
        assert_eq!(json["cooldowns"][0]["windows"][0]["end"], 25_000);
    }

    #[test]
    fn test_render_text() {
        let registry = CooldownRegistry::from_definitions([CooldownSpellDefinition::cast(
            SUMMON_INFERNAL,
            Some(25_000),
            &[SummaryKind::Damage],
        )])
        .unwrap();
        let history = vec![closed_window(
            &[SummaryKind::Damage],
            vec![event(1, EventType::Damage, 150_000, None)],
        )];
        let results = AnalysisResults {
            fight_start: Some(0),
            cooldowns: build_reports(&registry, &history),
            ..Default::default()
        };
        assert_eq!(
            results.render_text(false),
            "Summon Infernal (1x)\n  0:00.000 - 0:25.000 [0:25] Damage 150.00K (6.00K/s)"
        );
    }
}
