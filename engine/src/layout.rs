use crate::champion::resolve_champion;
use crate::connector::{Connector, build_connectors};
use crate::geometry::Geometry;
use crate::slots::{Diagnostic, build_slots};
use crate::{BracketShape, Champion, Match};

/// Static sizing of slot cards and connector zones, in renderer units
/// (terminal cells for the TUI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub card_height: f64,
    pub base_gap: f64,
    pub card_width: f64,
    pub connector_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { card_height: 3.0, base_gap: 1.0, card_width: 22.0, connector_width: 4.0 }
    }
}

impl LayoutConfig {
    /// Left edge of a round's card column.
    pub fn column_x(&self, round_index: usize) -> f64 {
        round_index as f64 * (self.card_width + self.connector_width)
    }

    /// Left edge of the connector zone to the right of a round's column.
    pub fn connector_x(&self, round_index: usize) -> f64 {
        self.column_x(round_index) + self.card_width
    }

    pub fn total_width(&self, round_count: usize) -> f64 {
        match round_count {
            0 => 0.0,
            n => self.column_x(n - 1) + self.card_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedSlot {
    pub slot_index: usize,
    pub top: f64,
    pub height: f64,
    pub match_: Option<Match>,
}

impl PositionedSlot {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundLayout {
    pub round_id: String,
    pub label: String,
    pub slots: Vec<PositionedSlot>,
}

/// Everything a renderer needs to draw one bracket snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketLayout {
    pub rounds: Vec<RoundLayout>,
    pub connectors: Vec<Connector>,
    pub champion: Option<Champion>,
    pub diagnostics: Vec<Diagnostic>,
    pub total_height: f64,
    pub total_width: f64,
}

/// Run the full pipeline over one snapshot: slots, geometry, connectors and
/// champion. Nothing is cached between calls.
pub fn compute_layout(shape: &BracketShape, matches: &[Match], config: &LayoutConfig) -> BracketLayout {
    let stage_slots = build_slots(shape, matches);
    let geometry = Geometry::new(config.card_height, config.base_gap, shape.first_round_slot_count());

    let champion = resolve_champion(stage_slots.rounds.last().and_then(|r| r.first()));

    let rounds = stage_slots
        .rounds
        .into_iter()
        .zip(shape.rounds())
        .map(|(slots, def)| RoundLayout {
            round_id: def.id.clone(),
            label: def.label.clone(),
            slots: slots
                .into_iter()
                .map(|slot| {
                    let g = geometry.slot(slot.round_index, slot.slot_index);
                    PositionedSlot {
                        slot_index: slot.slot_index,
                        top: g.top,
                        height: g.height,
                        match_: slot.match_,
                    }
                })
                .collect(),
        })
        .collect();

    BracketLayout {
        rounds,
        connectors: build_connectors(&geometry, shape.round_count(), config.connector_width),
        champion,
        diagnostics: stage_slots.diagnostics,
        total_height: geometry.total_height(),
        total_width: config.total_width(shape.round_count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchStatus, RoundDef, ScheduledAt, Side};

    fn side(id: &str, score: Option<u32>) -> Side {
        Side { team_id: id.into(), display_name: id.into(), logo_ref: None, score }
    }

    fn finished(id: &str, round: &str, at: &str, home: u32, away: u32) -> Match {
        Match {
            id: id.into(),
            round_id: round.into(),
            scheduled_at: ScheduledAt::parse(at),
            status: MatchStatus::Finished,
            home: side(&format!("{id}-h"), Some(home)),
            away: side(&format!("{id}-a"), Some(away)),
        }
    }

    fn config() -> LayoutConfig {
        LayoutConfig { card_height: 76.0, base_gap: 24.0, card_width: 200.0, connector_width: 40.0 }
    }

    #[test]
    fn layout_positions_every_slot() {
        let shape = BracketShape::new(RoundDef::standard(8)).unwrap();
        let layout = compute_layout(&shape, &[], &config());
        let lens: Vec<usize> = layout.rounds.iter().map(|r| r.slots.len()).collect();
        assert_eq!(lens, vec![8, 4, 2, 1]);
        assert_eq!(layout.total_height, 776.0);
        assert_eq!(layout.total_width, 3.0 * 240.0 + 200.0);
        assert_eq!(layout.rounds[1].slots[0].top, 50.0);
        assert_eq!(layout.rounds[1].slots[0].center_y(), 88.0);
        assert_eq!(layout.rounds[3].slots[0].center_y(), 388.0);
        assert_eq!(layout.connectors.len(), 7);
        assert!(layout.champion.is_none());
    }

    #[test]
    fn geometry_does_not_depend_on_slot_contents() {
        let shape = BracketShape::new(RoundDef::standard(4)).unwrap();
        let empty = compute_layout(&shape, &[], &config());
        let matches = [
            finished("q1", "qf", "2026-05-01T18:00:00Z", 1, 0),
            finished("f", "final", "2026-05-09T18:00:00Z", 2, 1),
        ];
        let filled = compute_layout(&shape, &matches, &config());
        let tops = |l: &BracketLayout| -> Vec<f64> {
            l.rounds.iter().flat_map(|r| r.slots.iter().map(|s| s.top)).collect()
        };
        assert_eq!(tops(&empty), tops(&filled));
        assert_eq!(empty.connectors, filled.connectors);
        assert_eq!(filled.champion.unwrap().team_id, "f-h");
    }

    #[test]
    fn single_round_bracket() {
        let shape = BracketShape::new(vec![RoundDef::new("final", "Final", 1)]).unwrap();
        let matches = [finished("f", "final", "2026-05-09T18:00:00Z", 0, 2)];
        let layout = compute_layout(&shape, &matches, &config());
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.rounds[0].slots[0].top, 0.0);
        assert_eq!(layout.total_height, 76.0);
        assert_eq!(layout.total_width, 200.0);
        assert_eq!(layout.champion.unwrap().team_id, "f-a");
    }

    #[test]
    fn diagnostics_are_carried_through() {
        let shape = BracketShape::new(RoundDef::standard(2)).unwrap();
        let matches = [
            finished("a", "final", "2026-05-09T18:00:00Z", 1, 0),
            finished("b", "final", "2026-05-10T18:00:00Z", 0, 1),
        ];
        let layout = compute_layout(&shape, &matches, &config());
        assert_eq!(layout.diagnostics.len(), 1);
        assert_eq!(layout.rounds[1].slots[0].match_.as_ref().unwrap().id, "a");
        assert_eq!(layout.champion.unwrap().team_id, "a-h");
    }

    #[test]
    fn recomputing_is_idempotent() {
        let shape = BracketShape::new(RoundDef::standard(8)).unwrap();
        let matches = [
            finished("q2", "qf", "2026-05-01T18:00:00Z", 3, 1),
            finished("q1", "qf", "2026-05-01T18:00:00Z", 0, 0),
            finished("x", "qf", "not a date", 1, 2),
        ];
        let a = compute_layout(&shape, &matches, &config());
        let b = compute_layout(&shape, &matches, &config());
        assert_eq!(a, b);
        let paths = |l: &BracketLayout| -> Vec<String> { l.connectors.iter().map(|c| c.svg_path()).collect() };
        assert_eq!(paths(&a), paths(&b));
    }
}
