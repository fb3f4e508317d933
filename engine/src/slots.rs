use crate::{BracketShape, Match};
use log::{debug, warn};

/// A fixed position within a round. `None` means the match is still to be
/// determined.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub round_index: usize,
    pub slot_index: usize,
    pub match_: Option<Match>,
}

/// Slot arrays for every round, plus anomalies found while filling them.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSlots {
    /// `rounds[r].len() == shape.rounds()[r].slot_count` for every round.
    pub rounds: Vec<Vec<Slot>>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// More matches than slots were supplied for a round; only the earliest
    /// `kept` survived.
    ExcessMatches { round_id: String, supplied: usize, kept: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::ExcessMatches { round_id, supplied, kept } => {
                write!(f, "round {round_id}: {supplied} matches for {kept} slots, kept earliest {kept}")
            }
        }
    }
}

/// Group matches by round and lay them into fixed-size slot arrays.
///
/// Within a round matches are ordered by kickoff. `Vec::sort_by` is stable, so
/// equal kickoffs keep input order; unparseable kickoffs sort after all
/// parseable ones, also in input order. Matches for an unknown round are
/// dropped.
pub fn build_slots(shape: &BracketShape, matches: &[Match]) -> StageSlots {
    let mut buckets: Vec<Vec<&Match>> = vec![Vec::new(); shape.round_count()];
    for m in matches {
        match shape.round_index(&m.round_id) {
            Some(idx) => buckets[idx].push(m),
            None => debug!("dropping match {} with unknown round {}", m.id, m.round_id),
        }
    }

    let mut diagnostics = Vec::new();
    let rounds = buckets
        .into_iter()
        .zip(shape.rounds())
        .enumerate()
        .map(|(round_index, (mut bucket, def))| {
            bucket.sort_by(|a, b| match (a.scheduled_at.parsed, b.scheduled_at.parsed) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });

            if bucket.len() > def.slot_count {
                warn!(
                    "round {} has {} matches for {} slots, truncating",
                    def.id,
                    bucket.len(),
                    def.slot_count
                );
                diagnostics.push(Diagnostic::ExcessMatches {
                    round_id: def.id.clone(),
                    supplied: bucket.len(),
                    kept: def.slot_count,
                });
                bucket.truncate(def.slot_count);
            }

            let mut filled = bucket.into_iter();
            (0..def.slot_count)
                .map(|slot_index| Slot {
                    round_index,
                    slot_index,
                    match_: filled.next().cloned(),
                })
                .collect()
        })
        .collect();

    StageSlots { rounds, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchStatus, RoundDef, ScheduledAt, Side};

    fn shape() -> BracketShape {
        BracketShape::new(RoundDef::standard(4)).unwrap()
    }

    fn mk(id: &str, round: &str, at: &str) -> Match {
        Match {
            id: id.into(),
            round_id: round.into(),
            scheduled_at: ScheduledAt::parse(at),
            status: MatchStatus::Scheduled,
            home: Side::default(),
            away: Side::default(),
        }
    }

    fn ids(slots: &[Slot]) -> Vec<Option<&str>> {
        slots.iter().map(|s| s.match_.as_ref().map(|m| m.id.as_str())).collect()
    }

    #[test]
    fn every_round_has_exactly_slot_count_entries() {
        let out = build_slots(&shape(), &[]);
        let lens: Vec<usize> = out.rounds.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![4, 2, 1]);
        assert!(out.rounds.iter().flatten().all(|s| s.match_.is_none()));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn slots_are_ordered_by_kickoff_and_right_padded() {
        let matches = [
            mk("late", "qf", "2026-05-02T18:00:00Z"),
            mk("early", "qf", "2026-05-01T18:00:00Z"),
        ];
        let out = build_slots(&shape(), &matches);
        assert_eq!(ids(&out.rounds[0]), vec![Some("early"), Some("late"), None, None]);
        assert_eq!(out.rounds[0][3].round_index, 0);
        assert_eq!(out.rounds[0][3].slot_index, 3);
    }

    #[test]
    fn equal_kickoffs_keep_input_order() {
        let matches = [
            mk("b", "qf", "2026-05-01T18:00:00Z"),
            mk("a", "qf", "2026-05-01T18:00:00Z"),
            mk("c", "qf", "2026-05-01T17:00:00Z"),
        ];
        let out = build_slots(&shape(), &matches);
        assert_eq!(ids(&out.rounds[0]), vec![Some("c"), Some("b"), Some("a"), None]);
    }

    #[test]
    fn unparseable_kickoffs_follow_parseable_ones_in_input_order() {
        let matches = [
            mk("x", "qf", "garbage"),
            mk("y", "qf", ""),
            mk("z", "qf", "2026-05-01T18:00:00Z"),
        ];
        let out = build_slots(&shape(), &matches);
        assert_eq!(ids(&out.rounds[0]), vec![Some("z"), Some("x"), Some("y"), None]);
    }

    #[test]
    fn excess_matches_are_truncated_and_reported() {
        let matches = [
            mk("s3", "sf", "2026-05-03T18:00:00Z"),
            mk("s1", "sf", "2026-05-01T18:00:00Z"),
            mk("s2", "sf", "2026-05-02T18:00:00Z"),
        ];
        let out = build_slots(&shape(), &matches);
        assert_eq!(ids(&out.rounds[1]), vec![Some("s1"), Some("s2")]);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::ExcessMatches { round_id: "sf".into(), supplied: 3, kept: 2 }]
        );
    }

    #[test]
    fn unknown_rounds_are_dropped_silently() {
        let matches = [mk("m", "group-a", "2026-05-01T18:00:00Z")];
        let out = build_slots(&shape(), &matches);
        assert!(out.rounds.iter().flatten().all(|s| s.match_.is_none()));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn finished_first_round_does_not_populate_later_rounds() {
        let mut matches: Vec<Match> = (0..4)
            .map(|i| mk(&format!("q{i}"), "qf", &format!("2026-05-0{}T18:00:00Z", i + 1)))
            .collect();
        for m in &mut matches {
            m.status = MatchStatus::Finished;
            m.home.score = Some(2);
            m.away.score = Some(0);
        }
        let out = build_slots(&shape(), &matches);
        assert!(out.rounds[0].iter().all(|s| s.match_.is_some()));
        assert!(out.rounds[1].iter().all(|s| s.match_.is_none()));
        assert!(out.rounds[2][0].match_.is_none());
    }
}
