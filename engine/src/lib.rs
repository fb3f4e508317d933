pub mod champion;
pub mod client;
pub mod connector;
pub mod geometry;
pub mod layout;
pub mod slots;
pub mod snapshot;

use chrono::{DateTime, Utc};
use std::fmt;

pub use champion::{decided_winner, resolve_champion};
pub use connector::{BoundingBox, Connector, Point};
pub use geometry::{Geometry, SlotGeometry};
pub use layout::{BracketLayout, LayoutConfig, PositionedSlot, RoundLayout, compute_layout};
pub use slots::{Diagnostic, Slot, StageSlots, build_slots};

// ---------------------------------------------------------------------------
// Domain types, independent of the snapshot wire format
// ---------------------------------------------------------------------------

/// Largest first round a bracket may declare.
pub const MAX_FIRST_ROUND_SLOTS: usize = 4096;

/// One level of the elimination bracket (e.g. quarter-finals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDef {
    pub id: String,
    pub label: String,
    pub slot_count: usize,
}

impl RoundDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, slot_count: usize) -> Self {
        Self { id: id.into(), label: label.into(), slot_count }
    }

    /// Conventional round ladder for a bracket whose first round has
    /// `first_round_slots` matches, e.g. 8 → R16, QF, SF, Final.
    ///
    /// `first_round_slots` is rounded up to the next power of two.
    pub fn standard(first_round_slots: usize) -> Vec<RoundDef> {
        let mut slots = first_round_slots.max(1).next_power_of_two();
        let mut rounds = Vec::new();
        loop {
            let (id, label) = match slots {
                1 => ("final".to_string(), "Final".to_string()),
                2 => ("sf".to_string(), "Semi-finals".to_string()),
                4 => ("qf".to_string(), "Quarter-finals".to_string()),
                n => (format!("r{}", n * 2), format!("Round of {}", n * 2)),
            };
            rounds.push(RoundDef { id, label, slot_count: slots });
            if slots == 1 {
                return rounds;
            }
            slots /= 2;
        }
    }

    /// Slot count implied by a conventional round id (`final`, `sf`, `qf`,
    /// `r16`, `r32`, ...), as produced by [`RoundDef::standard`]. Ids implying
    /// more than [`MAX_FIRST_ROUND_SLOTS`] slots are not recognised.
    pub fn standard_slot_count(round_id: &str) -> Option<usize> {
        match round_id {
            "final" => Some(1),
            "sf" => Some(2),
            "qf" => Some(4),
            id => {
                let n: usize = id.strip_prefix('r')?.parse().ok()?;
                (n >= 16 && n.is_power_of_two() && n / 2 <= MAX_FIRST_ROUND_SLOTS).then_some(n / 2)
            }
        }
    }
}

/// Validated, ordered round definitions of a binary bracket.
///
/// Slot counts halve from round to round and the last round holds a single
/// slot, so `round_count == log2(first_round_slot_count) + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketShape {
    rounds: Vec<RoundDef>,
}

impl BracketShape {
    pub fn new(rounds: Vec<RoundDef>) -> Result<Self, LayoutError> {
        let first = rounds.first().ok_or(LayoutError::NoRounds)?;
        if first.slot_count > MAX_FIRST_ROUND_SLOTS {
            return Err(LayoutError::TooManySlots { slot_count: first.slot_count, max: MAX_FIRST_ROUND_SLOTS });
        }
        if !first.slot_count.is_power_of_two() {
            return Err(LayoutError::NotPowerOfTwo { slot_count: first.slot_count });
        }
        for pair in rounds.windows(2) {
            if pair[1].slot_count * 2 != pair[0].slot_count {
                return Err(LayoutError::NotHalving {
                    round_id: pair[1].id.clone(),
                    expected: pair[0].slot_count / 2,
                    found: pair[1].slot_count,
                });
            }
        }
        let last = &rounds[rounds.len() - 1];
        if last.slot_count != 1 {
            return Err(LayoutError::FinalNotSingle { slot_count: last.slot_count });
        }
        Ok(Self { rounds })
    }

    pub fn rounds(&self) -> &[RoundDef] {
        &self.rounds
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn first_round_slot_count(&self) -> usize {
        self.rounds[0].slot_count
    }

    pub fn round_index(&self, round_id: &str) -> Option<usize> {
        self.rounds.iter().position(|r| r.id == round_id)
    }
}

/// One loaded snapshot: the bracket it describes and the matches played in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub title: String,
    pub shape: BracketShape,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: String,
    pub round_id: String,
    pub scheduled_at: ScheduledAt,
    pub status: MatchStatus,
    pub home: Side,
    pub away: Side,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Side {
    pub team_id: String,
    pub display_name: String,
    pub logo_ref: Option<String>,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Finished,
}

/// Upstream kickoff time. The raw text is kept so an unparseable value is
/// still visible to the renderer; `parsed` is `None` when it could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledAt {
    pub raw: String,
    pub parsed: Option<DateTime<Utc>>,
}

impl ScheduledAt {
    pub fn parse(raw: &str) -> Self {
        let parsed = DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
        Self { raw: raw.to_owned(), parsed }
    }
}

impl From<DateTime<Utc>> for ScheduledAt {
    fn from(dt: DateTime<Utc>) -> Self {
        Self { raw: dt.to_rfc3339(), parsed: Some(dt) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Champion {
    pub team_id: String,
    pub display_name: String,
    pub logo_ref: Option<String>,
}

impl From<&Side> for Champion {
    fn from(side: &Side) -> Self {
        Self {
            team_id: side.team_id.clone(),
            display_name: side.display_name.clone(),
            logo_ref: side.logo_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    NoRounds,
    NotPowerOfTwo { slot_count: usize },
    NotHalving { round_id: String, expected: usize, found: usize },
    FinalNotSingle { slot_count: usize },
    TooManySlots { slot_count: usize, max: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NoRounds => write!(f, "bracket has no rounds"),
            LayoutError::NotPowerOfTwo { slot_count } => {
                write!(f, "first round has {slot_count} slots, expected a power of two")
            }
            LayoutError::NotHalving { round_id, expected, found } => {
                write!(f, "round {round_id} has {found} slots, expected {expected}")
            }
            LayoutError::FinalNotSingle { slot_count } => {
                write!(f, "final round has {slot_count} slots, expected 1")
            }
            LayoutError::TooManySlots { slot_count, max } => {
                write!(f, "first round has {slot_count} slots, at most {max} are supported")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
