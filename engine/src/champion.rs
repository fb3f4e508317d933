use crate::{Champion, Match, MatchStatus, Side, Slot};
use std::cmp::Ordering;

/// Winner of the final round's match, if one can be decided.
pub fn resolve_champion(final_slot: Option<&Slot>) -> Option<Champion> {
    let m = final_slot?.match_.as_ref()?;
    decided_winner(m).map(Champion::from)
}

/// Winning side of a match. Only a finished match with unequal scores has
/// one. A missing score counts as 0, which cannot tell a walkover apart from
/// a real 0.
pub fn decided_winner(m: &Match) -> Option<&Side> {
    if m.status != MatchStatus::Finished {
        return None;
    }

    let home = m.home.score.unwrap_or(0);
    let away = m.away.score.unwrap_or(0);
    match home.cmp(&away) {
        Ordering::Greater => Some(&m.home),
        Ordering::Less => Some(&m.away),
        Ordering::Equal => None,
    }
}
