// ---------------------------------------------------------------------------
// Closed-form slot geometry
// ---------------------------------------------------------------------------
//
// step          = card_height + base_gap
// total_height  = (first_round_slots - 1) * step + card_height
// offset(r)     = step * (2^r - 1) / 2
// top(r, i)     = i * step * 2^r + offset(r)
// center_y(r,i) = top(r, i) + card_height / 2
//
// With card_height = 3, base_gap = 1 (one terminal row between cards) and
// 8 first-round slots the center rows per round are:
//   r=0: [1.5, 5.5, 9.5, ..., 29.5]  (spacing 4)
//   r=1: [3.5, 11.5, 19.5, 27.5]     (spacing 8)
//   r=2: [7.5, 23.5]                 (spacing 16)
//   r=3: [15.5]

/// Vertical placement of one slot card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub top: f64,
    pub height: f64,
}

impl SlotGeometry {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Geometry calculator for a bracket with a fixed first-round size.
///
/// Placement depends only on `(round_index, slot_index, card_height, base_gap)`,
/// never on what the slot contains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub card_height: f64,
    pub base_gap: f64,
    pub first_round_slots: usize,
}

impl Geometry {
    pub fn new(card_height: f64, base_gap: f64, first_round_slots: usize) -> Self {
        Self { card_height, base_gap, first_round_slots }
    }

    pub fn step(&self) -> f64 {
        self.card_height + self.base_gap
    }

    pub fn total_height(&self) -> f64 {
        self.first_round_slots.saturating_sub(1) as f64 * self.step() + self.card_height
    }

    /// Half the extra distance a round's origin moves down relative to round 0.
    pub fn offset(&self, round_index: usize) -> f64 {
        self.step() * (scale(round_index) - 1.0) / 2.0
    }

    pub fn top(&self, round_index: usize, slot_index: usize) -> f64 {
        slot_index as f64 * self.step() * scale(round_index) + self.offset(round_index)
    }

    pub fn center_y(&self, round_index: usize, slot_index: usize) -> f64 {
        self.top(round_index, slot_index) + self.card_height / 2.0
    }

    pub fn slot(&self, round_index: usize, slot_index: usize) -> SlotGeometry {
        SlotGeometry { top: self.top(round_index, slot_index), height: self.card_height }
    }
}

/// `2^round_index` as a float. Exact for any bracket that fits in memory.
fn scale(round_index: usize) -> f64 {
    (1u64 << round_index) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn all_tops(g: &Geometry) -> Vec<Vec<f64>> {
        let rounds = g.first_round_slots.ilog2() as usize + 1;
        (0..rounds)
            .map(|r| (0..g.first_round_slots >> r).map(|i| g.top(r, i)).collect())
            .collect()
    }

    #[test]
    fn reference_example_card_76_gap_24() {
        let g = Geometry::new(76.0, 24.0, 8);
        assert_eq!(g.step(), 100.0);
        assert_eq!(g.total_height(), 776.0);
        assert_eq!(g.top(1, 0), 50.0);
        assert_eq!(g.center_y(0, 0), 38.0);
        assert_eq!(g.center_y(0, 1), 138.0);
        assert_eq!(g.center_y(1, 0), 88.0);
        assert_eq!(g.center_y(1, 0), (g.center_y(0, 0) + g.center_y(0, 1)) / 2.0);
    }

    #[test]
    fn first_slot_of_first_round_is_at_origin() {
        for (h, gap) in [(3.0, 1.0), (76.0, 24.0), (10.0, 0.0), (1.5, 7.25)] {
            let g = Geometry::new(h, gap, 16);
            assert_eq!(g.top(0, 0), 0.0);
            assert_eq!(g.offset(0), 0.0);
        }
    }

    #[test]
    fn spacing_within_a_round_doubles_per_round() {
        let g = Geometry::new(76.0, 24.0, 16);
        for r in 0..5usize {
            let slots: usize = 16 >> r;
            for i in 0..slots.saturating_sub(1) {
                assert_close(g.top(r, i + 1) - g.top(r, i), g.step() * (1u64 << r) as f64);
            }
        }
    }

    #[test]
    fn parent_center_is_midpoint_of_children() {
        for (h, gap, n) in [(3.0, 1.0, 8usize), (76.0, 24.0, 32), (5.0, 3.0, 64)] {
            let g = Geometry::new(h, gap, n);
            let rounds = n.ilog2() as usize;
            for r in 0..rounds {
                for p in 0..(n >> (r + 1)) {
                    let mid = (g.center_y(r, 2 * p) + g.center_y(r, 2 * p + 1)) / 2.0;
                    assert_close(g.center_y(r + 1, p), mid);
                }
            }
        }
    }

    #[test]
    fn final_slot_is_centered_in_total_height() {
        let g = Geometry::new(76.0, 24.0, 8);
        assert_close(g.center_y(3, 0), g.total_height() / 2.0);
        let g = Geometry::new(3.0, 1.0, 1);
        assert_eq!(g.total_height(), 3.0);
        assert_close(g.center_y(0, 0), 1.5);
    }

    #[test]
    fn terminal_rows_match_classic_bracket_centers() {
        let g = Geometry::new(3.0, 1.0, 8);
        let rows: Vec<Vec<u16>> = all_tops(&g)
            .iter()
            .map(|tops| tops.iter().map(|t| (t + 1.0) as u16).collect())
            .collect();
        assert_eq!(rows[0], vec![1, 5, 9, 13, 17, 21, 25, 29]);
        assert_eq!(rows[1], vec![3, 11, 19, 27]);
        assert_eq!(rows[2], vec![7, 23]);
        assert_eq!(rows[3], vec![15]);
    }

    #[test]
    fn slot_geometry_center_matches_calculator() {
        let g = Geometry::new(76.0, 24.0, 8);
        let s = g.slot(2, 1);
        assert_eq!(s.height, 76.0);
        assert_eq!(s.center_y(), g.center_y(2, 1));
    }
}
