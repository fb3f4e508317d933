use crate::geometry::Geometry;
use std::fmt::Write;

/// Fraction of the connector zone at which the vertical midline sits.
const MIDLINE_RATIO: f64 = 0.55;

/// Smallest bounding-box height a connector may have, so a flat connector
/// still has something to draw.
const MIN_BOX_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Orthogonal path joining two sibling slots in round `round_index` to their
/// parent slot `pair_index` in the next round.
///
/// x runs from 0 (the right edge of the child column) to `width` (the left
/// edge of the parent column); y is in the same frame as slot geometry.
///
/// ```text
///  child_top  ────┐
///                 │
///  parent         ├────
///                 │
///  child_bot  ────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub round_index: usize,
    pub pair_index: usize,
    /// child_top → midline → parent row → zone end.
    pub top_branch: Vec<Point>,
    /// child_bot → midline → parent row; ends on the shared horizontal.
    pub bottom_branch: Vec<Point>,
    pub bounding_box: BoundingBox,
}

impl Connector {
    pub fn build(
        round_index: usize,
        pair_index: usize,
        y_top: f64,
        y_bot: f64,
        y_next: f64,
        width: f64,
    ) -> Self {
        let mid = midline_x(width);
        let top_branch = vec![
            Point::new(0.0, y_top),
            Point::new(mid, y_top),
            Point::new(mid, y_next),
            Point::new(width, y_next),
        ];
        let bottom_branch = vec![
            Point::new(0.0, y_bot),
            Point::new(mid, y_bot),
            Point::new(mid, y_next),
        ];

        let min_y = y_top.min(y_bot).min(y_next);
        let max_y = y_top.max(y_bot).max(y_next);
        let bounding_box = BoundingBox {
            x: 0.0,
            y: min_y,
            width,
            height: (max_y - min_y).max(MIN_BOX_HEIGHT),
        };

        Self { round_index, pair_index, top_branch, bottom_branch, bounding_box }
    }

    pub fn midline_x(&self) -> f64 {
        self.top_branch[1].x
    }

    /// Row of the child on top, the parent, and the child below.
    pub fn rows(&self) -> (f64, f64, f64) {
        (self.top_branch[0].y, self.top_branch[2].y, self.bottom_branch[0].y)
    }

    /// SVG path data for both branches, e.g. `M0 38H2V88H4M0 138H2V88`.
    pub fn svg_path(&self) -> String {
        let mut out = String::new();
        for branch in [&self.top_branch, &self.bottom_branch] {
            let Some(start) = branch.first() else {
                continue;
            };
            let _ = write!(out, "M{} {}", start.x, start.y);
            for pair in branch.windows(2) {
                if pair[0].y == pair[1].y {
                    let _ = write!(out, "H{}", pair[1].x);
                } else {
                    let _ = write!(out, "V{}", pair[1].y);
                }
            }
        }
        out
    }
}

pub fn midline_x(width: f64) -> f64 {
    (width * MIDLINE_RATIO).floor()
}

/// Connectors for every sibling pair of every round except the last, in
/// round-major order. Slot contents are irrelevant: the whole skeleton is
/// always produced.
pub fn build_connectors(geometry: &Geometry, round_count: usize, width: f64) -> Vec<Connector> {
    let mut connectors = Vec::new();
    let mut slots = geometry.first_round_slots;
    for round_index in 0..round_count.saturating_sub(1) {
        for pair_index in 0..slots / 2 {
            connectors.push(Connector::build(
                round_index,
                pair_index,
                geometry.center_y(round_index, 2 * pair_index),
                geometry.center_y(round_index, 2 * pair_index + 1),
                geometry.center_y(round_index + 1, pair_index),
                width,
            ));
        }
        slots /= 2;
    }
    connectors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midline_is_floor_of_55_percent() {
        assert_eq!(midline_x(4.0), 2.0);
        assert_eq!(midline_x(40.0), 22.0);
        assert_eq!(midline_x(3.0), 1.0);
        assert_eq!(midline_x(0.0), 0.0);
    }

    #[test]
    fn connector_count_covers_every_pair() {
        let g = Geometry::new(3.0, 1.0, 8);
        let connectors = build_connectors(&g, 4, 4.0);
        assert_eq!(connectors.len(), 4 + 2 + 1);
        let keys: Vec<(usize, usize)> =
            connectors.iter().map(|c| (c.round_index, c.pair_index)).collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn branches_meet_at_parent_center() {
        let g = Geometry::new(76.0, 24.0, 8);
        for c in build_connectors(&g, 4, 40.0) {
            let (top, next, bot) = c.rows();
            assert_eq!(top, g.center_y(c.round_index, 2 * c.pair_index));
            assert_eq!(bot, g.center_y(c.round_index, 2 * c.pair_index + 1));
            assert_eq!(next, g.center_y(c.round_index + 1, c.pair_index));
            assert_eq!(c.top_branch[2], *c.bottom_branch.last().unwrap());
            assert_eq!(c.top_branch[3], Point::new(40.0, next));
            assert_eq!(c.midline_x(), 22.0);
        }
    }

    #[test]
    fn bounding_box_spans_children() {
        let g = Geometry::new(76.0, 24.0, 8);
        let first = &build_connectors(&g, 4, 40.0)[0];
        assert_eq!(
            first.bounding_box,
            BoundingBox { x: 0.0, y: 38.0, width: 40.0, height: 100.0 }
        );
    }

    #[test]
    fn flat_connector_keeps_minimum_height() {
        let c = Connector::build(0, 0, 10.0, 10.0, 10.0, 4.0);
        assert_eq!(c.bounding_box.height, 1.0);
        assert_eq!(c.bounding_box.y, 10.0);
    }

    #[test]
    fn single_round_bracket_has_no_connectors() {
        let g = Geometry::new(3.0, 1.0, 1);
        assert!(build_connectors(&g, 1, 4.0).is_empty());
    }

    #[test]
    fn svg_path_describes_both_branches() {
        let g = Geometry::new(76.0, 24.0, 8);
        let first = &build_connectors(&g, 4, 40.0)[0];
        assert_eq!(first.svg_path(), "M0 38H22V88H40M0 138H22V88");
    }
}
