use bracket_engine::{BracketLayout, Connector, LayoutConfig, Match, MatchStatus, PositionedSlot, Side, decided_winner};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

use crate::components::theme::{Tone, resolve};

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Draws a computed bracket layout: one column of cards per round with
/// box-drawing connectors in the zones between columns.
///
/// Layout units map 1:1 to terminal cells; fractional positions are floored.
pub struct BracketView<'a> {
    pub layout: &'a BracketLayout,
    pub config: &'a LayoutConfig,
    /// `(round_index, slot_index)` of the highlighted card.
    pub selected: Option<(usize, usize)>,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
    /// Horizontal scroll offset in terminal columns.
    pub h_scroll: u16,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let view = Viewport { area, scroll_x: self.h_scroll, scroll_y: self.scroll_offset };

        // Pass 1: connectors between adjacent rounds.
        let style = resolve(Tone::Dim);
        for connector in &self.layout.connectors {
            let x0 = self.config.connector_x(connector.round_index).floor() as i64;
            draw_connector(connector, x0, view, style, buf);
        }

        // Pass 2: cards.
        let card_width = self.config.card_width.max(1.0) as usize;
        for (round_index, round) in self.layout.rounds.iter().enumerate() {
            let x = self.config.column_x(round_index).floor() as i64;
            for slot in &round.slots {
                let selected = self.selected == Some((round_index, slot.slot_index));
                draw_card(slot, x, card_width, selected, view, buf);
            }
        }
    }
}

/// Visible window onto the layout plane.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    area: Rect,
    scroll_x: u16,
    scroll_y: u16,
}

impl Viewport {
    /// Absolute screen cell for a layout cell, or `None` when it is off-screen.
    fn cell(&self, x: i64, y: i64) -> Option<(u16, u16)> {
        let rel_x = x - i64::from(self.scroll_x);
        let rel_y = y - i64::from(self.scroll_y);
        if rel_x < 0 || rel_y < 0 || rel_x >= i64::from(self.area.width) || rel_y >= i64::from(self.area.height) {
            return None;
        }
        Some((self.area.x + rel_x as u16, self.area.y + rel_y as u16))
    }

    fn put(&self, buf: &mut Buffer, x: i64, y: i64, ch: char, style: Style) {
        if let Some(pos) = self.cell(x, y)
            && let Some(cell) = buf.cell_mut(pos)
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    }

    fn put_str(&self, buf: &mut Buffer, x: i64, y: i64, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.put(buf, x + i as i64, y, ch, style);
        }
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// Draw one slot card. The status line sits on the card's center row so it
/// lines up with the connector rows.
fn draw_card(slot: &PositionedSlot, x: i64, width: usize, selected: bool, view: Viewport, buf: &mut Buffer) {
    let rows = (slot.height.round() as usize).max(1);
    let center_row = slot.center_y().floor() as i64;
    let top_row = center_row - (rows / 2) as i64;

    for (dy, (text, tone)) in card_lines(slot.match_.as_ref(), width, rows).into_iter().enumerate() {
        let tone = if selected { Tone::Selected } else { tone };
        view.put_str(buf, x, top_row + dy as i64, &text, resolve(tone));
    }
}

/// Lines of a card, top to bottom, each exactly `width` characters.
///
/// 1 row: `home v away`; 2 rows: home, away; 3+ rows: home on the first row,
/// status on the middle row, away on the last row.
fn card_lines(m: Option<&Match>, width: usize, rows: usize) -> Vec<(String, Tone)> {
    let blank = (" ".repeat(width), Tone::Normal);
    let Some(m) = m else {
        let tbd = (pad("TBD", width), Tone::Dim);
        return match rows {
            1 => vec![tbd],
            2 => vec![tbd.clone(), tbd],
            n => {
                let mut lines = vec![blank; n];
                lines[0] = tbd.clone();
                lines[n - 1] = tbd;
                lines
            }
        };
    };

    let winner = decided_winner(m);
    let side_line = |side: &Side| {
        let tone = if winner.is_some_and(|w| std::ptr::eq(w, side)) { Tone::Winner } else { Tone::Normal };
        (format_team_line(side, width), tone)
    };

    match rows {
        1 => {
            let text = format!("{} v {}", m.home.display_name, m.away.display_name);
            vec![(pad(&text, width), Tone::Normal)]
        }
        2 => vec![side_line(&m.home), side_line(&m.away)],
        n => {
            let mut lines = vec![blank; n];
            lines[0] = side_line(&m.home);
            lines[n / 2] = (pad(&format!(" {}", status_text(m)), width), status_tone(m.status));
            lines[n - 1] = side_line(&m.away);
            lines
        }
    }
}

/// `"[name      ] [score]"`, exactly `width` characters.
fn format_team_line(side: &Side, width: usize) -> String {
    let score = match side.score {
        Some(s) => format!("{s:>3}"),
        None => "   ".to_string(),
    };
    let name_w = width.saturating_sub(4);
    let name: String = side.display_name.chars().take(name_w).collect();
    pad(&format!("{name:<name_w$} {score}"), width)
}

fn status_text(m: &Match) -> String {
    match m.status {
        MatchStatus::Finished => "FT".to_string(),
        MatchStatus::InProgress => "LIVE".to_string(),
        MatchStatus::Scheduled => match m.scheduled_at.parsed {
            Some(t) => t.format("%m/%d %H:%M").to_string(),
            None if !m.scheduled_at.raw.trim().is_empty() => m.scheduled_at.raw.trim().to_string(),
            None => "Scheduled".to_string(),
        },
    }
}

fn status_tone(status: MatchStatus) -> Tone {
    match status {
        MatchStatus::InProgress => Tone::Primary,
        _ => Tone::Dim,
    }
}

/// Left-align `text` in exactly `width` characters, truncating if needed.
fn pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

/// Draw one connector into its zone starting at layout column `x0`.
///
/// ```text
///  child_top  ──┐
///               │
///  parent       ├──
///               │
///  child_bot  ──┘
/// ```
fn draw_connector(connector: &Connector, x0: i64, view: Viewport, style: Style, buf: &mut Buffer) {
    let (y_top, y_next, y_bot) = connector.rows();
    let (r_top, r_next, r_bot) = (y_top.floor() as i64, y_next.floor() as i64, y_bot.floor() as i64);
    let mid = connector.midline_x() as i64;
    let width = connector.bounding_box.width as i64;

    for dx in 0..mid {
        view.put(buf, x0 + dx, r_top, '─', style);
        view.put(buf, x0 + dx, r_bot, '─', style);
    }

    let (lo, hi) = (r_top.min(r_bot).min(r_next), r_top.max(r_bot).max(r_next));
    for row in lo..=hi {
        let left = row == r_top || row == r_bot;
        let right = row == r_next;
        view.put(buf, x0 + mid, row, junction(row > lo, row < hi, left, right), style);
    }

    for dx in (mid + 1)..width {
        view.put(buf, x0 + dx, r_next, '─', style);
    }
}

/// Box-drawing glyph joining the given directions.
fn junction(up: bool, down: bool, left: bool, right: bool) -> char {
    match (up, down, left, right) {
        (false, true, true, false) => '┐',
        (true, false, true, false) => '┘',
        (false, true, false, true) => '┌',
        (true, false, false, true) => '└',
        (true, true, false, true) => '├',
        (true, true, true, false) => '┤',
        (false, true, true, true) => '┬',
        (true, false, true, true) => '┴',
        (true, true, true, true) => '┼',
        (_, _, false, false) => '│',
        _ => '─',
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::{BracketShape, RoundDef, ScheduledAt, compute_layout};
    use tui::style::{Color, Modifier};

    fn config() -> LayoutConfig {
        LayoutConfig { card_height: 3.0, base_gap: 1.0, card_width: 10.0, connector_width: 4.0 }
    }

    fn side(name: &str, score: Option<u32>) -> Side {
        Side { team_id: name.to_lowercase(), display_name: name.into(), logo_ref: None, score }
    }

    fn semi(id: &str, at: &str, home: u32, away: u32) -> Match {
        Match {
            id: id.into(),
            round_id: "sf".into(),
            scheduled_at: ScheduledAt::parse(at),
            status: MatchStatus::Finished,
            home: side(&format!("{id}-home"), Some(home)),
            away: side(&format!("{id}-away"), Some(away)),
        }
    }

    fn render(layout: &BracketLayout, area: Rect, selected: Option<(usize, usize)>) -> Buffer {
        let mut buf = Buffer::empty(area);
        BracketView { layout, config: &config(), selected, scroll_offset: 0, h_scroll: 0 }.render(area, &mut buf);
        buf
    }

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.cell((x, y)).unwrap().symbol()
    }

    fn row_text(buf: &Buffer, y: u16, x0: u16, x1: u16) -> String {
        (x0..x1).map(|x| symbol(buf, x, y)).collect()
    }

    fn two_round_layout(matches: &[Match]) -> BracketLayout {
        let shape = BracketShape::new(RoundDef::standard(2)).unwrap();
        compute_layout(&shape, matches, &config())
    }

    #[test]
    fn connector_joins_children_to_parent() {
        let layout = two_round_layout(&[]);
        let buf = render(&layout, Rect::new(0, 0, 24, 8), None);
        // children centered on rows 1 and 5, parent on row 3, midline at x = 10 + 2
        assert_eq!(row_text(&buf, 1, 10, 13), "──┐");
        assert_eq!(symbol(&buf, 12, 2), "│");
        assert_eq!(row_text(&buf, 3, 12, 14), "├─");
        assert_eq!(symbol(&buf, 12, 4), "│");
        assert_eq!(row_text(&buf, 5, 10, 13), "──┘");
    }

    #[test]
    fn empty_slots_render_as_tbd() {
        let layout = two_round_layout(&[]);
        let buf = render(&layout, Rect::new(0, 0, 24, 8), None);
        assert_eq!(row_text(&buf, 0, 0, 3), "TBD");
        assert_eq!(row_text(&buf, 2, 0, 3), "TBD");
        // final card occupies rows 2..=4 in the column starting at x = 14
        assert_eq!(row_text(&buf, 2, 14, 17), "TBD");
        assert_eq!(row_text(&buf, 4, 14, 17), "TBD");
    }

    #[test]
    fn cards_show_names_scores_and_status() {
        let layout = two_round_layout(&[semi("a", "2026-05-01T18:00:00Z", 2, 1)]);
        let buf = render(&layout, Rect::new(0, 0, 24, 8), None);
        assert_eq!(row_text(&buf, 0, 0, 10), "a-home   2");
        assert_eq!(row_text(&buf, 1, 0, 3), " FT");
        assert_eq!(row_text(&buf, 2, 0, 10), "a-away   1");
        let winner = buf.cell((0, 0)).unwrap();
        assert_eq!(winner.fg, Color::Green);
        assert!(winner.modifier.contains(Modifier::BOLD));
        assert_ne!(buf.cell((0, 2)).unwrap().fg, Color::Green);
    }

    #[test]
    fn scrolling_shifts_the_plane() {
        let layout = two_round_layout(&[]);
        let area = Rect::new(0, 0, 24, 8);
        let mut buf = Buffer::empty(area);
        BracketView { layout: &layout, config: &config(), selected: None, scroll_offset: 1, h_scroll: 0 }
            .render(area, &mut buf);
        assert_eq!(row_text(&buf, 0, 10, 13), "──┐");
    }

    #[test]
    fn rendering_outside_the_area_is_clipped() {
        let layout = two_round_layout(&[]);
        let buf = render(&layout, Rect::new(0, 0, 12, 2), None);
        assert_eq!(row_text(&buf, 1, 10, 12), "──");
    }

    #[test]
    fn selected_card_is_highlighted() {
        let layout = two_round_layout(&[]);
        let buf = render(&layout, Rect::new(0, 0, 24, 8), Some((1, 0)));
        assert!(buf.cell((14, 2)).unwrap().modifier.contains(Modifier::REVERSED));
        assert!(!buf.cell((0, 0)).unwrap().modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn junction_glyphs() {
        assert_eq!(junction(false, true, true, false), '┐');
        assert_eq!(junction(true, true, false, true), '├');
        assert_eq!(junction(true, false, true, false), '┘');
        assert_eq!(junction(true, true, false, false), '│');
        assert_eq!(junction(false, false, true, true), '─');
    }

    #[test]
    fn team_line_has_exact_width() {
        let line = format_team_line(&side("Jacksonville State Gamecocks", Some(72)), 22);
        assert_eq!(line.chars().count(), 22, "line: {line:?}");
        let line = format_team_line(&side("A", None), 10);
        assert_eq!(line, "A         ");
    }

    #[test]
    fn single_row_cards_are_compact() {
        let m = semi("a", "2026-05-01T18:00:00Z", 1, 0);
        let lines = card_lines(Some(&m), 20, 1);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].0.starts_with("a-home v a-away"));
    }

    #[test]
    fn unparseable_kickoff_is_shown_verbatim() {
        let mut m = semi("a", "after lunch", 0, 0);
        m.status = MatchStatus::Scheduled;
        assert_eq!(status_text(&m), "after lunch");
        m.scheduled_at = ScheduledAt::parse("");
        assert_eq!(status_text(&m), "Scheduled");
    }
}
