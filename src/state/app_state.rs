use crate::app::MenuItem;
use bracket_engine::{BracketLayout, LayoutConfig, PositionedSlot, Snapshot, compute_layout};
use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub snapshot: Option<Snapshot>,
    /// Layout of `snapshot`, rebuilt from scratch on every load.
    pub layout: Option<BracketLayout>,
    /// Round column of the highlighted slot.
    pub selected_round: usize,
    /// Slot index of the highlighted slot within `selected_round`.
    pub selected_slot: usize,
    /// Vertical scroll offset in terminal rows (tall brackets on short terminals).
    pub scroll_offset: u16,
    /// Horizontal scroll offset in terminal columns.
    pub h_scroll: u16,
    /// Set by PageUp/PageDown; the view stops following the selection until
    /// the selection moves again.
    pub free_scroll: bool,
    /// Rows available to the bracket at the last draw.
    pub viewport_height: u16,
    pub last_updated: Option<DateTime<Local>>,
}

impl BracketState {
    /// Store a freshly loaded snapshot and recompute its layout.
    pub fn load(&mut self, snapshot: Snapshot, config: &LayoutConfig) {
        let layout = compute_layout(&snapshot.shape, &snapshot.matches, config);
        for diagnostic in &layout.diagnostics {
            log::warn!("{}: {diagnostic}", snapshot.title);
        }
        self.snapshot = Some(snapshot);
        self.layout = Some(layout);
        self.last_updated = Some(Local::now());
        self.clamp_selection();
    }

    pub fn navigate_round_next(&mut self) {
        self.free_scroll = false;
        if self.selected_round + 1 < self.round_count() {
            self.selected_round += 1;
            self.selected_slot /= 2;
        }
    }

    pub fn navigate_round_prev(&mut self) {
        self.free_scroll = false;
        if self.selected_round > 0 {
            self.selected_round -= 1;
            self.selected_slot *= 2;
        }
    }

    pub fn navigate_slot_down(&mut self) {
        self.free_scroll = false;
        let max = self.slots_in_round().saturating_sub(1);
        if self.selected_slot < max {
            self.selected_slot += 1;
        }
    }

    pub fn navigate_slot_up(&mut self) {
        self.free_scroll = false;
        self.selected_slot = self.selected_slot.saturating_sub(1);
    }

    /// Scroll one page down, stopping once the bottom of the bracket is visible.
    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        self.scroll_offset = self.scroll_offset.saturating_add(self.page()).min(max);
        self.free_scroll = true;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(self.page());
        self.free_scroll = true;
    }

    fn page(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    fn max_scroll(&self) -> u16 {
        let total = self.layout.as_ref().map(|l| l.total_height.ceil() as u16).unwrap_or(0);
        total.saturating_sub(self.viewport_height)
    }

    pub fn selected(&self) -> Option<&PositionedSlot> {
        self.layout
            .as_ref()?
            .rounds
            .get(self.selected_round)?
            .slots
            .get(self.selected_slot)
    }

    /// Adjust the scroll offsets so the highlighted card is fully visible in a
    /// viewport of `height` rows and `width` columns.
    pub fn follow_selection(&mut self, height: u16, width: u16, config: &LayoutConfig) {
        self.viewport_height = height;
        if self.free_scroll {
            return;
        }
        let Some(slot) = self.selected() else {
            return;
        };
        let top = slot.top as u16;
        let bottom = (slot.top + slot.height).ceil() as u16;
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset.saturating_add(height) {
            self.scroll_offset = bottom.saturating_sub(height);
        }

        let left = config.column_x(self.selected_round) as u16;
        let right = (config.column_x(self.selected_round) + config.card_width) as u16;
        if left < self.h_scroll {
            self.h_scroll = left;
        } else if right > self.h_scroll.saturating_add(width) {
            self.h_scroll = right.saturating_sub(width);
        }
    }

    fn round_count(&self) -> usize {
        self.layout.as_ref().map(|l| l.rounds.len()).unwrap_or(0)
    }

    fn slots_in_round(&self) -> usize {
        self.layout
            .as_ref()
            .and_then(|l| l.rounds.get(self.selected_round))
            .map(|r| r.slots.len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        self.selected_round = self.selected_round.min(self.round_count().saturating_sub(1));
        self.selected_slot = self.selected_slot.min(self.slots_in_round().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub bracket: BracketState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
