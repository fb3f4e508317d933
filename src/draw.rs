use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::BracketView;
use crate::components::theme::{Tone, resolve};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use bracket_engine::{BracketLayout, Match, MatchStatus, PositionedSlot};

static TABS: &[&str; 2] = &["Bracket", "Matches"];

const HELP_TEXT: &str = "q=quit  1=Bracket  2=Matches  h/l=round  j/k=slot  PgUp/PgDn=scroll  R=reload  f=full screen  \"=logs  Esc=back";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        let area = f.area();
        draw_loading_spinner(f, area, app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Matches => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Message shown in place of the bracket while nothing is loaded.
fn empty_message(app: &App) -> String {
    if let Some(err) = app.state.last_error.as_deref() {
        format!("Bracket load failed:\n{err}")
    } else {
        "Loading bracket data...".to_string()
    }
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let title = app
        .state
        .bracket
        .snapshot
        .as_ref()
        .map(|s| format!(" {} ", s.title))
        .unwrap_or_else(|| " Bracket ".to_string());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.bracket.layout.is_none() {
        f.render_widget(
            Paragraph::new(empty_message(app))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [header, status, content, detail] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let config = app.settings.layout;
    app.state.bracket.follow_selection(content.height, content.width, &config);

    let bracket = &app.state.bracket;
    let Some(layout) = bracket.layout.as_ref() else {
        return;
    };

    f.render_widget(Paragraph::new(header_line(layout, bracket.selected_round)), header);
    f.render_widget(status_paragraph(app, layout), status);
    f.render_widget(
        BracketView {
            layout,
            config: &config,
            selected: Some((bracket.selected_round, bracket.selected_slot)),
            scroll_offset: bracket.scroll_offset,
            h_scroll: bracket.h_scroll,
        },
        content,
    );
    f.render_widget(
        Paragraph::new(bracket.selected().map(slot_detail).unwrap_or_default())
            .style(Style::default().fg(Color::Gray)),
        detail,
    );
}

fn header_line(layout: &BracketLayout, selected_round: usize) -> Line<'static> {
    let round_label = layout
        .rounds
        .get(selected_round)
        .map(|r| r.label.clone())
        .unwrap_or_default();
    let champion = match &layout.champion {
        Some(c) => format!("Champion: {}", c.display_name),
        None => "Champion: TBD".to_string(),
    };
    Line::from(vec![
        round_label.into(),
        " | ".into(),
        tui::text::Span::styled(champion, resolve(Tone::Accent)),
    ])
}

/// Last refresh time, load errors, and slot-assignment diagnostics.
fn status_paragraph<'a>(app: &App, layout: &BracketLayout) -> Paragraph<'a> {
    let updated = app
        .state
        .bracket
        .last_updated
        .map(|t| format!("updated {}", t.format("%H:%M:%S")))
        .unwrap_or_default();

    if let Some(err) = app.state.last_error.as_deref() {
        return Paragraph::new(format!("{updated} | refresh failed: {err}"))
            .style(Style::default().fg(Color::Red));
    }
    if !layout.diagnostics.is_empty() {
        let joined: Vec<String> = layout.diagnostics.iter().map(ToString::to_string).collect();
        return Paragraph::new(format!("{updated} | {}", joined.join("; ")))
            .style(Style::default().fg(Color::Yellow));
    }
    Paragraph::new(updated).style(Style::default().fg(Color::DarkGray))
}

fn slot_detail(slot: &PositionedSlot) -> String {
    match &slot.match_ {
        Some(m) => format!("{}  {}  [{}]  {}", m.id, versus(m), status_label(m), m.scheduled_at.raw),
        None => format!("slot {}: to be determined", slot.slot_index + 1),
    }
}

fn versus(m: &Match) -> String {
    let score = |s: Option<u32>| s.map(|v| format!(" {v}")).unwrap_or_default();
    format!(
        "{}{} vs {}{}",
        m.home.display_name,
        score(m.home.score),
        m.away.display_name,
        score(m.away.score)
    )
}

fn status_label(m: &Match) -> &'static str {
    match m.status {
        MatchStatus::Scheduled => "SCHEDULED",
        MatchStatus::InProgress => "LIVE",
        MatchStatus::Finished => "FINAL",
    }
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bracket = &app.state.bracket;
    let Some(round) = bracket
        .layout
        .as_ref()
        .and_then(|l| l.rounds.get(bracket.selected_round))
    else {
        f.render_widget(
            Paragraph::new(empty_message(app)).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let mut lines = Vec::with_capacity(round.slots.len() + 3);
    lines.push(Line::from(format!("{} ({} slots)", round.label, round.slots.len())));
    lines.push(Line::from("h/l to change round, j/k to move").style(Style::default().fg(Color::DarkGray)));
    lines.push(Line::from(""));

    for slot in &round.slots {
        let marker = if slot.slot_index == bracket.selected_slot { ">" } else { " " };
        let text = match &slot.match_ {
            Some(m) => format!("{marker} {:>2}. {}  [{}]", slot.slot_index + 1, versus(m), status_label(m)),
            None => format!("{marker} {:>2}. TBD", slot.slot_index + 1),
        };
        lines.push(Line::from(text));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default()
            .block(default_border(Color::DarkGray).title(" Logs "))
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow)),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
