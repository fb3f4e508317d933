use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Live matches.
    Primary,
    /// Titles and the champion banner.
    Accent,
    /// Connectors, empty slots, finished status lines.
    Dim,
    Winner,
    Selected,
    Normal,
}

pub fn resolve(tone: Tone) -> Style {
    match tone {
        Tone::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        Tone::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Tone::Dim => Style::default().fg(Color::Indexed(240)),
        Tone::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Tone::Selected => Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED),
        Tone::Normal => Style::default().fg(Color::Gray),
    }
}
