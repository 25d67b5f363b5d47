use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    const TEXT: Color = Color::White;
    const MUTED: Color = Color::DarkGray;
    const GOOD: Color = Color::Green;
    const FOCUS: Color = Color::Cyan;
    const BAD: Color = Color::Red;

    pub fn title() -> Style {
        Style::default().fg(Self::GOOD).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn highlight() -> Style {
        Style::default().fg(Self::FOCUS).add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Self::MUTED)
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GOOD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::BAD).add_modifier(Modifier::BOLD)
    }

    /// Green for a fertile sample, red otherwise.
    pub fn verdict(fertile: bool) -> Style {
        if fertile {
            Self::title()
        } else {
            Self::error()
        }
    }

    pub fn nav_key() -> Style {
        Self::title()
    }

    pub fn border() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Border of a form field: red when its text failed to parse.
    pub fn field_border(focused: bool, invalid: bool) -> Style {
        match (invalid, focused) {
            (true, _) => Style::default().fg(Self::BAD),
            (false, true) => Style::default().fg(Self::GOOD),
            (false, false) => Self::border(),
        }
    }
}
