use crate::app::state::StatusKind;
use crate::cart::BudgetLevel;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn dim() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn price() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn line_total() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn grand_total() -> Style {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active() -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn error_message() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn danger_button() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn prompt() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn status(kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => Self::status_bar(),
            StatusKind::Error => Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    /// Budget bar colour: green under 75%, yellow up to 100%, red at or over.
    pub fn budget(level: BudgetLevel) -> Style {
        let color = match level {
            BudgetLevel::Under => Color::Green,
            BudgetLevel::Near => Color::Yellow,
            BudgetLevel::Over => Color::Red,
        };
        Style::default().fg(color).bg(Color::Black)
    }
}
