use crate::app::commands::HELP;
use crate::app::state::AppState;
use crate::ui::layout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const KEYS: &[(&str, &str)] = &[
    ("Tab / 1 2 3", "switch screen"),
    ("↑ ↓", "move selection"),
    ("a", "add item"),
    ("e / Enter", "edit item, or load a saved trip"),
    ("d / Del", "remove item"),
    ("s", "save cart to history"),
    ("c", "clear cart"),
    ("Space", "toggle budget (Settings)"),
    (": or /", "command line"),
    ("q / Ctrl+C", "quit"),
];

pub fn render(frame: &mut Frame, state: &AppState) {
    if !state.show_help {
        return;
    }

    let height = (KEYS.len() + HELP.len() + 5) as u16;
    let popup_area = layout::centered(frame.area(), 64, height);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help (any key closes) ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let mut lines = vec![Line::from(Span::styled("Keys", Theme::title()))];
    for (key, what) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", key), Theme::key_hint()),
            Span::styled(*what, Theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Commands", Theme::title())));
    for usage in HELP {
        lines.push(Line::from(Span::styled(format!("  {}", usage), Theme::text())));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}
