use crate::app::state::{AppState, Screen};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.command.is_some();
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let block = Block::default()
        .title(" Command ")
        .title_style(if focused { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(line) = state.command.as_ref() else {
        frame.render_widget(Paragraph::new(key_hints(state.screen)), inner);
        return;
    };

    // Prompt chevron + slash + input text
    let text = Line::from(vec![
        Span::styled("❯ /", Theme::prompt()),
        Span::styled(line.text.as_str(), Theme::input_text()),
    ]);
    frame.render_widget(Paragraph::new(text), inner);

    let prompt_offset = 3u16;
    let cursor_x = inner.x + prompt_offset + line.cursor_column() as u16;
    frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

fn key_hints(screen: Screen) -> Line<'static> {
    let keys: &[(&str, &str)] = match screen {
        Screen::Cart => &[
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Remove"),
            ("s", "Save"),
            ("c", "Clear"),
        ],
        Screen::History => &[("↑↓", "Select"), ("Enter", "Load into cart")],
        Screen::Settings => &[
            ("↑↓", "Field"),
            ("Enter", "Apply"),
            ("Space", "Budget on/off"),
            ("Esc", "Revert"),
        ],
    };
    let mut spans = Vec::new();
    for (key, what) in keys.iter().chain(&[("/", "Command"), ("?", "Help"), ("q", "Quit")]) {
        spans.push(Span::styled(*key, Theme::key_hint()));
        spans.push(Span::styled(format!(" {}  ", what), Theme::dim()));
    }
    Line::from(spans)
}
