use crate::app::state::*;
use crate::cart::money::format_money;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = state
        .status
        .as_ref()
        .map(|s| Theme::status(s.kind))
        .unwrap_or_else(Theme::status_bar);

    let mut parts: Vec<Span> = vec![Span::styled(format!(" {} ", state.status_line()), style)];

    let total = format!(" Total {} ", format_money(state.store.total()));
    let screen = format!(" [{}] ", state.screen.title().to_uppercase());

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + total.width() + screen.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        total,
        Style::default().fg(Color::Green).bg(Color::DarkGray),
    ));
    parts.push(Span::styled(
        screen,
        Style::default().fg(Color::Cyan).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
