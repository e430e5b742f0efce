use crate::app::state::{AppState, Screen};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .map(|s| Line::from(format!(" {} {} ", s.index() + 1, s.title())))
        .collect();

    let block = Block::default()
        .title(" SmartCart ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let tabs = Tabs::new(titles)
        .block(block)
        .select(state.screen.index())
        .style(Theme::tab_inactive())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled("│", Theme::border()));

    frame.render_widget(tabs, area);
}
