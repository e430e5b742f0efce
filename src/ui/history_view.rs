use crate::app::state::AppState;
use crate::cart::money::format_money;
use crate::ui::cart_view::fit;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let history = state.store.history();
    let block = Block::default()
        .title(format!(" Shopping History ({}) ", history.len()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    if history.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No Shopping History", Theme::title())),
            Line::from(Span::styled(
                "Saved carts show up here. Press s on the Cart screen to save one.",
                Theme::dim(),
            )),
        ];
        let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = block.inner(area).width as usize;
    let items: Vec<ListItem> = history
        .iter()
        .map(|trip| {
            let date = fit(&trip.date, 16);
            let count = trip.item_count_label();
            let total = format_money(trip.total);
            let pad = width.saturating_sub(18 + count.width() + total.width() + 3);
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<16}  ", date), Theme::text()),
                Span::styled(count, Theme::dim()),
                Span::raw(" ".repeat(pad)),
                Span::styled(format!("{} ", total), Theme::line_total()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::selected())
        .highlight_symbol("▸");
    let mut list_state = ListState::default().with_selected(Some(state.history_selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
