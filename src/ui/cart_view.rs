use crate::app::state::AppState;
use crate::cart::money::{format_money, format_percent, format_rate};
use crate::cart::CartStore;
use crate::ui::layout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let store = &state.store;
    let cart_layout = layout::cart_layout(area, store.budget_enabled());

    if let Some(budget_area) = cart_layout.budget {
        render_budget(frame, budget_area, store);
    }
    render_items(frame, cart_layout.items, state);
    render_totals(frame, cart_layout.totals, store);
}

fn render_budget(frame: &mut Frame, area: Rect, store: &CartStore) {
    let block = Block::default()
        .title(format!(" Budget: {} ", format_money(store.budget())))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let pct = store.budget_percentage();
    let ratio = (pct / Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Theme::budget(store.budget_level()))
        .ratio(ratio)
        .label(format_percent(pct));
    frame.render_widget(gauge, Rect::new(inner.x, inner.y, inner.width, 1));

    if inner.height > 1 {
        let line = Line::from(vec![
            Span::styled(format!("Spent: {}", format_money(store.total())), Theme::text()),
            Span::styled("   ", Theme::dim()),
            Span::styled(
                format!("Remaining: {}", format_money(store.budget_remaining())),
                Theme::dim(),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }
}

fn render_items(frame: &mut Frame, area: Rect, state: &AppState) {
    let store = &state.store;
    let block = Block::default()
        .title(format!(" Cart ({}) ", store.item_count()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    if store.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Your cart is empty", Theme::title())),
            Line::from(Span::styled("Press a or type /add <name> <price> [qty]", Theme::dim())),
        ];
        let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = block.inner(area).width as usize;
    let items: Vec<ListItem> = store
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let detail = format!("{} × {}", format_money(item.price), item.quantity);
            let total = format_money(item.total);
            let number = format!("{:>2}. ", i + 1);
            let right = detail.width() + total.width() + 4;
            let name_w = width.saturating_sub(number.width() + right).max(4);
            let name = fit(&item.name, name_w);
            let pad = name_w.saturating_sub(name.width());
            ListItem::new(Line::from(vec![
                Span::styled(number, Theme::dim()),
                Span::styled(name, Theme::text()),
                Span::raw(" ".repeat(pad + 2)),
                Span::styled(detail, Theme::price()),
                Span::raw("  "),
                Span::styled(total, Theme::line_total()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(Theme::selected());
    let mut list_state = ListState::default().with_selected(Some(state.cart_selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_totals(frame: &mut Frame, area: Rect, store: &CartStore) {
    let block = Block::default()
        .title(" Total ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if store.is_empty() {
        let paragraph = Paragraph::new(Span::styled("Add items to see total", Theme::dim()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = block.inner(area).width as usize;
    let lines = vec![
        summary_line("Subtotal:", format_money(store.subtotal()), width, Theme::text()),
        summary_line(
            &format!("Tax ({}%):", format_rate(store.tax_rate())),
            format_money(store.tax()),
            width,
            Theme::text(),
        ),
        summary_line("Total:", format_money(store.total()), width, Theme::grand_total()),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn summary_line(label: &str, value: String, width: usize, style: Style) -> Line<'static> {
    let pad = width.saturating_sub(label.width() + value.width() + 2);
    Line::from(vec![
        Span::styled(format!(" {}", label), style),
        Span::raw(" ".repeat(pad)),
        Span::styled(format!("{} ", value), style),
    ])
}

/// Truncate to `max` display columns, marking the cut with `…`.
pub(crate) fn fit(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
