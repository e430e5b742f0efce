use crate::app::form::{SettingsField, TextField};
use crate::app::state::AppState;
use crate::cart::money::format_money;
use crate::config;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const LABEL_WIDTH: u16 = 22;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Settings ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &state.settings;
    let focus = form.focus;
    let row = |n: u16| Rect::new(inner.x + 1, inner.y + 1 + n, inner.width.saturating_sub(2), 1);
    if inner.height < 6 {
        return;
    }

    render_text_row(
        frame,
        row(0),
        "Sales tax rate (%)",
        &form.tax_rate,
        focus == SettingsField::TaxRate,
        true,
    );

    let switch = if form.budget_enabled { "[x] on " } else { "[ ] off" };
    render_row(
        frame,
        row(1),
        "Budget limit",
        Span::styled(switch, value_style(focus == SettingsField::BudgetSwitch, true)),
        focus == SettingsField::BudgetSwitch,
    );

    render_text_row(
        frame,
        row(2),
        "Budget amount ($)",
        &form.budget,
        focus == SettingsField::BudgetAmount,
        form.budget_enabled,
    );

    let clear_style = if focus == SettingsField::ClearCart {
        Theme::selected()
    } else {
        Theme::danger_button()
    };
    render_row(
        frame,
        row(4),
        "",
        Span::styled(" Clear All Items ", clear_style),
        focus == SettingsField::ClearCart,
    );

    if inner.height >= 12 {
        let mut info = vec![Line::from(Span::styled("Current values", Theme::title()))];
        let budget = if state.store.budget_enabled() {
            format_money(state.store.budget())
        } else {
            "off".to_string()
        };
        info.push(detail("Budget", budget));
        info.push(detail("Date format", state.config.ui.date_format.clone()));
        let receipts = if state.config.receipts.enabled {
            config::expand_home(&state.config.receipts.dir).display().to_string()
        } else {
            "off".to_string()
        };
        info.push(detail("Receipts", receipts));
        info.push(detail("Config file", config::config_path().display().to_string()));
        let info_area = Rect::new(
            inner.x + 1,
            inner.y + 7,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(7),
        );
        frame.render_widget(Paragraph::new(info), info_area);
    }

    let editing = state.command.is_none() && !state.show_help;
    if editing {
        let cursor_row = match focus {
            SettingsField::TaxRate => Some((0, &form.tax_rate)),
            SettingsField::BudgetAmount if form.budget_enabled => Some((2, &form.budget)),
            _ => None,
        };
        if let Some((n, field)) = cursor_row {
            let r = row(n);
            let x = r.x + LABEL_WIDTH + 3 + field.cursor_column() as u16;
            frame.set_cursor_position((x.min(r.right().saturating_sub(1)), r.y));
        }
    }
}

fn value_style(focused: bool, enabled: bool) -> Style {
    if !enabled {
        Theme::dim()
    } else if focused {
        Theme::tab_active()
    } else {
        Theme::input_text()
    }
}

fn render_text_row(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    field: &TextField,
    focused: bool,
    enabled: bool,
) {
    let value = Span::styled(
        format!("[{}]", field.text),
        value_style(focused, enabled),
    );
    render_row(frame, area, label, value, focused);
}

fn render_row(frame: &mut Frame, area: Rect, label: &str, value: Span, focused: bool) {
    let marker = if focused { "▸" } else { " " };
    let line = Line::from(vec![
        Span::styled(marker, Theme::prompt()),
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH as usize),
            Theme::text(),
        ),
        Span::raw(" "),
        value,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn detail(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), Theme::dim()),
        Span::styled(value, Theme::text()),
    ])
}
