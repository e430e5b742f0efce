use crate::app::form::{InputError, ItemField, ItemForm, TextField};
use crate::app::state::AppState;
use crate::ui::layout;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABEL_WIDTH: u16 = 10;

pub fn render(frame: &mut Frame, state: &AppState) {
    let Some(form) = state.item_form.as_ref() else {
        return;
    };

    let popup_area = layout::centered(frame.area(), 56, 13);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height < 9 || inner.width < 24 {
        return;
    }
    let row = |n: u16| Rect::new(inner.x + 1, inner.y + n, inner.width.saturating_sub(2), 1);

    let fields = [
        (ItemField::Name, "Name", &form.name, form.name_error.as_ref()),
        (ItemField::Price, "Price $", &form.price, form.price_error.as_ref()),
        (ItemField::Quantity, "Quantity", &form.quantity, None),
    ];
    for (i, (field, label, text, error)) in fields.into_iter().enumerate() {
        let y = 1 + i as u16 * 2;
        render_field(frame, row(y), label, text, form.focus == field);
        if let Some(err) = error {
            render_error(frame, row(y + 1), err);
        }
    }

    let footer = Line::from(vec![
        Span::styled(" Enter", Theme::key_hint()),
        Span::styled(format!(" {}  ", form.submit_label()), Theme::dim()),
        Span::styled("Tab", Theme::key_hint()),
        Span::styled(" Next  ", Theme::dim()),
        Span::styled("+/-", Theme::key_hint()),
        Span::styled(" Qty  ", Theme::dim()),
        Span::styled("Esc", Theme::key_hint()),
        Span::styled(" Cancel", Theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(footer), row(inner.height - 1));

    let (y, field) = focused(form);
    let r = row(y);
    let x = r.x + LABEL_WIDTH + 2 + field.cursor_column() as u16;
    frame.set_cursor_position((x.min(r.right().saturating_sub(1)), r.y));
}

fn focused(form: &ItemForm) -> (u16, &TextField) {
    match form.focus {
        ItemField::Name => (1, &form.name),
        ItemField::Price => (3, &form.price),
        ItemField::Quantity => (5, &form.quantity),
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, field: &TextField, focused: bool) {
    let marker = if focused { "▸" } else { " " };
    let style = if focused {
        Theme::tab_active()
    } else {
        Theme::input_text()
    };
    let line = Line::from(vec![
        Span::styled(marker, Theme::prompt()),
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH as usize),
            Theme::text(),
        ),
        Span::raw(" "),
        Span::styled(field.text.as_str(), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame, area: Rect, error: &InputError) {
    let indent = " ".repeat(LABEL_WIDTH as usize + 2);
    let line = Line::from(Span::styled(
        format!("{}{}", indent, error),
        Theme::error_message(),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
