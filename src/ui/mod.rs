mod cart_view;
mod help_popup;
mod history_view;
mod input_box;
mod item_form;
mod layout;
mod settings_view;
mod status_bar;
mod tabs;
mod theme;

use crate::app::state::{AppState, Screen};
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    tabs::render(frame, app_layout.tabs, state);
    match state.screen {
        Screen::Cart => cart_view::render(frame, app_layout.content, state),
        Screen::History => history_view::render(frame, app_layout.content, state),
        Screen::Settings => settings_view::render(frame, app_layout.content, state),
    }
    input_box::render(frame, app_layout.input_box, state);
    status_bar::render(frame, app_layout.status_bar, state);

    // Popups draw last so they sit on top
    item_form::render(frame, state);
    help_popup::render(frame, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::ItemForm;
    use crate::cart::CartStore;
    use crate::config::AppConfig;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use rust_decimal_macros::dec;

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state() -> AppState {
        AppState::new(AppConfig::default(), CartStore::default())
    }

    #[test]
    fn empty_cart_shows_placeholders() {
        let screen = draw(&state());
        assert!(screen.contains("Your cart is empty"));
        assert!(screen.contains("Add items to see total"));
        assert!(!screen.contains("Budget:"));
    }

    #[test]
    fn cart_lists_items_and_totals() {
        let mut st = state();
        st.store.add_item("Milk", dec!(3.50), 2);
        st.store.set_budget(dec!(20));
        let screen = draw(&st);
        assert!(screen.contains("Milk"));
        assert!(screen.contains("$3.50 × 2"));
        assert!(screen.contains("Subtotal:"));
        assert!(screen.contains("Tax (7.5%):"));
        assert!(screen.contains("$7.53"));
        assert!(screen.contains("Budget: $20.00"));
        assert!(screen.contains("38%"));
    }

    #[test]
    fn history_screen_lists_trips() {
        let mut st = state();
        st.set_screen(Screen::History);
        assert!(draw(&st).contains("No Shopping History"));

        st.store.add_item("Milk", dec!(3.50), 2);
        st.store.save_current_list(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        let screen = draw(&st);
        assert!(screen.contains("Mar 4, 2025"));
        assert!(screen.contains("1 item"));
        assert!(screen.contains("$7.53"));
    }

    #[test]
    fn settings_and_form_popup_render() {
        let mut st = state();
        st.set_screen(Screen::Settings);
        let screen = draw(&st);
        assert!(screen.contains("Sales tax rate"));
        assert!(screen.contains("[7.5]"));
        assert!(screen.contains("Clear All Items"));

        st.set_screen(Screen::Cart);
        let mut form = ItemForm::new();
        form.validate();
        st.item_form = Some(form);
        let screen = draw(&st);
        assert!(screen.contains("Add New Item"));
        assert!(screen.contains("Item name is required"));
        assert!(screen.contains("Add to Cart"));
    }
}
