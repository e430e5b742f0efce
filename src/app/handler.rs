use crate::app::action::Action;
use crate::app::commands::{self, ParsedCommand};
use crate::app::event::AppEvent;
use crate::app::form::{self, ItemField, ItemForm, SettingsField, TextField};
use crate::app::state::*;
use crate::cart::money::{format_money, format_rate};
use crate::cart::ItemEdit;
use chrono::Local;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{debug, info};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::Tick => {
            state.expire_status(Instant::now());
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    // Help popup closes on any key
    if state.show_help {
        state.show_help = false;
        return vec![];
    }

    // Item form captures all input when open
    if state.item_form.is_some() {
        return handle_item_form_key(state, key);
    }

    // Command line captures all input when open
    if state.command.is_some() {
        return handle_command_line_key(state, key);
    }

    match key.code {
        KeyCode::Tab => {
            state.set_screen(state.screen.next());
            return vec![];
        }
        KeyCode::BackTab => {
            state.set_screen(state.screen.prev());
            return vec![];
        }
        _ => {}
    }

    let handled = match state.screen {
        Screen::Cart => handle_cart_key(state, key),
        Screen::History => handle_history_key(state, key),
        Screen::Settings => handle_settings_key(state, key),
    };
    if let Some(actions) = handled {
        return actions;
    }

    match key.code {
        KeyCode::Char(':') | KeyCode::Char('/') => {
            state.command = Some(TextField::new());
            vec![]
        }
        KeyCode::Char('1') => {
            state.set_screen(Screen::Cart);
            vec![]
        }
        KeyCode::Char('2') => {
            state.set_screen(Screen::History);
            vec![]
        }
        KeyCode::Char('3') => {
            state.set_screen(Screen::Settings);
            vec![]
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            vec![]
        }
        KeyCode::Char('q') => vec![Action::Quit],
        _ => vec![],
    }
}

/// Shared line-editing keys. Returns `false` for keys it does not handle.
fn edit_text(field: &mut TextField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.clear(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert_char(c),
        KeyCode::Backspace => field.delete_back(),
        KeyCode::Delete => field.delete_forward(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.move_home(),
        KeyCode::End => field.move_end(),
        _ => return false,
    }
    true
}

fn handle_cart_key(state: &mut AppState, key: KeyEvent) -> Option<Vec<Action>> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Char('a') => state.item_form = Some(ItemForm::new()),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(item) = state.store.items().get(state.cart_selected) {
                state.item_form = Some(ItemForm::for_item(item));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(item) = state.store.items().get(state.cart_selected) {
                let (id, name) = (item.id, item.name.clone());
                state.store.remove_item(id);
                state.clamp_selection();
                state.info(format!("Removed {}", name));
            }
        }
        KeyCode::Char('s') => return Some(save_cart(state)),
        KeyCode::Char('c') => {
            state.store.clear_cart();
            state.clamp_selection();
            state.info("Cart cleared");
        }
        _ => return None,
    }
    Some(vec![])
}

fn handle_history_key(state: &mut AppState, key: KeyEvent) -> Option<Vec<Action>> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Enter => {
            let index = state.history_selected;
            load_trip(state, index);
        }
        _ => return None,
    }
    Some(vec![])
}

fn handle_settings_key(state: &mut AppState, key: KeyEvent) -> Option<Vec<Action>> {
    let focus = state.settings.focus;
    match key.code {
        KeyCode::Up => {
            state.commit_settings_field();
            state.settings.focus = focus.prev();
        }
        KeyCode::Down => {
            state.commit_settings_field();
            state.settings.focus = focus.next();
        }
        KeyCode::Enter => match focus {
            SettingsField::TaxRate | SettingsField::BudgetAmount => {
                if state.commit_settings_field() {
                    report_settings(state);
                }
            }
            SettingsField::BudgetSwitch => toggle_budget(state),
            SettingsField::ClearCart => {
                state.store.clear_cart();
                state.clamp_selection();
                state.info("Cart cleared");
            }
        },
        KeyCode::Char(' ') if focus == SettingsField::BudgetSwitch => toggle_budget(state),
        KeyCode::Esc if focus.is_text() => state.settings.sync(&state.store),
        // Not valid in a number; leave them to open the command line
        KeyCode::Char(':') | KeyCode::Char('/') => return None,
        _ => {
            let field = state.settings.focused_text()?;
            if !edit_text(field, key) {
                return None;
            }
        }
    }
    Some(vec![])
}

fn toggle_budget(state: &mut AppState) {
    state.settings.toggle_budget(&mut state.store);
    if state.settings.budget_enabled {
        state.settings.focus = SettingsField::BudgetAmount;
    }
    report_settings(state);
}

fn report_settings(state: &mut AppState) {
    let budget = if state.store.budget_enabled() {
        format_money(state.store.budget())
    } else {
        "off".to_string()
    };
    state.info(format!(
        "Tax {}% | budget {}",
        format_rate(state.store.tax_rate()),
        budget
    ));
}

fn handle_item_form_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Some(form) = state.item_form.as_mut() else {
        return vec![];
    };
    match key.code {
        KeyCode::Esc => {
            state.item_form = None;
        }
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Char('+') if form.focus == ItemField::Quantity => form.increment_quantity(),
        KeyCode::Char('-') if form.focus == ItemField::Quantity => form.decrement_quantity(),
        KeyCode::Enter => {
            if let Some(draft) = form.validate() {
                let editing = form.editing;
                let id = draft.apply(&mut state.store, editing);
                state.item_form = None;
                let name = state.store.item(id).map(|i| i.name.clone()).unwrap_or_default();
                if editing.is_some() {
                    state.info(format!("Updated {}", name));
                } else {
                    state.cart_selected = state.store.item_count().saturating_sub(1);
                    state.info(format!("Added {}", name));
                }
            }
        }
        _ => {
            edit_text(form.focused_field(), key);
        }
    }
    vec![]
}

fn handle_command_line_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Some(line) = state.command.as_mut() else {
        return vec![];
    };
    match key.code {
        KeyCode::Esc => {
            state.command = None;
            vec![]
        }
        KeyCode::Enter => {
            let text = line.take_text();
            state.command = None;
            if text.trim().is_empty() {
                return vec![];
            }
            run_command(state, &format!("/{}", text.trim_start_matches(['/', ':'])))
        }
        KeyCode::Backspace if line.text.is_empty() => {
            state.command = None;
            vec![]
        }
        _ => {
            edit_text(line, key);
            vec![]
        }
    }
}

fn save_cart(state: &mut AppState) -> Vec<Action> {
    let today = Local::now().date_naive();
    match state.store.save_current_list(today) {
        Some(trip_id) => {
            state.clamp_selection();
            state.history_selected = 0;
            let total = state.store.history().first().map(|t| t.total).unwrap_or_default();
            info!(%trip_id, %total, "cart saved to history");
            state.info(format!("Saved trip ({})", format_money(total)));
            vec![Action::LogReceipt { trip_id }]
        }
        None => {
            state.error("Cart is empty, nothing to save");
            vec![]
        }
    }
}

fn load_trip(state: &mut AppState, index: usize) {
    let Some(trip) = state.store.history().get(index).cloned() else {
        state.error(format!("No history entry {}", index + 1));
        return;
    };
    state.store.load_shopping_list(&trip);
    state.cart_selected = 0;
    state.set_screen(Screen::Cart);
    state.info(format!("Loaded {} from {}", trip.item_count_label(), trip.date));
}

/// Execute a `/command` line against the store.
pub fn run_command(state: &mut AppState, text: &str) -> Vec<Action> {
    let cmd = match commands::parse_command(text) {
        Ok(cmd) => cmd,
        Err(e) => {
            state.error(e.to_string());
            return vec![];
        }
    };
    debug!(?cmd, "command");

    match cmd {
        ParsedCommand::Add { name, price, quantity } => {
            let name = match form::parse_name(&name) {
                Ok(n) => n,
                Err(e) => {
                    state.error(e.to_string());
                    return vec![];
                }
            };
            let price = match form::parse_price(&price) {
                Ok(p) => p,
                Err(e) => {
                    state.error(e.to_string());
                    return vec![];
                }
            };
            let quantity = form::parse_quantity(quantity.as_deref().unwrap_or("1"));
            state.store.add_item(name.clone(), price, quantity);
            state.cart_selected = state.store.item_count().saturating_sub(1);
            state.info(format!("Added {}", name));
        }
        ParsedCommand::Edit { index, name, price, quantity } => {
            let Some(id) = state.store.items().get(index - 1).map(|i| i.id) else {
                state.error(format!("No item {}", index));
                return vec![];
            };
            let mut edit = ItemEdit::default();
            if let Some(name) = name {
                match form::parse_name(&name) {
                    Ok(n) => edit.name = Some(n),
                    Err(e) => {
                        state.error(e.to_string());
                        return vec![];
                    }
                }
            }
            if let Some(price) = price {
                match form::parse_price(&price) {
                    Ok(p) => edit.price = Some(p),
                    Err(e) => {
                        state.error(e.to_string());
                        return vec![];
                    }
                }
            }
            edit.quantity = quantity.as_deref().map(form::parse_quantity);
            state.store.edit_item(id, edit);
            state.info(format!("Updated item {}", index));
        }
        ParsedCommand::Remove { index } => {
            let Some(id) = state.store.items().get(index - 1).map(|i| i.id) else {
                state.error(format!("No item {}", index));
                return vec![];
            };
            state.store.remove_item(id);
            state.clamp_selection();
            state.info(format!("Removed item {}", index));
        }
        ParsedCommand::Clear => {
            state.store.clear_cart();
            state.clamp_selection();
            state.info("Cart cleared");
        }
        ParsedCommand::Save => return save_cart(state),
        ParsedCommand::Load { index } => load_trip(state, index - 1),
        ParsedCommand::Tax { rate } => match form::parse_tax_rate(&rate) {
            Ok(rate) => {
                state.store.set_tax_rate(rate);
                state.settings.sync(&state.store);
                state.info(format!("Tax rate set to {}%", format_rate(rate)));
            }
            Err(e) => state.error(e.to_string()),
        },
        ParsedCommand::Budget { amount: None } => {
            state.store.set_budget(Decimal::ZERO);
            state.settings.sync(&state.store);
            state.info("Budget off");
        }
        ParsedCommand::Budget { amount: Some(amount) } => match form::parse_budget(&amount) {
            Ok(amount) => {
                state.store.set_budget(amount);
                state.settings.sync(&state.store);
                state.info(format!("Budget set to {}", format_money(amount)));
            }
            Err(e) => state.error(e.to_string()),
        },
        ParsedCommand::Help => state.show_help = true,
        ParsedCommand::Quit => return vec![Action::Quit],
    }
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartStore;
    use crate::config::AppConfig;
    use rust_decimal_macros::dec;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), CartStore::default())
    }

    fn press(state: &mut AppState, code: KeyCode) -> Vec<Action> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_item_through_form() {
        let mut st = state();
        press(&mut st, KeyCode::Char('a'));
        assert!(st.item_form.is_some());
        type_str(&mut st, "Milk");
        press(&mut st, KeyCode::Tab);
        type_str(&mut st, "3.50");
        press(&mut st, KeyCode::Tab);
        press(&mut st, KeyCode::Char('+'));
        press(&mut st, KeyCode::Enter);

        assert!(st.item_form.is_none());
        let item = &st.store.items()[0];
        assert_eq!(item.name, "Milk");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.total, dec!(7.00));
        assert_eq!(st.store.total(), dec!(7.525));
    }

    #[test]
    fn invalid_form_stays_open_with_errors() {
        let mut st = state();
        press(&mut st, KeyCode::Char('a'));
        press(&mut st, KeyCode::Enter);
        let form = st.item_form.as_ref().unwrap();
        assert_eq!(form.name_error, Some(form::InputError::EmptyName));
        assert_eq!(form.price_error, Some(form::InputError::InvalidPrice));
        assert!(st.store.is_empty());
        press(&mut st, KeyCode::Esc);
        assert!(st.item_form.is_none());
    }

    #[test]
    fn edit_and_remove_selected() {
        let mut st = state();
        st.store.add_item("Milk", dec!(3.50), 2);
        st.store.add_item("Bread", dec!(2.00), 1);
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Char('e'));
        {
            let form = st.item_form.as_mut().unwrap();
            form.focus = ItemField::Quantity;
        }
        press(&mut st, KeyCode::Char('+'));
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.store.items()[1].quantity, 2);
        assert_eq!(st.store.items()[1].total, dec!(4.00));

        press(&mut st, KeyCode::Char('d'));
        assert_eq!(st.store.item_count(), 1);
        assert_eq!(st.cart_selected, 0);
    }

    #[test]
    fn save_emits_receipt_action_and_clears() {
        let mut st = state();
        st.store.add_item("Milk", dec!(3.50), 2);
        st.store.add_item("Bread", dec!(2.00), 1);
        let actions = press(&mut st, KeyCode::Char('s'));
        let trip_id = st.store.history()[0].id;
        assert_eq!(actions, vec![Action::LogReceipt { trip_id }]);
        assert!(st.store.is_empty());

        let actions = press(&mut st, KeyCode::Char('s'));
        assert!(actions.is_empty());
        assert_eq!(st.store.history().len(), 1);
        assert_eq!(st.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn load_from_history_screen() {
        let mut st = state();
        st.store.add_item("Milk", dec!(3.50), 2);
        press(&mut st, KeyCode::Char('s'));
        st.store.add_item("Unsaved", dec!(1), 1);

        press(&mut st, KeyCode::Char('2'));
        assert_eq!(st.screen, Screen::History);
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.screen, Screen::Cart);
        assert_eq!(st.store.item_count(), 1);
        assert_eq!(st.store.items()[0].name, "Milk");
    }

    #[test]
    fn settings_tax_entry_commits_and_reverts() {
        let mut st = state();
        press(&mut st, KeyCode::Char('3'));
        for _ in 0..3 {
            press(&mut st, KeyCode::Backspace);
        }
        type_str(&mut st, "10");
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.store.tax_rate(), dec!(10));

        press(&mut st, KeyCode::Char('x'));
        press(&mut st, KeyCode::Down);
        assert_eq!(st.store.tax_rate(), dec!(10));
        assert_eq!(st.settings.tax_rate.text, "10");
        assert_eq!(st.settings.focus, SettingsField::BudgetSwitch);
    }

    #[test]
    fn settings_budget_switch_and_amount() {
        let mut st = state();
        st.store.add_item("Groceries", dec!(15), 1);
        st.store.set_tax_rate(Decimal::ZERO);
        press(&mut st, KeyCode::Char('3'));
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Char(' '));
        assert!(st.settings.budget_enabled);
        assert_eq!(st.settings.focus, SettingsField::BudgetAmount);
        type_str(&mut st, "20");
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.store.budget(), dec!(20));
        assert_eq!(st.store.budget_percentage(), dec!(75));

        press(&mut st, KeyCode::Up);
        press(&mut st, KeyCode::Enter);
        assert!(!st.settings.budget_enabled);
        assert_eq!(st.store.budget(), Decimal::ZERO);
    }

    #[test]
    fn digits_in_settings_field_do_not_switch_screens() {
        let mut st = state();
        press(&mut st, KeyCode::Char('3'));
        press(&mut st, KeyCode::Char('1'));
        assert_eq!(st.screen, Screen::Settings);
        assert_eq!(st.settings.tax_rate.text, "7.51");
    }

    #[test]
    fn command_line_flow() {
        let mut st = state();
        press(&mut st, KeyCode::Char(':'));
        assert!(st.command.is_some());
        type_str(&mut st, "add Milk 3.50 2");
        press(&mut st, KeyCode::Enter);
        assert!(st.command.is_none());
        assert_eq!(st.store.items()[0].total, dec!(7.00));
    }

    #[test]
    fn ctrl_u_clears_command_line() {
        let mut st = state();
        press(&mut st, KeyCode::Char('/'));
        type_str(&mut st, "add Mlik");
        handle_key(&mut st, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(st.command.as_ref().unwrap().text, "");
        press(&mut st, KeyCode::Backspace);
        assert!(st.command.is_none());
    }

    #[test]
    fn commands_mutate_store() {
        let mut st = state();
        run_command(&mut st, "/add Milk 3.50 2");
        run_command(&mut st, "/add Bread 2");
        run_command(&mut st, "/edit 1 qty=3");
        assert_eq!(st.store.items()[0].total, dec!(10.50));
        run_command(&mut st, "/rm 2");
        assert_eq!(st.store.item_count(), 1);
        run_command(&mut st, "/rm 2");
        assert_eq!(st.store.item_count(), 1);
        assert_eq!(st.status.as_ref().unwrap().kind, StatusKind::Error);

        run_command(&mut st, "/tax 10");
        assert_eq!(st.store.tax_rate(), dec!(10));
        assert_eq!(st.settings.tax_rate.text, "10");
        run_command(&mut st, "/tax -1");
        assert_eq!(st.store.tax_rate(), dec!(10));

        run_command(&mut st, "/budget 50");
        assert_eq!(st.store.budget(), dec!(50));
        run_command(&mut st, "/budget off");
        assert_eq!(st.store.budget(), Decimal::ZERO);

        let actions = run_command(&mut st, "/save");
        assert_eq!(actions.len(), 1);
        run_command(&mut st, "/load 1");
        assert_eq!(st.store.item_count(), 1);
        run_command(&mut st, "/clear");
        assert!(st.store.is_empty());
        assert_eq!(run_command(&mut st, "/quit"), vec![Action::Quit]);
    }

    #[test]
    fn command_line_opens_from_settings_text_field() {
        let mut st = state();
        press(&mut st, KeyCode::Char('3'));
        assert_eq!(st.settings.focus, SettingsField::TaxRate);
        press(&mut st, KeyCode::Char('/'));
        assert!(st.command.is_some());
        assert_eq!(st.settings.tax_rate.text, "7.5");
        type_str(&mut st, "tax 9");
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.store.tax_rate(), dec!(9));
        assert_eq!(st.settings.tax_rate.text, "9");
    }

    #[test]
    fn out_of_range_amounts_are_rejected() {
        let mut st = state();
        run_command(&mut st, "/add Caviar 79228162514264337593543950335 2");
        assert!(st.store.is_empty());
        assert_eq!(st.status.as_ref().unwrap().text, "Please enter a valid price");

        run_command(&mut st, "/add Milk 1000 1");
        run_command(&mut st, "/budget 0.0000000000000000000000000001");
        assert_eq!(st.store.budget(), Decimal::ZERO);
        assert_eq!(st.status.as_ref().unwrap().kind, StatusKind::Error);
        assert_eq!(st.store.budget_percentage(), Decimal::ZERO);

        run_command(&mut st, "/tax 1000");
        assert_eq!(st.store.tax_rate(), dec!(7.5));
    }

    #[test]
    fn command_validation_errors_leave_store_alone() {
        let mut st = state();
        run_command(&mut st, "/add Milk free");
        assert!(st.store.is_empty());
        assert_eq!(st.status.as_ref().unwrap().text, "Please enter a valid price");
        run_command(&mut st, "/nope");
        assert_eq!(st.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn quit_keys() {
        let mut st = state();
        assert_eq!(press(&mut st, KeyCode::Char('q')), vec![Action::Quit]);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut st, ctrl_c), vec![Action::Quit]);
    }
}
