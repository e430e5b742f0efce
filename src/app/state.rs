use crate::app::form::{ItemForm, SettingsForm, TextField};
use crate::cart::CartStore;
use crate::config::AppConfig;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Cart,
    History,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Cart, Screen::History, Screen::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Cart => "Cart",
            Screen::History => "History",
            Screen::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Screen::Cart => 0,
            Screen::History => 1,
            Screen::Settings => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub set_at: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub store: CartStore,
    pub screen: Screen,
    pub cart_selected: usize,
    pub history_selected: usize,
    pub item_form: Option<ItemForm>,
    pub settings: SettingsForm,
    pub command: Option<TextField>,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub dirty: bool,
    pub rendered_revision: u64,
}

impl AppState {
    pub fn new(config: AppConfig, store: CartStore) -> Self {
        let settings = SettingsForm::from_store(&store);
        Self {
            config,
            store,
            screen: Screen::Cart,
            cart_selected: 0,
            history_selected: 0,
            item_form: None,
            settings,
            command: None,
            show_help: false,
            status: None,
            should_quit: false,
            dirty: true,
            rendered_revision: 0,
        }
    }

    /// Whether the UI needs drawing: something flagged it or the store changed
    /// since the last frame.
    pub fn needs_render(&self) -> bool {
        self.dirty || self.store.revision() != self.rendered_revision
    }

    pub fn mark_rendered(&mut self) {
        self.dirty = false;
        self.rendered_revision = self.store.revision();
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_status(text.into(), StatusKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_status(text.into(), StatusKind::Error);
    }

    fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text,
            kind,
            set_at: Instant::now(),
        });
        self.dirty = true;
    }

    pub fn expire_status(&mut self, now: Instant) {
        if let Some(ref s) = self.status {
            if now.duration_since(s.set_at) >= STATUS_TTL {
                self.status = None;
                self.dirty = true;
            }
        }
    }

    /// Switch screens. Leaving Settings commits the field being edited, the
    /// same as moving focus away from it.
    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        if self.screen == Screen::Settings {
            self.commit_settings_field();
        }
        if screen == Screen::Settings {
            self.settings.sync(&self.store);
        }
        self.screen = screen;
        self.dirty = true;
    }

    /// Commit the focused settings text field. Returns `false` when the
    /// input was invalid and the field reverted.
    pub fn commit_settings_field(&mut self) -> bool {
        use crate::app::form::SettingsField;
        let result = match self.settings.focus {
            SettingsField::TaxRate => self.settings.commit_tax_rate(&mut self.store),
            SettingsField::BudgetAmount if self.settings.budget_enabled => {
                self.settings.commit_budget(&mut self.store)
            }
            _ => return true,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                self.error(format!("{} (reverted)", e));
                false
            }
        }
    }

    pub fn clamp_selection(&mut self) {
        let items = self.store.item_count();
        self.cart_selected = self.cart_selected.min(items.saturating_sub(1));
        let trips = self.store.history().len();
        self.history_selected = self.history_selected.min(trips.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let (selected, len) = match self.screen {
            Screen::Cart => (&mut self.cart_selected, self.store.item_count()),
            Screen::History => (&mut self.history_selected, self.store.history().len()),
            Screen::Settings => return,
        };
        if len > 0 && *selected + 1 < len {
            *selected += 1;
        }
        self.dirty = true;
    }

    pub fn select_prev(&mut self) {
        let selected = match self.screen {
            Screen::Cart => &mut self.cart_selected,
            Screen::History => &mut self.history_selected,
            Screen::Settings => return,
        };
        *selected = selected.saturating_sub(1);
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status {
            return msg.text.clone();
        }
        let count = self.store.item_count();
        let mut s = format!(
            "{} {} | {} saved trip{}",
            count,
            if count == 1 { "item" } else { "items" },
            self.store.history().len(),
            if self.store.history().len() == 1 { "" } else { "s" }
        );
        if self.store.budget_enabled() {
            s.push_str(&format!(
                " | budget {}",
                crate::cart::money::format_percent(self.store.budget_percentage())
            ));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), CartStore::default())
    }

    #[test]
    fn screens_cycle() {
        assert_eq!(Screen::Cart.next(), Screen::History);
        assert_eq!(Screen::Settings.next(), Screen::Cart);
        assert_eq!(Screen::Cart.prev(), Screen::Settings);
    }

    #[test]
    fn leaving_settings_commits_field() {
        let mut st = state();
        st.set_screen(Screen::Settings);
        st.settings.tax_rate.set("5");
        st.set_screen(Screen::Cart);
        assert_eq!(st.store.tax_rate(), dec!(5));

        st.set_screen(Screen::Settings);
        st.settings.tax_rate.set("abc");
        st.set_screen(Screen::History);
        assert_eq!(st.store.tax_rate(), dec!(5));
        assert_eq!(st.settings.tax_rate.text, "5");
        assert_eq!(st.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut st = state();
        st.store.add_item("A", dec!(1), 1);
        st.store.add_item("B", dec!(1), 1);
        st.select_next();
        st.select_next();
        assert_eq!(st.cart_selected, 1);
        st.store.clear_cart();
        st.clamp_selection();
        assert_eq!(st.cart_selected, 0);
        st.select_prev();
        assert_eq!(st.cart_selected, 0);
    }

    #[test]
    fn render_tracks_store_revision() {
        let mut st = state();
        assert!(st.needs_render());
        st.mark_rendered();
        assert!(!st.needs_render());
        st.store.add_item("A", dec!(1), 1);
        assert!(st.needs_render());
    }

    #[test]
    fn status_expires() {
        let mut st = state();
        st.info("hello");
        let set_at = st.status.as_ref().unwrap().set_at;
        st.expire_status(set_at + Duration::from_secs(1));
        assert!(st.status.is_some());
        st.expire_status(set_at + STATUS_TTL);
        assert!(st.status.is_none());
        assert_eq!(st.status_line(), "0 items | 0 saved trips");
    }
}
