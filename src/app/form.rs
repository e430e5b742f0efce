//! Form state and input validation.
//!
//! The cart store trusts its callers, so everything typed by the user is
//! parsed and checked here first. Field errors carry the message shown next
//! to the offending field.

use crate::cart::money::format_rate;
use crate::cart::store::{MAX_AMOUNT, MIN_BUDGET};
use crate::cart::{CartItem, CartStore, ItemEdit, ItemId};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Item name is required")]
    EmptyName,
    #[error("Please enter a valid price")]
    InvalidPrice,
    #[error("Tax rate must be a number from 0 to 100")]
    InvalidTaxRate,
    #[error("Budget must be between $0.01 and $1000000000")]
    InvalidBudget,
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let text = text.strip_prefix('$').unwrap_or(text);
    Decimal::from_str(text).ok()
}

pub fn parse_name(text: &str) -> Result<String, InputError> {
    let name = text.trim();
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    Ok(name.to_string())
}

pub fn parse_price(text: &str) -> Result<Decimal, InputError> {
    match parse_amount(text) {
        Some(p) if p > Decimal::ZERO && p <= MAX_AMOUNT => Ok(p),
        _ => Err(InputError::InvalidPrice),
    }
}

/// Whole number of at least 1; anything else counts as 1.
pub fn parse_quantity(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(q) if q >= 1 => q,
        _ => 1,
    }
}

pub fn parse_tax_rate(text: &str) -> Result<Decimal, InputError> {
    let text = text.trim();
    let text = text.strip_suffix('%').unwrap_or(text);
    match Decimal::from_str(text.trim()) {
        Ok(r) if r >= Decimal::ZERO && r <= Decimal::ONE_HUNDRED => Ok(r),
        _ => Err(InputError::InvalidTaxRate),
    }
}

pub fn parse_budget(text: &str) -> Result<Decimal, InputError> {
    match parse_amount(text) {
        Some(b) if b >= MIN_BUDGET && b <= MAX_AMOUNT => Ok(b),
        _ => Err(InputError::InvalidBudget),
    }
}

/// Single-line text editor with a byte-offset cursor.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        self.cursor = 0;
        text
    }

    /// Display column of the cursor, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(&self.text[..self.cursor])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Price,
    Quantity,
}

impl ItemField {
    pub fn next(self) -> Self {
        match self {
            ItemField::Name => ItemField::Price,
            ItemField::Price => ItemField::Quantity,
            ItemField::Quantity => ItemField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ItemField::Name => ItemField::Quantity,
            ItemField::Price => ItemField::Name,
            ItemField::Quantity => ItemField::Price,
        }
    }
}

/// A validated item ready to hand to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl ItemDraft {
    pub fn into_edit(self) -> ItemEdit {
        ItemEdit {
            name: Some(self.name),
            price: Some(self.price),
            quantity: Some(self.quantity),
        }
    }

    /// Add this draft as a new line, or overwrite `editing` if set.
    pub fn apply(self, store: &mut CartStore, editing: Option<ItemId>) -> ItemId {
        match editing {
            Some(id) => {
                store.edit_item(id, self.into_edit());
                id
            }
            None => store.add_item(self.name, self.price, self.quantity),
        }
    }
}

/// The add/edit item popup.
#[derive(Debug, Clone)]
pub struct ItemForm {
    pub editing: Option<ItemId>,
    pub name: TextField,
    pub price: TextField,
    pub quantity: TextField,
    pub focus: ItemField,
    pub name_error: Option<InputError>,
    pub price_error: Option<InputError>,
}

impl ItemForm {
    pub fn new() -> Self {
        Self {
            editing: None,
            name: TextField::new(),
            price: TextField::new(),
            quantity: TextField::with_text("1"),
            focus: ItemField::Name,
            name_error: None,
            price_error: None,
        }
    }

    /// Form pre-filled from an existing line.
    pub fn for_item(item: &CartItem) -> Self {
        Self {
            editing: Some(item.id),
            name: TextField::with_text(item.name.clone()),
            price: TextField::with_text(item.price.normalize().to_string()),
            quantity: TextField::with_text(item.quantity.to_string()),
            ..Self::new()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Item"
        } else {
            "Add New Item"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Update Item"
        } else {
            "Add to Cart"
        }
    }

    pub fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            ItemField::Name => &mut self.name,
            ItemField::Price => &mut self.price,
            ItemField::Quantity => &mut self.quantity,
        }
    }

    pub fn increment_quantity(&mut self) {
        let current = self.quantity.text.trim().parse::<u32>().unwrap_or(0);
        self.quantity.set(current.saturating_add(1).to_string());
    }

    pub fn decrement_quantity(&mut self) {
        let current = self.quantity.text.trim().parse::<u32>().unwrap_or(0);
        if current > 1 {
            self.quantity.set((current - 1).to_string());
        }
    }

    /// Check every field, recording a message per failing field.
    pub fn validate(&mut self) -> Option<ItemDraft> {
        let name = parse_name(&self.name.text);
        let price = parse_price(&self.price.text);
        self.name_error = name.as_ref().err().cloned();
        self.price_error = price.as_ref().err().cloned();
        Some(ItemDraft {
            name: name.ok()?,
            price: price.ok()?,
            quantity: parse_quantity(&self.quantity.text),
        })
    }
}

impl Default for ItemForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    TaxRate,
    BudgetSwitch,
    BudgetAmount,
    ClearCart,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::TaxRate => SettingsField::BudgetSwitch,
            SettingsField::BudgetSwitch => SettingsField::BudgetAmount,
            SettingsField::BudgetAmount => SettingsField::ClearCart,
            SettingsField::ClearCart => SettingsField::TaxRate,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::TaxRate => SettingsField::ClearCart,
            SettingsField::BudgetSwitch => SettingsField::TaxRate,
            SettingsField::BudgetAmount => SettingsField::BudgetSwitch,
            SettingsField::ClearCart => SettingsField::BudgetAmount,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, SettingsField::TaxRate | SettingsField::BudgetAmount)
    }
}

/// Editable copies of the tax rate and budget. Invalid entries are not
/// reported as errors: the field reverts to the value the store holds.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub tax_rate: TextField,
    pub budget: TextField,
    pub budget_enabled: bool,
    pub focus: SettingsField,
}

fn budget_text(budget: Decimal) -> String {
    if budget > Decimal::ZERO {
        budget.normalize().to_string()
    } else {
        String::new()
    }
}

impl SettingsForm {
    pub fn from_store(store: &CartStore) -> Self {
        Self {
            tax_rate: TextField::with_text(format_rate(store.tax_rate())),
            budget: TextField::with_text(budget_text(store.budget())),
            budget_enabled: store.budget_enabled(),
            focus: SettingsField::TaxRate,
        }
    }

    /// Re-read values from the store, e.g. after a command changed them.
    pub fn sync(&mut self, store: &CartStore) {
        let focus = self.focus;
        *self = Self::from_store(store);
        self.focus = focus;
    }

    /// Apply the typed tax rate, or revert the text on invalid input.
    pub fn commit_tax_rate(&mut self, store: &mut CartStore) -> Result<(), InputError> {
        match parse_tax_rate(&self.tax_rate.text) {
            Ok(rate) => {
                store.set_tax_rate(rate);
                Ok(())
            }
            Err(e) => {
                self.tax_rate.set(format_rate(store.tax_rate()));
                Err(e)
            }
        }
    }

    /// Apply the typed budget. While disabled this always clears the budget.
    pub fn commit_budget(&mut self, store: &mut CartStore) -> Result<(), InputError> {
        if !self.budget_enabled {
            store.set_budget(Decimal::ZERO);
            return Ok(());
        }
        match parse_budget(&self.budget.text) {
            Ok(amount) => {
                store.set_budget(amount);
                Ok(())
            }
            Err(e) => {
                let current = store.budget();
                self.budget.set(if current > Decimal::ZERO {
                    current.normalize().to_string()
                } else {
                    "0".to_string()
                });
                self.budget_enabled = current > Decimal::ZERO;
                Err(e)
            }
        }
    }

    pub fn toggle_budget(&mut self, store: &mut CartStore) {
        self.budget_enabled = !self.budget_enabled;
        if !self.budget_enabled {
            store.set_budget(Decimal::ZERO);
        } else if let Ok(amount) = parse_budget(&self.budget.text) {
            store.set_budget(amount);
        }
    }

    pub fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.focus {
            SettingsField::TaxRate => Some(&mut self.tax_rate),
            SettingsField::BudgetAmount if self.budget_enabled => Some(&mut self.budget),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn text_field_editing() {
        let mut f = TextField::new();
        for c in "héllo".chars() {
            f.insert_char(c);
        }
        f.move_left();
        f.delete_back();
        assert_eq!(f.text, "hélo");
        f.move_home();
        f.delete_forward();
        assert_eq!(f.text, "élo");
        f.move_end();
        assert_eq!(f.cursor, f.text.len());
        assert_eq!(f.cursor_column(), 3);
        assert_eq!(f.take_text(), "élo");
        assert!(f.text.is_empty());
    }

    #[test]
    fn price_validation() {
        assert_eq!(parse_price("3.50"), Ok(dec!(3.50)));
        assert_eq!(parse_price(" $2 "), Ok(dec!(2)));
        assert_eq!(parse_price(""), Err(InputError::InvalidPrice));
        assert_eq!(parse_price("abc"), Err(InputError::InvalidPrice));
        assert_eq!(parse_price("0"), Err(InputError::InvalidPrice));
        assert_eq!(parse_price("-1"), Err(InputError::InvalidPrice));
        assert_eq!(parse_price("1000000000"), Ok(MAX_AMOUNT));
        assert_eq!(parse_price("1000000000.01"), Err(InputError::InvalidPrice));
        assert_eq!(
            parse_price("79228162514264337593543950335"),
            Err(InputError::InvalidPrice)
        );
    }

    #[test]
    fn budget_and_tax_rate_bounds() {
        assert_eq!(parse_budget("0.01"), Ok(dec!(0.01)));
        assert_eq!(parse_budget("0.009"), Err(InputError::InvalidBudget));
        assert_eq!(
            parse_budget("0.0000000000000000000000000001"),
            Err(InputError::InvalidBudget)
        );
        assert_eq!(parse_budget("1000000001"), Err(InputError::InvalidBudget));
        assert_eq!(parse_tax_rate("100%"), Ok(dec!(100)));
        assert_eq!(parse_tax_rate("100.5"), Err(InputError::InvalidTaxRate));
    }

    #[test]
    fn quantity_falls_back_to_one() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("x"), 1);
        assert_eq!(parse_quantity(""), 1);
    }

    #[test]
    fn item_form_reports_each_field() {
        let mut form = ItemForm::new();
        form.name.set("   ");
        form.price.set("free");
        assert!(form.validate().is_none());
        assert_eq!(form.name_error, Some(InputError::EmptyName));
        assert_eq!(form.price_error, Some(InputError::InvalidPrice));
        assert_eq!(form.name_error.clone().unwrap().to_string(), "Item name is required");

        form.name.set("  Milk ");
        form.price.set("3.50");
        let draft = form.validate().unwrap();
        assert_eq!(draft, ItemDraft { name: "Milk".into(), price: dec!(3.50), quantity: 1 });
        assert!(form.name_error.is_none() && form.price_error.is_none());
    }

    #[test]
    fn quantity_stepper_never_below_one() {
        let mut form = ItemForm::new();
        form.decrement_quantity();
        assert_eq!(form.quantity.text, "1");
        form.increment_quantity();
        form.increment_quantity();
        assert_eq!(form.quantity.text, "3");
        form.quantity.set("junk");
        form.increment_quantity();
        assert_eq!(form.quantity.text, "1");
    }

    #[test]
    fn edit_form_prefills_and_applies() {
        let mut store = CartStore::default();
        let id = store.add_item("Milk", dec!(3.50), 2);
        let mut form = ItemForm::for_item(store.item(id).unwrap());
        assert_eq!(form.title(), "Edit Item");
        assert_eq!(form.price.text, "3.5");
        assert_eq!(form.quantity.text, "2");

        form.quantity.set("4");
        let draft = form.validate().unwrap();
        draft.apply(&mut store, form.editing);
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.item(id).unwrap().total, dec!(14.00));
    }

    #[test]
    fn invalid_tax_rate_reverts() {
        let mut store = CartStore::default();
        let mut form = SettingsForm::from_store(&store);
        assert_eq!(form.tax_rate.text, "7.5");

        form.tax_rate.set("-2");
        assert_eq!(form.commit_tax_rate(&mut store), Err(InputError::InvalidTaxRate));
        assert_eq!(form.tax_rate.text, "7.5");
        assert_eq!(store.tax_rate(), dec!(7.5));

        form.tax_rate.set("8.25%");
        assert!(form.commit_tax_rate(&mut store).is_ok());
        assert_eq!(store.tax_rate(), dec!(8.25));

        form.tax_rate.set("0");
        assert!(form.commit_tax_rate(&mut store).is_ok());
        assert_eq!(store.tax_rate(), Decimal::ZERO);
    }

    #[test]
    fn invalid_budget_reverts_and_switch_follows_store() {
        let mut store = CartStore::default();
        let mut form = SettingsForm::from_store(&store);
        assert!(!form.budget_enabled);

        form.toggle_budget(&mut store);
        assert!(form.budget_enabled);
        assert_eq!(store.budget(), Decimal::ZERO);

        form.budget.set("nope");
        assert_eq!(form.commit_budget(&mut store), Err(InputError::InvalidBudget));
        assert_eq!(form.budget.text, "0");
        assert!(!form.budget_enabled);

        form.toggle_budget(&mut store);
        form.budget.set("50");
        assert!(form.commit_budget(&mut store).is_ok());
        assert_eq!(store.budget(), dec!(50));

        form.budget.set("-3");
        assert!(form.commit_budget(&mut store).is_err());
        assert_eq!(form.budget.text, "50");
        assert!(form.budget_enabled);
        assert_eq!(store.budget(), dec!(50));
    }

    #[test]
    fn toggling_budget_off_and_on() {
        let mut store = CartStore::default();
        store.set_budget(dec!(30));
        let mut form = SettingsForm::from_store(&store);
        assert!(form.budget_enabled);

        form.toggle_budget(&mut store);
        assert_eq!(store.budget(), Decimal::ZERO);
        assert_eq!(form.budget.text, "30");

        form.toggle_budget(&mut store);
        assert_eq!(store.budget(), dec!(30));
    }
}
