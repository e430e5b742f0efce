use super::model::{line_total, CartItem, ItemEdit, ItemId, ShoppingTrip, TripId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Write;
use tracing::debug;

/// Date format used for trip records unless configured otherwise ("Mar 4, 2025").
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Tax rate applied to a fresh store, in percent.
pub fn default_tax_rate() -> Decimal {
    Decimal::new(75, 1)
}

/// Largest price or budget accepted from user input or config.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Smallest positive budget accepted from user input or config.
pub const MIN_BUDGET: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How close the cart total is to the budget. Drives the budget bar colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Under,
    Near,
    Over,
}

/// In-memory cart state and the values derived from it.
///
/// Items keep insertion order. History is newest first. Subtotal, tax and
/// total are never cached; every read recomputes them from `items` and
/// `tax_rate`. Unknown ids are ignored by every mutator.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    tax_rate: Decimal,
    budget: Decimal,
    history: Vec<ShoppingTrip>,
    date_format: String,
    next_item_id: u64,
    next_trip_id: u64,
    revision: u64,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(default_tax_rate(), Decimal::ZERO, DEFAULT_DATE_FORMAT)
    }
}

impl CartStore {
    pub fn new(tax_rate: Decimal, budget: Decimal, date_format: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            tax_rate,
            budget,
            history: Vec::new(),
            date_format: date_format.into(),
            next_item_id: 1,
            next_trip_id: 1,
            revision: 0,
        }
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    fn allocate_trip_id(&mut self) -> TripId {
        let id = TripId(self.next_trip_id);
        self.next_trip_id += 1;
        id
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ---- reads ----

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn budget_enabled(&self) -> bool {
        self.budget > Decimal::ZERO
    }

    pub fn history(&self) -> &[ShoppingTrip] {
        &self.history
    }

    pub fn trip(&self, id: TripId) -> Option<&ShoppingTrip> {
        self.history.iter().find(|t| t.id == id)
    }

    /// Bumped on every state change. Views compare it against the value they
    /// last rendered to decide whether to redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Derived amounts saturate at `Decimal::MAX` instead of overflowing.

    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.total))
            .unwrap_or(Decimal::MAX)
    }

    pub fn tax(&self) -> Decimal {
        let rate = self.tax_rate / Decimal::ONE_HUNDRED;
        self.subtotal().checked_mul(rate).unwrap_or(Decimal::MAX)
    }

    pub fn total(&self) -> Decimal {
        self.subtotal()
            .checked_add(self.tax())
            .unwrap_or(Decimal::MAX)
    }

    /// Share of the budget spent, clamped to 100. Zero when no budget is set.
    pub fn budget_percentage(&self) -> Decimal {
        if self.budget <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.total()
            .checked_div(self.budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |pct| pct.min(Decimal::ONE_HUNDRED))
    }

    pub fn budget_remaining(&self) -> Decimal {
        (self.budget - self.total()).max(Decimal::ZERO)
    }

    pub fn budget_level(&self) -> BudgetLevel {
        let pct = self.budget_percentage();
        if pct < Decimal::from(75) {
            BudgetLevel::Under
        } else if pct < Decimal::ONE_HUNDRED {
            BudgetLevel::Near
        } else {
            BudgetLevel::Over
        }
    }

    // ---- mutations ----

    pub fn add_item(&mut self, name: impl Into<String>, price: Decimal, quantity: u32) -> ItemId {
        let id = self.allocate_item_id();
        let item = CartItem::new(id, name.into(), price, quantity);
        debug!(%id, name = %item.name, %price, quantity, "item added");
        self.items.push(item);
        self.touch();
        id
    }

    pub fn edit_item(&mut self, id: ItemId, edit: ItemEdit) {
        if edit.is_empty() {
            return;
        }
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            debug!(%id, "edit ignored: no such item");
            return;
        };
        let recompute = edit.touches_total();
        if let Some(name) = edit.name {
            item.name = name;
        }
        if let Some(price) = edit.price {
            item.price = price;
        }
        if let Some(quantity) = edit.quantity {
            item.quantity = quantity;
        }
        if recompute {
            item.total = line_total(item.price, item.quantity);
        }
        debug!(%id, total = %item.total, "item edited");
        self.touch();
    }

    pub fn remove_item(&mut self, id: ItemId) {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() != before {
            debug!(%id, "item removed");
            self.touch();
        }
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn set_tax_rate(&mut self, rate: Decimal) {
        self.tax_rate = rate;
        debug!(%rate, "tax rate set");
        self.touch();
    }

    pub fn set_budget(&mut self, amount: Decimal) {
        self.budget = amount;
        debug!(%amount, "budget set");
        self.touch();
    }

    /// Snapshot the cart into history and empty it. Returns `None` without
    /// touching anything when the cart is empty.
    pub fn save_current_list(&mut self, today: NaiveDate) -> Option<TripId> {
        if self.items.is_empty() {
            return None;
        }
        let id = self.allocate_trip_id();
        let trip = ShoppingTrip {
            id,
            date: self.format_date(today),
            saved_on: today,
            items: self.items.clone(),
            subtotal: self.subtotal(),
            tax_rate: self.tax_rate,
            tax: self.tax(),
            total: self.total(),
        };
        debug!(%id, date = %trip.date, items = trip.items.len(), total = %trip.total, "trip saved");
        self.history.insert(0, trip);
        self.clear_cart();
        Some(id)
    }

    /// Replace the cart with a copy of `trip`'s items. Copied lines get fresh
    /// ids; the trip itself stays as it was.
    pub fn load_shopping_list(&mut self, trip: &ShoppingTrip) {
        let mut items = Vec::with_capacity(trip.items.len());
        for item in &trip.items {
            let id = self.allocate_item_id();
            items.push(item.with_id(id));
        }
        self.items = items;
        debug!(trip = %trip.id, items = self.items.len(), "trip loaded into cart");
        self.touch();
    }

    fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}
