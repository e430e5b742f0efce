use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(pub u64);

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trip-{}", self.0)
    }
}

/// One product line in the cart.
///
/// `total` is stored alongside `price` and `quantity` and kept equal to
/// their product by every store mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
}

impl CartItem {
    pub fn new(id: ItemId, name: String, price: Decimal, quantity: u32) -> Self {
        Self {
            id,
            name,
            price,
            quantity,
            total: line_total(price, quantity),
        }
    }

    /// Same line under a different id. Used when copying items out of a trip.
    pub fn with_id(&self, id: ItemId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Whether two lines describe the same purchase, ignoring ids.
    #[cfg(test)]
    pub fn same_line(&self, other: &CartItem) -> bool {
        self.name == other.name
            && self.price == other.price
            && self.quantity == other.quantity
            && self.total == other.total
    }
}

/// `price * quantity`, saturating at `Decimal::MAX`.
pub(crate) fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price
        .checked_mul(Decimal::from(quantity))
        .unwrap_or(Decimal::MAX)
}

/// Partial update for [`CartItem`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

#[cfg(test)]
impl ItemEdit {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn price(price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Default::default()
        }
    }

    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}

impl ItemEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none()
    }

    pub(crate) fn touches_total(&self) -> bool {
        self.price.is_some() || self.quantity.is_some()
    }
}

/// A completed cart captured by `save_current_list`. Never mutated after
/// creation; the store only hands out shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingTrip {
    pub id: TripId,
    /// Display date, formatted when the trip was saved.
    pub date: String,
    pub saved_on: NaiveDate,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    /// Rate `tax` was computed with.
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl ShoppingTrip {
    /// "1 item" / "3 items", as shown in the history list.
    pub fn item_count_label(&self) -> String {
        match self.items.len() {
            1 => "1 item".to_string(),
            n => format!("{} items", n),
        }
    }
}
