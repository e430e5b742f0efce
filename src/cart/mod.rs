//! Cart engine: line items, derived totals, budget tracking and trip history.
//!
//! The store is a plain owned struct with no I/O. Views read from it and call
//! its mutators; input validation happens before anything reaches it.

pub mod model;
pub mod money;
pub mod store;

pub use model::{CartItem, ItemEdit, ItemId, ShoppingTrip, TripId};
pub use store::{BudgetLevel, CartStore};
