use crate::cart::TripId;

/// Side effects the main loop performs after the handler has updated state.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Append a receipt for a freshly saved trip.
    LogReceipt { trip_id: TripId },
    Quit,
}
