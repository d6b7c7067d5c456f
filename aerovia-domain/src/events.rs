use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the reservation ledger after a transaction commits.
/// Published on an in-process broadcast channel; consumers (availability
/// caches, notification senders) subscribe out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEvent {
    SeatHeld {
        flight_id: Uuid,
        seat_number: String,
        reservation_code: String,
        held_at: i64,
    },
    ReservationConfirmed {
        flight_id: Uuid,
        reservation_code: String,
        ticket_barcode: String,
    },
    ReservationCancelled {
        flight_id: Uuid,
        reservation_code: String,
        refund: i64,
    },
    ReservationExpired {
        flight_id: Uuid,
        reservation_code: String,
        seat_number: String,
    },
}
