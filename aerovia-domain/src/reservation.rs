use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reservation status in the lifecycle.
///
/// PENDING -> {CONFIRMED, CANCELLED, EXPIRED}; CONFIRMED -> {CANCELLED,
/// COMPLETED}. Everything else is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Expired,
}

/// A reservation ties a passenger to one seat on one flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_id: Uuid,
    /// 8 uppercase alphanumeric characters, globally unique
    pub code: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    /// Deadline for confirming a pending reservation
    pub expires_at: DateTime<Utc>,
    /// Final price in cents
    pub price: i64,
    pub notes: Option<String>,
}

impl Reservation {
    /// Active reservations occupy the seat-uniqueness invariants.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Ticket status: ISSUED -> {USED, CANCELLED, LOST}, all terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Issued,
    Used,
    Cancelled,
    Lost,
}

/// An immutable boarding document derived from a confirmed reservation.
/// One-to-one with its reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub reservation_id: Uuid,
    /// `BOL` + 12 uppercase hex characters
    pub barcode: String,
    pub issued_at: DateTime<Utc>,
    pub status: TicketStatus,
    pub boarding_gate: String,
    pub boarding_time: Option<NaiveTime>,
}

impl Ticket {
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Issued
    }
}
