use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of an aircraft
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftStatus {
    Active,
    Maintenance,
    Retired,
}

/// An aircraft in the fleet. Owns its seats (1:N via `Seat::aircraft_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    pub model: String,
    pub rows: u32,
    pub columns: u32,
    pub capacity: u32,
    pub status: AircraftStatus,
}

impl Aircraft {
    pub fn new(model: String, rows: u32, columns: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            rows,
            columns,
            capacity: rows * columns,
            status: AircraftStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AircraftStatus::Active
    }
}

/// Cabin class of a seat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    Economy,
    Premium,
    First,
}

/// Seat status. The disjoint union with active reservations:
/// AVAILABLE = no active reservation, HELD = one pending, OCCUPIED = one
/// confirmed. MAINTENANCE seats never take reservations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    Occupied,
    Maintenance,
}

/// A single seat on an aircraft. `number` is `"{row}{column_letter}"`,
/// unique per aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub aircraft_id: Uuid,
    pub number: String,
    pub row: u32,
    pub column: String,
    pub class: SeatClass,
    pub status: SeatStatus,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }
}
