use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flight status in the operational lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Completed,
    Cancelled,
}

/// A flight operated by one aircraft between two cities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub aircraft_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub status: FlightStatus,
    /// Base price for an economy seat, in cents
    pub base_price: i64,
}

impl Flight {
    pub fn route(&self) -> String {
        format!("{} -> {}", self.origin, self.destination)
    }

    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }

    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.departure > now
    }

    /// A flight accepts new reservations only while scheduled with a
    /// departure still in the future.
    pub fn is_bookable(&self, now: DateTime<Utc>) -> bool {
        self.status == FlightStatus::Scheduled && self.is_future(now)
    }

    pub fn has_departed(&self, now: DateTime<Utc>) -> bool {
        self.departure <= now
    }
}
