use aerovia_core::{Error, Result};
use aerovia_domain::FlightStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for scheduling a new flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlight {
    pub aircraft_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Economy base price in cents
    pub base_price: i64,
}

/// Validate flight data before it touches the store. Aircraft-level checks
/// (active status, same-day double booking) belong to the service, which
/// can see the rest of the catalog.
pub fn validate_new_flight(flight: &NewFlight, now: DateTime<Utc>) -> Result<()> {
    if flight.origin.trim().is_empty() {
        return Err(Error::Validation("origin is required".to_string()));
    }
    if flight.destination.trim().is_empty() {
        return Err(Error::Validation("destination is required".to_string()));
    }
    if flight.origin.eq_ignore_ascii_case(&flight.destination) {
        return Err(Error::Validation(
            "origin and destination must differ".to_string(),
        ));
    }
    if flight.departure <= now {
        return Err(Error::Validation(
            "departure must be in the future".to_string(),
        ));
    }
    if flight.arrival <= flight.departure {
        return Err(Error::Validation(
            "arrival must be after departure".to_string(),
        ));
    }
    if flight.base_price <= 0 {
        return Err(Error::Validation(
            "base price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// The flight status transition table. COMPLETED and CANCELLED are terminal.
pub fn ensure_flight_transition(from: FlightStatus, to: FlightStatus) -> Result<()> {
    use FlightStatus::*;
    let legal = matches!(
        (from, to),
        (Scheduled, Boarding) | (Scheduled, Cancelled) | (Boarding, Completed) | (Boarding, Cancelled)
    );
    if legal {
        Ok(())
    } else {
        Err(Error::transition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_flight() -> NewFlight {
        let now = Utc::now();
        NewFlight {
            aircraft_id: Uuid::new_v4(),
            origin: "Lima".to_string(),
            destination: "Santiago".to_string(),
            departure: now + Duration::days(7),
            arrival: now + Duration::days(7) + Duration::hours(3),
            base_price: 80_000,
        }
    }

    #[test]
    fn test_valid_flight_passes() {
        assert!(validate_new_flight(&new_flight(), Utc::now()).is_ok());
    }

    #[test]
    fn test_same_route_rejected() {
        let mut flight = new_flight();
        flight.destination = "lima".to_string();
        assert!(matches!(
            validate_new_flight(&flight, Utc::now()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_past_departure_rejected() {
        let mut flight = new_flight();
        flight.departure = Utc::now() - Duration::hours(1);
        assert!(validate_new_flight(&flight, Utc::now()).is_err());
    }

    #[test]
    fn test_arrival_before_departure_rejected() {
        let mut flight = new_flight();
        flight.arrival = flight.departure - Duration::minutes(30);
        assert!(validate_new_flight(&flight, Utc::now()).is_err());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut flight = new_flight();
        flight.base_price = 0;
        assert!(validate_new_flight(&flight, Utc::now()).is_err());
    }

    #[test]
    fn test_transition_table() {
        use FlightStatus::*;
        assert!(ensure_flight_transition(Scheduled, Boarding).is_ok());
        assert!(ensure_flight_transition(Scheduled, Cancelled).is_ok());
        assert!(ensure_flight_transition(Boarding, Completed).is_ok());
        assert!(ensure_flight_transition(Boarding, Cancelled).is_ok());

        assert!(ensure_flight_transition(Scheduled, Completed).is_err());
        assert!(ensure_flight_transition(Completed, Scheduled).is_err());
        assert!(ensure_flight_transition(Cancelled, Boarding).is_err());
    }
}
