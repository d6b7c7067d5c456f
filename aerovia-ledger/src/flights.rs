use std::sync::Arc;

use aerovia_catalog::flights::{ensure_flight_transition, validate_new_flight, NewFlight};
use aerovia_catalog::pricing::price_for_class;
use aerovia_core::{Error, Result};
use aerovia_domain::{Flight, FlightStatus, SeatClass, SeatStatus};
use aerovia_store::MemoryStore;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Gate-keeps which flights exist and whether they accept reservations.
#[derive(Clone)]
pub struct FlightService {
    store: Arc<MemoryStore>,
}

impl FlightService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Schedule a new flight. The aircraft must be active and free on the
    /// departure date (soft one-flight-per-day rule from the fleet desk).
    pub async fn create_flight(&self, new: NewFlight) -> Result<Flight> {
        validate_new_flight(&new, Utc::now())?;

        let flight = self
            .store
            .mutate(|state| {
                let aircraft = state.aircraft(new.aircraft_id)?;
                if !aircraft.is_active() {
                    return Err(Error::InvalidState(format!(
                        "aircraft {} is not active",
                        aircraft.model
                    )));
                }
                if state.aircraft_flies_on(new.aircraft_id, new.departure) {
                    return Err(Error::Conflict(
                        "aircraft already has a flight scheduled that day".to_string(),
                    ));
                }

                let flight = Flight {
                    id: Uuid::new_v4(),
                    aircraft_id: new.aircraft_id,
                    origin: new.origin.clone(),
                    destination: new.destination.clone(),
                    departure: new.departure,
                    arrival: new.arrival,
                    status: FlightStatus::Scheduled,
                    base_price: new.base_price,
                };
                state.flights.insert(flight.id, flight.clone());
                Ok(flight)
            })
            .await?;

        info!(flight_id = %flight.id, route = %flight.route(), "flight scheduled");
        Ok(flight)
    }

    pub async fn get_flight(&self, flight_id: Uuid) -> Result<Flight> {
        self.store.get_flight(flight_id).await
    }

    pub async fn list_flights(&self) -> Vec<Flight> {
        self.store
            .read(|state| {
                let mut flights: Vec<Flight> = state.flights.values().cloned().collect();
                flights.sort_by_key(|f| f.departure);
                flights
            })
            .await
    }

    pub async fn is_bookable(&self, flight_id: Uuid) -> Result<bool> {
        let flight = self.store.get_flight(flight_id).await?;
        Ok(flight.is_bookable(Utc::now()))
    }

    /// Move a flight through its lifecycle, enforcing the transition table.
    pub async fn set_status(&self, flight_id: Uuid, to: FlightStatus) -> Result<Flight> {
        let flight = self
            .store
            .mutate(|state| {
                let flight = state.flight_mut(flight_id)?;
                ensure_flight_transition(flight.status, to)?;
                flight.status = to;
                Ok(flight.clone())
            })
            .await?;

        info!(flight_id = %flight_id, status = ?to, "flight status changed");
        Ok(flight)
    }

    /// Remove a flight. Refused while confirmed reservations exist; any
    /// remaining inactive or pending reservations are dropped and their
    /// held seats released.
    pub async fn delete_flight(&self, flight_id: Uuid) -> Result<()> {
        self.store
            .mutate(|state| {
                state.flight(flight_id)?;
                if state.flight_has_confirmed(flight_id) {
                    return Err(Error::InvalidState(
                        "cannot delete a flight with confirmed reservations".to_string(),
                    ));
                }

                let doomed: Vec<(Uuid, Uuid, bool)> = state
                    .reservations
                    .values()
                    .filter(|r| r.flight_id == flight_id)
                    .map(|r| (r.id, r.seat_id, r.is_active()))
                    .collect();

                for (reservation_id, seat_id, active) in doomed {
                    if active {
                        if let Ok(seat) = state.seat_mut(seat_id) {
                            if seat.status == SeatStatus::Held {
                                seat.status = SeatStatus::Available;
                            } else {
                                warn!(seat_id = %seat_id, "held reservation without held seat");
                            }
                        }
                    }
                    state.tickets.retain(|_, t| t.reservation_id != reservation_id);
                    state.reservations.remove(&reservation_id);
                }

                state.flights.remove(&flight_id);
                Ok(())
            })
            .await?;

        info!(flight_id = %flight_id, "flight deleted");
        Ok(())
    }

    /// Price a seat class on this flight off its base price.
    pub async fn price_for_class(&self, flight_id: Uuid, class: SeatClass) -> Result<i64> {
        let flight = self.store.get_flight(flight_id).await?;
        Ok(price_for_class(flight.base_price, class))
    }
}
