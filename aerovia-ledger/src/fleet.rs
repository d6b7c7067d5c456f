use std::sync::Arc;

use aerovia_catalog::seating::{generate_seats, SeatPlan};
use aerovia_core::{Error, Result};
use aerovia_domain::{Aircraft, AircraftStatus, Seat, SeatStatus};
use aerovia_store::MemoryStore;
use tracing::info;
use uuid::Uuid;

/// Manages aircraft and their seat inventory.
///
/// Seat generation happens here as an explicit call when an aircraft is
/// registered, never as a hidden save hook.
#[derive(Clone)]
pub struct FleetService {
    store: Arc<MemoryStore>,
}

impl FleetService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Register an aircraft and lay out its full seat grid.
    pub async fn register_aircraft(
        &self,
        model: &str,
        rows: u32,
        columns: u32,
    ) -> Result<Aircraft> {
        if model.trim().is_empty() {
            return Err(Error::Validation("aircraft model is required".to_string()));
        }
        let plan = SeatPlan::new(rows, columns)?;

        let aircraft = Aircraft::new(model.to_string(), rows, columns);
        let seats = generate_seats(aircraft.id, plan);
        let seat_count = seats.len();

        let created = self
            .store
            .mutate(|state| {
                state.aircraft.insert(aircraft.id, aircraft.clone());
                for seat in seats {
                    state.seats.insert(seat.id, seat);
                }
                Ok(aircraft)
            })
            .await?;

        info!(
            aircraft_id = %created.id,
            model = %created.model,
            seats = seat_count,
            "aircraft registered"
        );
        Ok(created)
    }

    pub async fn get_aircraft(&self, aircraft_id: Uuid) -> Result<Aircraft> {
        self.store.get_aircraft(aircraft_id).await
    }

    pub async fn list_aircraft(&self) -> Vec<Aircraft> {
        self.store
            .read(|state| {
                let mut fleet: Vec<Aircraft> = state.aircraft.values().cloned().collect();
                fleet.sort_by(|a, b| a.model.cmp(&b.model));
                fleet
            })
            .await
    }

    pub async fn set_aircraft_status(
        &self,
        aircraft_id: Uuid,
        status: AircraftStatus,
    ) -> Result<Aircraft> {
        self.store
            .mutate(|state| {
                let aircraft = state
                    .aircraft
                    .get_mut(&aircraft_id)
                    .ok_or_else(|| Error::not_found("aircraft", aircraft_id))?;
                aircraft.status = status;
                Ok(aircraft.clone())
            })
            .await
    }

    /// Tear down and recreate the seat grid. Refused once the aircraft has
    /// any flight, because existing reservations would be left pointing at
    /// deleted seat rows.
    pub async fn regenerate_seats(&self, aircraft_id: Uuid, rows: u32, columns: u32) -> Result<Vec<Seat>> {
        let plan = SeatPlan::new(rows, columns)?;

        self.store
            .mutate(|state| {
                state.aircraft(aircraft_id)?;
                if !state.flights_of_aircraft(aircraft_id).is_empty() {
                    return Err(Error::InvalidState(
                        "cannot regenerate seats for an aircraft with flights".to_string(),
                    ));
                }

                state.seats.retain(|_, s| s.aircraft_id != aircraft_id);
                let seats = generate_seats(aircraft_id, plan);
                for seat in &seats {
                    state.seats.insert(seat.id, seat.clone());
                }

                let aircraft = state
                    .aircraft
                    .get_mut(&aircraft_id)
                    .ok_or_else(|| Error::not_found("aircraft", aircraft_id))?;
                aircraft.rows = rows;
                aircraft.columns = columns;
                aircraft.capacity = rows * columns;

                Ok(seats)
            })
            .await
    }

    /// All seats of an aircraft, row-major order.
    pub async fn seat_map(&self, aircraft_id: Uuid) -> Result<Vec<Seat>> {
        self.store
            .read(|state| {
                state.aircraft(aircraft_id)?;
                Ok(state.seats_of_aircraft(aircraft_id))
            })
            .await
    }

    pub async fn get_seat(&self, seat_id: Uuid) -> Result<Seat> {
        self.store.get_seat(seat_id).await
    }

    /// Direct seat status write. No transition table here; the reservation
    /// ledger is responsible for only requesting legal flips.
    pub async fn set_seat_status(&self, seat_id: Uuid, status: SeatStatus) -> Result<Seat> {
        self.store
            .mutate(|state| {
                let seat = state.seat_mut(seat_id)?;
                seat.status = status;
                Ok(seat.clone())
            })
            .await
    }

    /// Whether the seat can take a new reservation on the given flight.
    pub async fn seat_is_available_for_flight(&self, seat_id: Uuid, flight_id: Uuid) -> Result<bool> {
        self.store
            .read(|state| {
                let flight = state.flight(flight_id)?;
                let seat = state.seat(seat_id)?;
                if seat.aircraft_id != flight.aircraft_id {
                    return Ok(false);
                }
                Ok(seat.status == SeatStatus::Available
                    && state.active_reservation_for_seat(flight_id, seat_id).is_none())
            })
            .await
    }
}
