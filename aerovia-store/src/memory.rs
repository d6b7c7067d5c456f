use std::collections::HashMap;

use aerovia_core::{Error, Result};
use aerovia_domain::{
    Aircraft, Flight, Passenger, Reservation, ReservationStatus, Seat, Ticket,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

/// All persistent records, keyed by id. Plain data only; transition rules
/// live in the service layer.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct State {
    pub aircraft: HashMap<Uuid, Aircraft>,
    pub seats: HashMap<Uuid, Seat>,
    pub flights: HashMap<Uuid, Flight>,
    pub passengers: HashMap<Uuid, Passenger>,
    pub reservations: HashMap<Uuid, Reservation>,
    pub tickets: HashMap<Uuid, Ticket>,
}

impl State {
    pub fn aircraft(&self, id: Uuid) -> Result<&Aircraft> {
        self.aircraft
            .get(&id)
            .ok_or_else(|| Error::not_found("aircraft", id))
    }

    pub fn seat(&self, id: Uuid) -> Result<&Seat> {
        self.seats.get(&id).ok_or_else(|| Error::not_found("seat", id))
    }

    pub fn seat_mut(&mut self, id: Uuid) -> Result<&mut Seat> {
        self.seats
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("seat", id))
    }

    pub fn flight(&self, id: Uuid) -> Result<&Flight> {
        self.flights
            .get(&id)
            .ok_or_else(|| Error::not_found("flight", id))
    }

    pub fn flight_mut(&mut self, id: Uuid) -> Result<&mut Flight> {
        self.flights
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("flight", id))
    }

    pub fn passenger(&self, id: Uuid) -> Result<&Passenger> {
        self.passengers
            .get(&id)
            .ok_or_else(|| Error::not_found("passenger", id))
    }

    pub fn reservation(&self, id: Uuid) -> Result<&Reservation> {
        self.reservations
            .get(&id)
            .ok_or_else(|| Error::not_found("reservation", id))
    }

    pub fn reservation_mut(&mut self, id: Uuid) -> Result<&mut Reservation> {
        self.reservations
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("reservation", id))
    }

    pub fn ticket(&self, id: Uuid) -> Result<&Ticket> {
        self.tickets
            .get(&id)
            .ok_or_else(|| Error::not_found("ticket", id))
    }

    /// The active (pending or confirmed) reservation on a (flight, seat)
    /// pair, if any. At most one exists by invariant.
    pub fn active_reservation_for_seat(
        &self,
        flight_id: Uuid,
        seat_id: Uuid,
    ) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.flight_id == flight_id && r.seat_id == seat_id && r.is_active())
    }

    /// The passenger's active reservation on a flight, if any. A passenger
    /// holds at most one active reservation per flight.
    pub fn active_reservation_for_passenger(
        &self,
        flight_id: Uuid,
        passenger_id: Uuid,
    ) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.flight_id == flight_id && r.passenger_id == passenger_id && r.is_active())
    }

    pub fn ticket_for_reservation(&self, reservation_id: Uuid) -> Option<&Ticket> {
        self.tickets
            .values()
            .find(|t| t.reservation_id == reservation_id)
    }

    pub fn ticket_for_reservation_mut(&mut self, reservation_id: Uuid) -> Option<&mut Ticket> {
        self.tickets
            .values_mut()
            .find(|t| t.reservation_id == reservation_id)
    }

    pub fn reservation_by_code(&self, code: &str) -> Option<&Reservation> {
        self.reservations.values().find(|r| r.code == code)
    }

    pub fn code_taken(&self, code: &str) -> bool {
        self.reservation_by_code(code).is_some()
    }

    /// Insert a reservation, enforcing code uniqueness. Callers regenerate
    /// the code and retry on Conflict.
    pub fn insert_reservation(&mut self, reservation: Reservation) -> Result<()> {
        if self.code_taken(&reservation.code) {
            return Err(Error::Conflict(format!(
                "reservation code {} already taken",
                reservation.code
            )));
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    pub fn seats_of_aircraft(&self, aircraft_id: Uuid) -> Vec<Seat> {
        let mut seats: Vec<Seat> = self
            .seats
            .values()
            .filter(|s| s.aircraft_id == aircraft_id)
            .cloned()
            .collect();
        seats.sort_by(|a, b| (a.row, &a.column).cmp(&(b.row, &b.column)));
        seats
    }

    pub fn flights_of_aircraft(&self, aircraft_id: Uuid) -> Vec<&Flight> {
        self.flights
            .values()
            .filter(|f| f.aircraft_id == aircraft_id)
            .collect()
    }

    /// Soft uniqueness rule: one flight per aircraft per calendar day.
    pub fn aircraft_flies_on(&self, aircraft_id: Uuid, departure: DateTime<Utc>) -> bool {
        self.flights
            .values()
            .any(|f| f.aircraft_id == aircraft_id && f.departure.date_naive() == departure.date_naive())
    }

    /// Pending reservations whose deadline passed before `cutoff`.
    pub fn pending_expired_before(&self, cutoff: DateTime<Utc>) -> Vec<Reservation> {
        let mut expired: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| r.status == ReservationStatus::Pending && r.expires_at < cutoff)
            .cloned()
            .collect();
        expired.sort_by_key(|r| r.expires_at);
        expired
    }

    pub fn passenger_has_confirmed(&self, passenger_id: Uuid) -> bool {
        self.reservations
            .values()
            .any(|r| r.passenger_id == passenger_id && r.status == ReservationStatus::Confirmed)
    }

    pub fn flight_has_confirmed(&self, flight_id: Uuid) -> bool {
        self.reservations
            .values()
            .any(|r| r.flight_id == flight_id && r.status == ReservationStatus::Confirmed)
    }

    pub fn document_id_taken(&self, document_id: &str) -> bool {
        self.passengers
            .values()
            .any(|p| p.document_id == document_id)
    }
}

/// In-memory arena store. One `Mutex` over the whole state gives every
/// closure passed to the `with_*` methods serializable-transaction
/// semantics: nothing else can read or write while it runs.
///
/// Transaction contract for closures: perform every recheck first and
/// mutate only after all of them pass. A closure that returns `Err`
/// before its first mutation leaves the state untouched, which is what
/// every caller in the ledger relies on.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: State) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Read-only access under the lock.
    pub async fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.lock().await;
        f(&state)
    }

    /// General mutation under the lock. Prefer `with_seat_lock` /
    /// `with_reservation_lock` for anything touching the booking
    /// invariants; this is for plain CRUD.
    pub async fn mutate<T>(&self, f: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Exclusive lock on a (flight, seat) pair: resolve both rows, then run
    /// the closure with the whole state locked. This is the "lock, then
    /// recheck, then act" step that closes the double-booking race; the
    /// availability checks the closure performs cannot go stale before it
    /// commits.
    pub async fn with_seat_lock<T>(
        &self,
        flight_id: Uuid,
        seat_id: Uuid,
        f: impl FnOnce(&mut State) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().await;

        let flight_aircraft = state.flight(flight_id)?.aircraft_id;
        let seat = state.seat(seat_id)?;
        if seat.aircraft_id != flight_aircraft {
            return Err(Error::Validation(format!(
                "seat {} does not belong to the aircraft of flight {}",
                seat.number, flight_id
            )));
        }

        f(&mut state)
    }

    /// Exclusive lock scoped to one reservation and its seat, used by
    /// confirm/cancel/expire so a sweep and a confirm cannot interleave.
    /// Whichever caller gets the lock first wins; the loser sees the
    /// updated status and fails its recheck.
    pub async fn with_reservation_lock<T>(
        &self,
        reservation_id: Uuid,
        f: impl FnOnce(&mut State) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().await;
        state.reservation(reservation_id)?;
        f(&mut state)
    }

    pub async fn get_aircraft(&self, id: Uuid) -> Result<Aircraft> {
        self.read(|s| s.aircraft(id).cloned()).await
    }

    pub async fn get_seat(&self, id: Uuid) -> Result<Seat> {
        self.read(|s| s.seat(id).cloned()).await
    }

    pub async fn get_flight(&self, id: Uuid) -> Result<Flight> {
        self.read(|s| s.flight(id).cloned()).await
    }

    pub async fn get_passenger(&self, id: Uuid) -> Result<Passenger> {
        self.read(|s| s.passenger(id).cloned()).await
    }

    pub async fn get_reservation(&self, id: Uuid) -> Result<Reservation> {
        self.read(|s| s.reservation(id).cloned()).await
    }

    pub async fn get_ticket(&self, id: Uuid) -> Result<Ticket> {
        self.read(|s| s.ticket(id).cloned()).await
    }
}
