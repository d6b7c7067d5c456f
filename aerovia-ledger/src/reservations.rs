use std::sync::Arc;

use aerovia_catalog::pricing::price_for_class;
use aerovia_core::{codes, Error, Result};
use aerovia_domain::{
    FlightStatus, LedgerEvent, Reservation, ReservationStatus, SeatStatus, Ticket, TicketStatus,
};
use aerovia_store::{BusinessRules, EventBus, MemoryStore};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

/// Request to reserve one seat for one passenger on one flight.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub flight_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_id: Uuid,
    /// Explicit price in cents; computed from the seat class when absent
    pub price: Option<i64>,
    pub notes: Option<String>,
}

/// Criteria for listing reservations. All fields are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub flight_id: Option<Uuid>,
    pub passenger_id: Option<Uuid>,
}

/// Outcome of a cancellation: the final record plus the refund owed.
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub reservation: Reservation,
    /// Refund in cents
    pub refund: i64,
}

/// Refund policy: cancelling strictly more than the refund window before
/// departure earns the early tier, everything later the late tier. A
/// reservation that never carried a price refunds nothing.
pub fn refund_amount(price: i64, time_to_departure: Duration, rules: &BusinessRules) -> i64 {
    if price <= 0 {
        return 0;
    }
    let pct = if time_to_departure > Duration::hours(rules.refund_window_hours) {
        rules.refund_early_pct
    } else {
        rules.refund_late_pct
    };
    price * pct / 100
}

/// The reservation state machine. Owns the seat-locking protocol: every
/// mutating path locks, rechecks its preconditions, then acts, so two
/// racing requests serialize and the loser fails cleanly.
#[derive(Clone)]
pub struct ReservationLedger {
    store: Arc<MemoryStore>,
    events: EventBus,
    rules: BusinessRules,
}

impl ReservationLedger {
    pub fn new(store: Arc<MemoryStore>, events: EventBus, rules: BusinessRules) -> Self {
        Self {
            store,
            events,
            rules,
        }
    }

    /// Reserve a seat. On success the reservation is PENDING with a
    /// confirmation deadline and the seat is HELD, both written in the
    /// same transaction.
    pub async fn create_reservation(&self, req: CreateReservation) -> Result<Reservation> {
        let now = Utc::now();

        // Cheap pre-checks outside the lock; everything is re-validated
        // once the lock is held.
        let flight = self.store.get_flight(req.flight_id).await?;
        if !flight.is_bookable(now) {
            return Err(Error::InvalidState(
                "flight is not open for reservations".to_string(),
            ));
        }
        self.store.get_passenger(req.passenger_id).await?;

        let price = match req.price {
            Some(p) if p > 0 => p,
            Some(_) => {
                return Err(Error::Validation(
                    "price must be greater than zero".to_string(),
                ))
            }
            None => {
                let seat = self.store.get_seat(req.seat_id).await?;
                price_for_class(flight.base_price, seat.class)
            }
        };

        let hold = Duration::hours(self.rules.hold_hours);
        let notes = req.notes.clone();

        let (reservation, seat_number) = self
            .store
            .with_seat_lock(req.flight_id, req.seat_id, |state| {
                let flight = state.flight(req.flight_id)?;
                if !flight.is_bookable(now) {
                    return Err(Error::InvalidState(
                        "flight is not open for reservations".to_string(),
                    ));
                }
                state.passenger(req.passenger_id)?;

                let seat = state.seat(req.seat_id)?;
                if seat.status == SeatStatus::Maintenance {
                    return Err(Error::InvalidState(format!(
                        "seat {} is under maintenance",
                        seat.number
                    )));
                }
                if let Some(existing) = state.active_reservation_for_seat(req.flight_id, req.seat_id)
                {
                    return Err(Error::Conflict(format!(
                        "seat {} is already reserved for this flight ({})",
                        seat.number, existing.code
                    )));
                }
                if seat.status != SeatStatus::Available {
                    return Err(Error::Conflict(format!(
                        "seat {} is not available",
                        seat.number
                    )));
                }
                if let Some(existing) =
                    state.active_reservation_for_passenger(req.flight_id, req.passenger_id)
                {
                    return Err(Error::Conflict(format!(
                        "passenger already holds reservation {} on this flight",
                        existing.code
                    )));
                }

                // Unique code; regenerate on the rare collision. The lock
                // makes check-then-insert safe.
                let mut code = codes::reservation_code();
                while state.code_taken(&code) {
                    code = codes::reservation_code();
                }

                let seat_number = seat.number.clone();
                let reservation = Reservation {
                    id: Uuid::new_v4(),
                    flight_id: req.flight_id,
                    passenger_id: req.passenger_id,
                    seat_id: req.seat_id,
                    code,
                    status: ReservationStatus::Pending,
                    created_at: now,
                    expires_at: now + hold,
                    price,
                    notes,
                };
                state.insert_reservation(reservation.clone())?;
                state.seat_mut(req.seat_id)?.status = SeatStatus::Held;
                Ok((reservation, seat_number))
            })
            .await?;

        info!(
            code = %reservation.code,
            flight_id = %reservation.flight_id,
            seat = %seat_number,
            "reservation created"
        );
        self.events.publish(LedgerEvent::SeatHeld {
            flight_id: reservation.flight_id,
            seat_number,
            reservation_code: reservation.code.clone(),
            held_at: now.timestamp(),
        });
        Ok(reservation)
    }

    /// Confirm a pending reservation and issue its ticket. Retrying
    /// against an already-confirmed reservation returns the existing
    /// ticket unchanged.
    pub async fn confirm_reservation(&self, reservation_id: Uuid) -> Result<Ticket> {
        let now = Utc::now();
        let boarding_lead = Duration::minutes(self.rules.boarding_lead_minutes);

        let (ticket, code, flight_id, fresh) = self
            .store
            .with_reservation_lock(reservation_id, |state| {
                let reservation = state.reservation(reservation_id)?.clone();
                match reservation.status {
                    ReservationStatus::Confirmed => {
                        let ticket = state
                            .ticket_for_reservation(reservation_id)
                            .cloned()
                            .ok_or_else(|| {
                                Error::InvalidState(format!(
                                    "confirmed reservation {} has no ticket",
                                    reservation.code
                                ))
                            })?;
                        return Ok((ticket, reservation.code, reservation.flight_id, false));
                    }
                    ReservationStatus::Pending => {}
                    other => return Err(Error::transition(other, ReservationStatus::Confirmed)),
                }

                // Deadline enforcement is the sweeper's job; here it only
                // blocks the confirm.
                if reservation.is_past_deadline(now) {
                    return Err(Error::Expired(format!(
                        "reservation {} passed its confirmation deadline",
                        reservation.code
                    )));
                }

                let flight = state.flight(reservation.flight_id)?;
                if flight.status != FlightStatus::Scheduled {
                    return Err(Error::InvalidState(
                        "flight is no longer scheduled".to_string(),
                    ));
                }
                let departure = flight.departure;

                let seat = state.seat(reservation.seat_id)?;
                if seat.status != SeatStatus::Held {
                    return Err(Error::Conflict(format!(
                        "seat {} is not held by this reservation",
                        seat.number
                    )));
                }

                let mut barcode = codes::ticket_barcode();
                while state.tickets.values().any(|t| t.barcode == barcode) {
                    barcode = codes::ticket_barcode();
                }

                let ticket = Ticket {
                    id: Uuid::new_v4(),
                    reservation_id,
                    barcode,
                    issued_at: now,
                    status: TicketStatus::Issued,
                    boarding_gate: "TBA".to_string(),
                    boarding_time: Some((departure - boarding_lead).time()),
                };
                state.reservation_mut(reservation_id)?.status = ReservationStatus::Confirmed;
                state.seat_mut(reservation.seat_id)?.status = SeatStatus::Occupied;
                state.tickets.insert(ticket.id, ticket.clone());
                Ok((ticket, reservation.code, reservation.flight_id, true))
            })
            .await?;

        if fresh {
            info!(code = %code, barcode = %ticket.barcode, "reservation confirmed");
            self.events.publish(LedgerEvent::ReservationConfirmed {
                flight_id,
                reservation_code: code,
                ticket_barcode: ticket.barcode.clone(),
            });
        }
        Ok(ticket)
    }

    /// Cancel a pending or confirmed reservation, release the seat, void
    /// the ticket if one exists, and compute the refund.
    pub async fn cancel_reservation(&self, reservation_id: Uuid) -> Result<Cancellation> {
        let now = Utc::now();
        let rules = self.rules.clone();

        let (reservation, refund, flight_id) = self
            .store
            .with_reservation_lock(reservation_id, |state| {
                let reservation = state.reservation(reservation_id)?.clone();
                if !reservation.is_active() {
                    return Err(Error::transition(
                        reservation.status,
                        ReservationStatus::Cancelled,
                    ));
                }

                let flight = state.flight(reservation.flight_id)?;
                if flight.has_departed(now) {
                    return Err(Error::InvalidState(
                        "cannot cancel after the flight has departed".to_string(),
                    ));
                }
                let refund = refund_amount(reservation.price, flight.departure - now, &rules);
                let flight_id = flight.id;

                state.seat_mut(reservation.seat_id)?.status = SeatStatus::Available;
                if let Some(ticket) = state.ticket_for_reservation_mut(reservation_id) {
                    ticket.status = TicketStatus::Cancelled;
                }
                let record = state.reservation_mut(reservation_id)?;
                record.status = ReservationStatus::Cancelled;
                Ok((record.clone(), refund, flight_id))
            })
            .await?;

        info!(code = %reservation.code, refund, "reservation cancelled");
        self.events.publish(LedgerEvent::ReservationCancelled {
            flight_id,
            reservation_code: reservation.code.clone(),
            refund,
        });
        Ok(Cancellation { reservation, refund })
    }

    /// Operator action after the flight has run: close out a confirmed
    /// reservation and free the seat for the aircraft's next rotation.
    pub async fn complete_reservation(&self, reservation_id: Uuid) -> Result<Reservation> {
        self.store
            .with_reservation_lock(reservation_id, |state| {
                let reservation = state.reservation(reservation_id)?.clone();
                if reservation.status != ReservationStatus::Confirmed {
                    return Err(Error::transition(
                        reservation.status,
                        ReservationStatus::Completed,
                    ));
                }
                let flight = state.flight(reservation.flight_id)?;
                if flight.status != FlightStatus::Completed {
                    return Err(Error::InvalidState(
                        "flight has not completed yet".to_string(),
                    ));
                }

                state.seat_mut(reservation.seat_id)?.status = SeatStatus::Available;
                let record = state.reservation_mut(reservation_id)?;
                record.status = ReservationStatus::Completed;
                Ok(record.clone())
            })
            .await
    }

    /// Expire one pending reservation whose deadline fell before `cutoff`
    /// and release its seat. Used by the sweeper; the lock makes it lose
    /// cleanly against a confirm that got there first.
    pub async fn expire_reservation(
        &self,
        reservation_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Reservation> {
        let (reservation, seat_number, flight_id) = self
            .store
            .with_reservation_lock(reservation_id, |state| {
                let reservation = state.reservation(reservation_id)?.clone();
                if reservation.status != ReservationStatus::Pending {
                    return Err(Error::InvalidState(format!(
                        "reservation {} is no longer pending",
                        reservation.code
                    )));
                }
                if reservation.expires_at >= cutoff {
                    return Err(Error::InvalidState(format!(
                        "reservation {} has not reached the expiry cutoff",
                        reservation.code
                    )));
                }

                let seat = state.seat_mut(reservation.seat_id)?;
                let seat_number = seat.number.clone();
                if seat.status == SeatStatus::Held {
                    seat.status = SeatStatus::Available;
                } else {
                    warn!(
                        seat = %seat_number,
                        status = ?seat.status,
                        "expiring reservation found its seat in an unexpected state"
                    );
                }
                let record = state.reservation_mut(reservation_id)?;
                record.status = ReservationStatus::Expired;
                Ok((record.clone(), seat_number, reservation.flight_id))
            })
            .await?;

        info!(code = %reservation.code, seat = %seat_number, "reservation expired");
        self.events.publish(LedgerEvent::ReservationExpired {
            flight_id,
            reservation_code: reservation.code.clone(),
            seat_number,
        });
        Ok(reservation)
    }

    /// Expire every pending reservation past `cutoff`. Items are processed
    /// independently; one failure never aborts the rest.
    pub async fn expire_reservations(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Vec<(Reservation, Result<Reservation>)> {
        let due = self.store.read(|state| state.pending_expired_before(cutoff)).await;

        let mut results = Vec::with_capacity(due.len());
        for candidate in due {
            let outcome = self.expire_reservation(candidate.id, cutoff).await;
            results.push((candidate, outcome));
        }
        results
    }

    pub async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation> {
        self.store.get_reservation(reservation_id).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Reservation> {
        self.store
            .read(|state| {
                state
                    .reservation_by_code(code)
                    .cloned()
                    .ok_or_else(|| Error::not_found("reservation", code))
            })
            .await
    }

    /// List reservations matching the filter, newest first.
    pub async fn list_reservations(&self, filter: ReservationFilter) -> Vec<Reservation> {
        self.store
            .read(|state| {
                let mut matches: Vec<Reservation> = state
                    .reservations
                    .values()
                    .filter(|r| filter.status.map_or(true, |s| r.status == s))
                    .filter(|r| filter.flight_id.map_or(true, |f| r.flight_id == f))
                    .filter(|r| filter.passenger_id.map_or(true, |p| r.passenger_id == p))
                    .cloned()
                    .collect();
                matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                matches
            })
            .await
    }
}
