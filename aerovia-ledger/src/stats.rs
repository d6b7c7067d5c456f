use std::collections::HashMap;
use std::sync::Arc;

use aerovia_domain::{FlightStatus, ReservationStatus, SeatStatus, TicketStatus};
use aerovia_store::MemoryStore;
use serde::Serialize;
use uuid::Uuid;

/// System-wide counters for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_aircraft: usize,
    pub total_flights: usize,
    pub total_passengers: usize,
    pub total_reservations: usize,
    pub reservations_pending: usize,
    pub reservations_confirmed: usize,
    pub reservations_cancelled: usize,
    pub reservations_expired: usize,
    pub reservations_completed: usize,
    pub flights_scheduled: usize,
    pub tickets_issued: usize,
}

/// Per-flight occupancy and revenue rollup.
#[derive(Debug, Clone, Serialize)]
pub struct FlightReportRow {
    pub flight_id: Uuid,
    pub route: String,
    pub status: FlightStatus,
    pub seats_total: usize,
    pub seats_available: usize,
    pub active_reservations: usize,
    /// Sum of confirmed reservation prices, in cents
    pub confirmed_revenue: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationReport {
    pub total: usize,
    pub by_status: HashMap<String, usize>,
    /// Revenue across confirmed reservations, in cents
    pub confirmed_revenue: i64,
}

/// Read-only aggregation over the ledger. Never mutates.
#[derive(Clone)]
pub struct Statistics {
    store: Arc<MemoryStore>,
}

impl Statistics {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn overview(&self) -> Overview {
        self.store
            .read(|state| {
                let count_status = |status: ReservationStatus| {
                    state
                        .reservations
                        .values()
                        .filter(|r| r.status == status)
                        .count()
                };

                Overview {
                    total_aircraft: state.aircraft.len(),
                    total_flights: state.flights.len(),
                    total_passengers: state.passengers.len(),
                    total_reservations: state.reservations.len(),
                    reservations_pending: count_status(ReservationStatus::Pending),
                    reservations_confirmed: count_status(ReservationStatus::Confirmed),
                    reservations_cancelled: count_status(ReservationStatus::Cancelled),
                    reservations_expired: count_status(ReservationStatus::Expired),
                    reservations_completed: count_status(ReservationStatus::Completed),
                    flights_scheduled: state
                        .flights
                        .values()
                        .filter(|f| f.status == FlightStatus::Scheduled)
                        .count(),
                    tickets_issued: state
                        .tickets
                        .values()
                        .filter(|t| t.status == TicketStatus::Issued)
                        .count(),
                }
            })
            .await
    }

    pub async fn flight_report(&self) -> Vec<FlightReportRow> {
        self.store
            .read(|state| {
                let mut rows: Vec<FlightReportRow> = state
                    .flights
                    .values()
                    .map(|flight| {
                        let seats: Vec<_> = state
                            .seats
                            .values()
                            .filter(|s| s.aircraft_id == flight.aircraft_id)
                            .collect();
                        let reservations: Vec<_> = state
                            .reservations
                            .values()
                            .filter(|r| r.flight_id == flight.id)
                            .collect();

                        FlightReportRow {
                            flight_id: flight.id,
                            route: flight.route(),
                            status: flight.status,
                            seats_total: seats.len(),
                            seats_available: seats
                                .iter()
                                .filter(|s| s.status == SeatStatus::Available)
                                .count(),
                            active_reservations: reservations
                                .iter()
                                .filter(|r| r.is_active())
                                .count(),
                            confirmed_revenue: reservations
                                .iter()
                                .filter(|r| r.status == ReservationStatus::Confirmed)
                                .map(|r| r.price)
                                .sum(),
                        }
                    })
                    .collect();
                rows.sort_by_key(|r| r.flight_id);
                rows
            })
            .await
    }

    pub async fn reservation_report(&self) -> ReservationReport {
        self.store
            .read(|state| {
                let mut by_status: HashMap<String, usize> = HashMap::new();
                let mut confirmed_revenue = 0;

                for reservation in state.reservations.values() {
                    *by_status
                        .entry(format!("{:?}", reservation.status))
                        .or_insert(0) += 1;
                    if reservation.status == ReservationStatus::Confirmed {
                        confirmed_revenue += reservation.price;
                    }
                }

                ReservationReport {
                    total: state.reservations.len(),
                    by_status,
                    confirmed_revenue,
                }
            })
            .await
    }
}
