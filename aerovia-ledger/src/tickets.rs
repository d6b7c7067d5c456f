use std::sync::Arc;

use aerovia_core::{Error, Result};
use aerovia_domain::{ReservationStatus, Ticket, TicketStatus};
use aerovia_store::MemoryStore;
use tracing::info;
use uuid::Uuid;

/// Read and lifecycle operations on issued tickets. Issuance itself is a
/// side effect of confirming a reservation; cancellation cascades from
/// cancelling one.
#[derive(Clone)]
pub struct TicketService {
    store: Arc<MemoryStore>,
}

impl TicketService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn get_ticket(&self, ticket_id: Uuid) -> Result<Ticket> {
        self.store.get_ticket(ticket_id).await
    }

    pub async fn find_by_barcode(&self, barcode: &str) -> Result<Ticket> {
        self.store
            .read(|state| {
                state
                    .tickets
                    .values()
                    .find(|t| t.barcode == barcode)
                    .cloned()
                    .ok_or_else(|| Error::not_found("ticket", barcode))
            })
            .await
    }

    pub async fn ticket_for_reservation(&self, reservation_id: Uuid) -> Result<Ticket> {
        self.store
            .read(|state| {
                state
                    .ticket_for_reservation(reservation_id)
                    .cloned()
                    .ok_or_else(|| {
                        Error::not_found("ticket for reservation", reservation_id)
                    })
            })
            .await
    }

    /// Boarding-pass scan: legal only for an ISSUED ticket whose owning
    /// reservation is still CONFIRMED.
    pub async fn mark_used(&self, ticket_id: Uuid) -> Result<Ticket> {
        let ticket = self
            .store
            .mutate(|state| {
                let ticket = state.ticket(ticket_id)?.clone();
                if ticket.status != TicketStatus::Issued {
                    return Err(Error::transition(ticket.status, TicketStatus::Used));
                }
                let reservation = state.reservation(ticket.reservation_id)?;
                if reservation.status != ReservationStatus::Confirmed {
                    return Err(Error::InvalidState(format!(
                        "reservation {} is not confirmed",
                        reservation.code
                    )));
                }

                let record = state
                    .tickets
                    .get_mut(&ticket_id)
                    .ok_or_else(|| Error::not_found("ticket", ticket_id))?;
                record.status = TicketStatus::Used;
                Ok(record.clone())
            })
            .await?;

        info!(barcode = %ticket.barcode, "ticket used");
        Ok(ticket)
    }

    /// Report a ticket lost. Terminal; reissue means a new confirm flow.
    pub async fn mark_lost(&self, ticket_id: Uuid) -> Result<Ticket> {
        self.store
            .mutate(|state| {
                let ticket = state.ticket(ticket_id)?;
                if ticket.status != TicketStatus::Issued {
                    return Err(Error::transition(ticket.status, TicketStatus::Lost));
                }
                let record = state
                    .tickets
                    .get_mut(&ticket_id)
                    .ok_or_else(|| Error::not_found("ticket", ticket_id))?;
                record.status = TicketStatus::Lost;
                Ok(record.clone())
            })
            .await
    }
}
