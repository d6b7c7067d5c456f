use std::sync::Arc;

use aerovia_core::{Error, Result};
use aerovia_domain::{Passenger, SeatStatus};
use aerovia_store::MemoryStore;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

/// CRUD over passenger records. Reservations reference passengers by id;
/// the only coupling back is the deletion rule.
#[derive(Clone)]
pub struct PassengerService {
    store: Arc<MemoryStore>,
}

impl PassengerService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn register_passenger(
        &self,
        first_name: &str,
        last_name: &str,
        document_id: &str,
        email: &str,
        date_of_birth: Option<NaiveDate>,
    ) -> Result<Passenger> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(Error::Validation("passenger name is required".to_string()));
        }
        if document_id.trim().is_empty() {
            return Err(Error::Validation("document id is required".to_string()));
        }

        let passenger = Passenger {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            document_id: document_id.to_string(),
            email: email.to_string(),
            date_of_birth,
        };

        let created = self
            .store
            .mutate(|state| {
                if state.document_id_taken(&passenger.document_id) {
                    return Err(Error::Conflict(format!(
                        "document id {} already registered",
                        passenger.document_id
                    )));
                }
                state.passengers.insert(passenger.id, passenger.clone());
                Ok(passenger)
            })
            .await?;

        info!(passenger_id = %created.id, "passenger registered");
        Ok(created)
    }

    pub async fn get_passenger(&self, passenger_id: Uuid) -> Result<Passenger> {
        self.store.get_passenger(passenger_id).await
    }

    pub async fn list_passengers(&self) -> Vec<Passenger> {
        self.store
            .read(|state| {
                let mut passengers: Vec<Passenger> = state.passengers.values().cloned().collect();
                passengers.sort_by(|a, b| {
                    (a.last_name.as_str(), a.first_name.as_str())
                        .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
                });
                passengers
            })
            .await
    }

    pub async fn update_contact(&self, passenger_id: Uuid, email: &str) -> Result<Passenger> {
        self.store
            .mutate(|state| {
                let passenger = state
                    .passengers
                    .get_mut(&passenger_id)
                    .ok_or_else(|| Error::not_found("passenger", passenger_id))?;
                passenger.email = email.to_string();
                Ok(passenger.clone())
            })
            .await
    }

    /// Delete a passenger. Refused while any of their reservations is
    /// confirmed; pending holds are released so no seat stays stuck.
    pub async fn delete_passenger(&self, passenger_id: Uuid) -> Result<()> {
        self.store
            .mutate(|state| {
                state.passenger(passenger_id)?;
                if state.passenger_has_confirmed(passenger_id) {
                    return Err(Error::InvalidState(
                        "cannot delete a passenger with confirmed reservations".to_string(),
                    ));
                }

                let owned: Vec<(Uuid, Uuid, bool)> = state
                    .reservations
                    .values()
                    .filter(|r| r.passenger_id == passenger_id)
                    .map(|r| (r.id, r.seat_id, r.is_active()))
                    .collect();

                for (reservation_id, seat_id, active) in owned {
                    if active {
                        if let Ok(seat) = state.seat_mut(seat_id) {
                            if seat.status == SeatStatus::Held {
                                seat.status = SeatStatus::Available;
                            }
                        }
                    }
                    state.tickets.retain(|_, t| t.reservation_id != reservation_id);
                    state.reservations.remove(&reservation_id);
                }

                state.passengers.remove(&passenger_id);
                Ok(())
            })
            .await?;

        info!(passenger_id = %passenger_id, "passenger deleted");
        Ok(())
    }
}
