use std::sync::Arc;

use aerovia_catalog::flights::NewFlight;
use aerovia_core::Error;
use aerovia_domain::{
    FlightStatus, ReservationStatus, SeatClass, SeatStatus, TicketStatus,
};
use aerovia_ledger::{
    CreateReservation, ExpirySweeper, FleetService, FlightService, PassengerService,
    ReservationFilter, ReservationLedger, Statistics, SweepOptions, TicketService,
};
use aerovia_store::{BusinessRules, EventBus, MemoryStore};
use chrono::{Duration, Utc};
use uuid::Uuid;

struct TestApp {
    store: Arc<MemoryStore>,
    fleet: FleetService,
    flights: FlightService,
    passengers: PassengerService,
    ledger: ReservationLedger,
    tickets: TicketService,
    sweeper: ExpirySweeper,
}

fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let rules = BusinessRules::default();
    let events = EventBus::default();
    let ledger = ReservationLedger::new(store.clone(), events, rules.clone());
    TestApp {
        fleet: FleetService::new(store.clone()),
        flights: FlightService::new(store.clone()),
        passengers: PassengerService::new(store.clone()),
        tickets: TicketService::new(store.clone()),
        sweeper: ExpirySweeper::new(store.clone(), ledger.clone(), rules),
        ledger,
        store,
    }
}

/// Aircraft + scheduled flight departing `days_out` days from now with a
/// 10,000-cent base price, plus one registered passenger.
async fn seed_flight(app: &TestApp, days_out: i64) -> (Uuid, Vec<aerovia_domain::Seat>, Uuid) {
    let aircraft = app.fleet.register_aircraft("A320", 10, 4).await.unwrap();
    let now = Utc::now();
    let flight = app
        .flights
        .create_flight(NewFlight {
            aircraft_id: aircraft.id,
            origin: "Lima".to_string(),
            destination: "Santiago".to_string(),
            departure: now + Duration::days(days_out),
            arrival: now + Duration::days(days_out) + Duration::hours(3),
            base_price: 10_000,
        })
        .await
        .unwrap();
    let seats = app.fleet.seat_map(aircraft.id).await.unwrap();
    let passenger = app
        .passengers
        .register_passenger("Ana", "Torres", "DNI-1001", "ana@example.com", None)
        .await
        .unwrap();
    (flight.id, seats, passenger.id)
}

fn economy_seat(seats: &[aerovia_domain::Seat]) -> &aerovia_domain::Seat {
    seats.iter().find(|s| s.class == SeatClass::Economy).unwrap()
}

#[tokio::test]
async fn concurrent_creates_yield_one_winner() {
    let app = test_app();
    let (flight_id, seats, _) = seed_flight(&app, 3).await;
    let seat_id = economy_seat(&seats).id;

    // 16 different passengers race for the same seat
    let mut passenger_ids = Vec::new();
    for i in 0..16 {
        let p = app
            .passengers
            .register_passenger(
                "Pax",
                &format!("Num{}", i),
                &format!("DOC-{}", i),
                "pax@example.com",
                None,
            )
            .await
            .unwrap();
        passenger_ids.push(p.id);
    }

    let mut handles = Vec::new();
    for passenger_id in passenger_ids {
        let ledger = app.ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .create_reservation(CreateReservation {
                    flight_id,
                    passenger_id,
                    seat_id,
                    price: None,
                    notes: None,
                })
                .await
        }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(Error::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 15);

    let seat = app.fleet.get_seat(seat_id).await.unwrap();
    assert_eq!(seat.status, SeatStatus::Held);

    let active = app
        .ledger
        .list_reservations(ReservationFilter {
            flight_id: Some(flight_id),
            status: Some(ReservationStatus::Pending),
            ..Default::default()
        })
        .await;
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn one_seat_scenario_hold_confirm_cancel() {
    let app = test_app();
    let (flight_id, seats, passenger_a) = seed_flight(&app, 3).await;
    let seat = economy_seat(&seats);

    let passenger_b = app
        .passengers
        .register_passenger("Luis", "Mora", "DNI-2002", "luis@example.com", None)
        .await
        .unwrap();

    // First request wins the seat at the economy price
    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id: passenger_a,
            seat_id: seat.id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.price, 10_000);
    assert_eq!(reservation.code.len(), 8);

    // Second passenger loses with a Conflict
    let loser = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id: passenger_b.id,
            seat_id: seat.id,
            price: None,
            notes: None,
        })
        .await;
    assert!(matches!(loser, Err(Error::Conflict(_))));

    // Confirming occupies the seat and issues exactly one ticket
    let ticket = app.ledger.confirm_reservation(reservation.id).await.unwrap();
    assert!(ticket.barcode.starts_with("BOL"));
    assert_eq!(ticket.status, TicketStatus::Issued);
    assert_eq!(
        app.fleet.get_seat(seat.id).await.unwrap().status,
        SeatStatus::Occupied
    );
    let ticket_count = app.store.read(|s| s.tickets.len()).await;
    assert_eq!(ticket_count, 1);

    // Cancelling >24h before departure refunds 80% and frees the seat
    let cancellation = app.ledger.cancel_reservation(reservation.id).await.unwrap();
    assert_eq!(cancellation.refund, 8_000);
    assert_eq!(
        cancellation.reservation.status,
        ReservationStatus::Cancelled
    );
    assert_eq!(
        app.fleet.get_seat(seat.id).await.unwrap().status,
        SeatStatus::Available
    );
    let ticket = app.tickets.get_ticket(ticket.id).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Cancelled);

    // The seat is reusable afterwards
    let rebooked = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id: passenger_b.id,
            seat_id: seat.id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(rebooked.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn passenger_cannot_hold_two_seats_on_one_flight() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    app.ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();

    let second = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[1].id,
            price: None,
            notes: None,
        })
        .await;
    assert!(matches!(second, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn confirm_is_idempotent() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();

    let first = app.ledger.confirm_reservation(reservation.id).await.unwrap();
    let second = app.ledger.confirm_reservation(reservation.id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.barcode, second.barcode);

    let ticket_count = app.store.read(|s| s.tickets.len()).await;
    assert_eq!(ticket_count, 1);
}

#[tokio::test]
async fn confirm_fails_from_terminal_states() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    app.ledger.cancel_reservation(reservation.id).await.unwrap();

    let result = app.ledger.confirm_reservation(reservation.id).await;
    assert!(matches!(result, Err(Error::InvalidTransition { .. })));

    let again = app.ledger.cancel_reservation(reservation.id).await;
    assert!(matches!(again, Err(Error::InvalidTransition { .. })));
}

#[tokio::test]
async fn expired_reservation_blocks_confirm_until_swept() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;
    let seat_id = seats[0].id;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();

    // Rewind the deadline to 25 hours ago
    app.store
        .mutate(|state| {
            state.reservation_mut(reservation.id)?.expires_at = Utc::now() - Duration::hours(25);
            Ok(())
        })
        .await
        .unwrap();

    // Confirm refuses with Expired; the seat stays held until the sweep
    let result = app.ledger.confirm_reservation(reservation.id).await;
    assert!(matches!(result, Err(Error::Expired(_))));
    assert_eq!(
        app.fleet.get_seat(seat_id).await.unwrap().status,
        SeatStatus::Held
    );

    let report = app.sweeper.run(SweepOptions::default()).await;
    assert_eq!(report.expired, 1);
    assert!(report.is_clean());

    assert_eq!(
        app.fleet.get_seat(seat_id).await.unwrap().status,
        SeatStatus::Available
    );
    let swept = app.ledger.get_reservation(reservation.id).await.unwrap();
    assert_eq!(swept.status, ReservationStatus::Expired);
}

#[tokio::test]
async fn sweeper_respects_grace_window() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();

    // Deadline passed 30 minutes ago: inside the 1h grace window
    app.store
        .mutate(|state| {
            state.reservation_mut(reservation.id)?.expires_at =
                Utc::now() - Duration::minutes(30);
            Ok(())
        })
        .await
        .unwrap();

    let default_run = app.sweeper.run(SweepOptions::default()).await;
    assert_eq!(default_run.scanned, 0);
    assert_eq!(
        app.ledger.get_reservation(reservation.id).await.unwrap().status,
        ReservationStatus::Pending
    );

    // Dry-run with force finds it but changes nothing
    let dry = app
        .sweeper
        .run(SweepOptions {
            dry_run: true,
            force: true,
        })
        .await;
    assert_eq!(dry.would_expire, vec![reservation.code.clone()]);
    assert_eq!(
        app.ledger.get_reservation(reservation.id).await.unwrap().status,
        ReservationStatus::Pending
    );

    // Force actually expires it
    let forced = app
        .sweeper
        .run(SweepOptions {
            dry_run: false,
            force: true,
        })
        .await;
    assert_eq!(forced.expired, 1);
    assert_eq!(
        app.ledger.get_reservation(reservation.id).await.unwrap().status,
        ReservationStatus::Expired
    );
}

#[tokio::test]
async fn late_cancellation_uses_late_refund_tier() {
    let app = test_app();
    // Flight departs in 6 hours: inside the 24h window
    let aircraft = app.fleet.register_aircraft("E190", 8, 4).await.unwrap();
    let now = Utc::now();
    let flight = app
        .flights
        .create_flight(NewFlight {
            aircraft_id: aircraft.id,
            origin: "Lima".to_string(),
            destination: "Cusco".to_string(),
            departure: now + Duration::hours(6),
            arrival: now + Duration::hours(8),
            base_price: 10_000,
        })
        .await
        .unwrap();
    let passenger = app
        .passengers
        .register_passenger("Eva", "Salas", "DNI-3003", "eva@example.com", None)
        .await
        .unwrap();
    let seats = app.fleet.seat_map(aircraft.id).await.unwrap();

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id: flight.id,
            passenger_id: passenger.id,
            seat_id: economy_seat(&seats).id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    app.ledger.confirm_reservation(reservation.id).await.unwrap();

    let cancellation = app.ledger.cancel_reservation(reservation.id).await.unwrap();
    assert_eq!(cancellation.refund, 5_000);
}

#[tokio::test]
async fn cancel_rejected_after_departure() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();

    // Push the departure into the past
    app.store
        .mutate(|state| {
            let flight = state.flight_mut(flight_id)?;
            flight.departure = Utc::now() - Duration::hours(2);
            flight.arrival = Utc::now() + Duration::hours(1);
            Ok(())
        })
        .await
        .unwrap();

    let result = app.ledger.cancel_reservation(reservation.id).await;
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

#[tokio::test]
async fn booking_rejected_on_unbookable_flight() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    app.flights
        .set_status(flight_id, FlightStatus::Cancelled)
        .await
        .unwrap();

    let result = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: seats[0].id,
            price: None,
            notes: None,
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

#[tokio::test]
async fn ticket_lifecycle_and_passenger_deletion_rule() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: economy_seat(&seats).id,
            price: None,
            notes: Some("window please".to_string()),
        })
        .await
        .unwrap();
    let ticket = app.ledger.confirm_reservation(reservation.id).await.unwrap();

    // Deletion is blocked while the reservation is confirmed
    let blocked = app.passengers.delete_passenger(passenger_id).await;
    assert!(matches!(blocked, Err(Error::InvalidState(_))));

    // Boarding scan works once
    let used = app.tickets.mark_used(ticket.id).await.unwrap();
    assert_eq!(used.status, TicketStatus::Used);
    let again = app.tickets.mark_used(ticket.id).await;
    assert!(matches!(again, Err(Error::InvalidTransition { .. })));

    let by_barcode = app.tickets.find_by_barcode(&used.barcode).await.unwrap();
    assert_eq!(by_barcode.id, ticket.id);
}

#[tokio::test]
async fn completion_after_flight_ran() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: economy_seat(&seats).id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    app.ledger.confirm_reservation(reservation.id).await.unwrap();

    // Completion requires the flight to have completed
    let early = app.ledger.complete_reservation(reservation.id).await;
    assert!(matches!(early, Err(Error::InvalidState(_))));

    app.flights
        .set_status(flight_id, FlightStatus::Boarding)
        .await
        .unwrap();
    app.flights
        .set_status(flight_id, FlightStatus::Completed)
        .await
        .unwrap();

    let completed = app.ledger.complete_reservation(reservation.id).await.unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);

    let seat = app.fleet.get_seat(reservation.seat_id).await.unwrap();
    assert_eq!(seat.status, SeatStatus::Available);
}

#[tokio::test]
async fn statistics_reflect_ledger_state() {
    let app = test_app();
    let (flight_id, seats, passenger_id) = seed_flight(&app, 3).await;
    let stats = Statistics::new(app.store.clone());

    let reservation = app
        .ledger
        .create_reservation(CreateReservation {
            flight_id,
            passenger_id,
            seat_id: economy_seat(&seats).id,
            price: None,
            notes: None,
        })
        .await
        .unwrap();
    app.ledger.confirm_reservation(reservation.id).await.unwrap();

    let overview = stats.overview().await;
    assert_eq!(overview.total_flights, 1);
    assert_eq!(overview.reservations_confirmed, 1);
    assert_eq!(overview.tickets_issued, 1);

    let flights = stats.flight_report().await;
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].active_reservations, 1);
    assert_eq!(flights[0].confirmed_revenue, 10_000);
    assert_eq!(flights[0].seats_available, flights[0].seats_total - 1);

    let reservations = stats.reservation_report().await;
    assert_eq!(reservations.total, 1);
    assert_eq!(reservations.confirmed_revenue, 10_000);
}
