//! Aerovia operations CLI: seed demo data, run the expiration sweeper,
//! print ledger statistics.

use std::process;
use std::sync::Arc;

use aerovia_catalog::flights::NewFlight;
use aerovia_ledger::{
    CreateReservation, ExpirySweeper, FleetService, FlightService, PassengerService,
    ReservationLedger, Statistics, SweepOptions,
};
use aerovia_store::{snapshot, Config, EventBus, MemoryStore};
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "aerovia", about = "Aerovia reservation ledger operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Populate the state snapshot with demo fleet, flights and passengers
    Seed,
    /// Expire stale pending reservations and release their seats
    Sweep(SweepArgs),
    /// Print system-wide statistics
    Stats,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// Report what would be expired without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Ignore the grace window and sweep everything past its deadline
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerovia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config not loaded ({}), using defaults", e);
        Config::default()
    });

    match cli.command {
        Commands::Seed => seed(&config).await,
        Commands::Sweep(args) => sweep(&config, args).await,
        Commands::Stats => stats(&config).await,
    }
}

async fn seed(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let fleet = FleetService::new(store.clone());
    let flights = FlightService::new(store.clone());
    let passengers = PassengerService::new(store.clone());
    let ledger = ReservationLedger::new(
        store.clone(),
        EventBus::default(),
        config.business_rules.clone(),
    );

    let a320 = fleet.register_aircraft("Airbus A320", 25, 6).await?;
    let e190 = fleet.register_aircraft("Embraer E190", 15, 4).await?;

    let now = Utc::now();
    let routes = [
        (&a320, "Lima", "Santiago", 2_i64, 85_000_i64),
        (&a320, "Santiago", "Lima", 3, 85_000),
        (&e190, "Lima", "Cusco", 1, 42_000),
    ];
    let mut flight_ids = Vec::new();
    for (aircraft, origin, destination, days_out, base_price) in routes {
        let flight = flights
            .create_flight(NewFlight {
                aircraft_id: aircraft.id,
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure: now + Duration::days(days_out),
                arrival: now + Duration::days(days_out) + Duration::hours(3),
                base_price,
            })
            .await?;
        flight_ids.push(flight.id);
    }

    let demo_passengers = [
        ("Ana", "Torres", "DNI-10000001", "ana.torres@example.com"),
        ("Luis", "Mora", "DNI-10000002", "luis.mora@example.com"),
        ("Eva", "Salas", "DNI-10000003", "eva.salas@example.com"),
        ("Jorge", "Paz", "DNI-10000004", "jorge.paz@example.com"),
    ];
    let mut passenger_ids = Vec::new();
    for (first, last, document, email) in demo_passengers {
        let p = passengers
            .register_passenger(first, last, document, email, None)
            .await?;
        passenger_ids.push(p.id);
    }

    // A couple of live reservations so sweep/stats have something to chew on
    let a320_seats = fleet.seat_map(a320.id).await?;
    let reservation = ledger
        .create_reservation(CreateReservation {
            flight_id: flight_ids[0],
            passenger_id: passenger_ids[0],
            seat_id: a320_seats[0].id,
            price: None,
            notes: None,
        })
        .await?;
    ledger.confirm_reservation(reservation.id).await?;

    ledger
        .create_reservation(CreateReservation {
            flight_id: flight_ids[0],
            passenger_id: passenger_ids[1],
            seat_id: a320_seats[1].id,
            price: None,
            notes: Some("aisle preferred".to_string()),
        })
        .await?;

    snapshot::save(&store, &config.store.snapshot_path).await?;
    println!(
        "seeded 2 aircraft, {} flights, {} passengers -> {}",
        flight_ids.len(),
        passenger_ids.len(),
        config.store.snapshot_path
    );
    Ok(())
}

async fn sweep(config: &Config, args: SweepArgs) -> anyhow::Result<()> {
    let store = Arc::new(snapshot::load(&config.store.snapshot_path).await?);
    let ledger = ReservationLedger::new(
        store.clone(),
        EventBus::default(),
        config.business_rules.clone(),
    );
    let sweeper = ExpirySweeper::new(store.clone(), ledger, config.business_rules.clone());

    let report = sweeper
        .run(SweepOptions {
            dry_run: args.dry_run,
            force: args.force,
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !args.dry_run {
        snapshot::save(&store, &config.store.snapshot_path).await?;
    }

    // Per-item failures are reported above, not fatal; only an
    // infrastructure error exits non-zero.
    Ok(())
}

async fn stats(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(snapshot::load(&config.store.snapshot_path).await?);
    let statistics = Statistics::new(store);

    let overview = statistics.overview().await;
    let flights = statistics.flight_report().await;
    let reservations = statistics.reservation_report().await;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "overview": overview,
            "flights": flights,
            "reservations": reservations,
        }))?
    );
    Ok(())
}
