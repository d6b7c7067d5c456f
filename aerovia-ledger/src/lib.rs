pub mod fleet;
pub mod flights;
pub mod passengers;
pub mod reservations;
pub mod stats;
pub mod sweeper;
pub mod tickets;

pub use fleet::FleetService;
pub use flights::FlightService;
pub use passengers::PassengerService;
pub use reservations::{Cancellation, CreateReservation, ReservationFilter, ReservationLedger};
pub use stats::Statistics;
pub use sweeper::{ExpirySweeper, SweepOptions, SweepReport};
pub use tickets::TicketService;
