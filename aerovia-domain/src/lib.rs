pub mod events;
pub mod fleet;
pub mod flight;
pub mod passenger;
pub mod reservation;

pub use events::LedgerEvent;
pub use fleet::{Aircraft, AircraftStatus, Seat, SeatClass, SeatStatus};
pub use flight::{Flight, FlightStatus};
pub use passenger::Passenger;
pub use reservation::{Reservation, ReservationStatus, Ticket, TicketStatus};
