pub mod flights;
pub mod pricing;
pub mod seating;

pub use flights::{ensure_flight_transition, validate_new_flight, NewFlight};
pub use pricing::price_for_class;
pub use seating::{generate_seats, SeatPlan};
