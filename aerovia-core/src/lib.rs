pub mod codes;
pub mod error;

pub use codes::{reservation_code, ticket_barcode};
pub use error::{Error, Result};
