use aerovia_core::{Error, Result};
use aerovia_domain::{Seat, SeatClass, SeatStatus};
use uuid::Uuid;

const MAX_ROWS: u32 = 100;
const MAX_COLUMNS: u32 = 20;

const FIRST_ROWS_END: u32 = 2;
const PREMIUM_ROWS_END: u32 = 6;

/// The seat grid of an aircraft: rows by lettered columns.
#[derive(Debug, Clone, Copy)]
pub struct SeatPlan {
    pub rows: u32,
    pub columns: u32,
}

impl SeatPlan {
    pub fn new(rows: u32, columns: u32) -> Result<Self> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(Error::Validation(format!(
                "rows must be between 1 and {}",
                MAX_ROWS
            )));
        }
        if columns == 0 || columns > MAX_COLUMNS {
            return Err(Error::Validation(format!(
                "columns must be between 1 and {}",
                MAX_COLUMNS
            )));
        }
        Ok(Self { rows, columns })
    }

    pub fn capacity(&self) -> u32 {
        self.rows * self.columns
    }
}

/// Class bands by row: rows 1-2 first, 3-6 premium, 7+ economy.
fn class_for_row(row: u32) -> SeatClass {
    if row <= FIRST_ROWS_END {
        SeatClass::First
    } else if row <= PREMIUM_ROWS_END {
        SeatClass::Premium
    } else {
        SeatClass::Economy
    }
}

fn column_letter(index: u32) -> String {
    // Columns run A..T for the supported grid widths
    char::from(b'A' + index as u8).to_string()
}

/// Deterministically lay out all seats for one aircraft, numbered
/// `"{row}{column_letter}"` and classed by row band. Every seat starts
/// AVAILABLE.
pub fn generate_seats(aircraft_id: Uuid, plan: SeatPlan) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(plan.capacity() as usize);
    for row in 1..=plan.rows {
        for col in 0..plan.columns {
            let column = column_letter(col);
            seats.push(Seat {
                id: Uuid::new_v4(),
                aircraft_id,
                number: format!("{}{}", row, column),
                row,
                column,
                class: class_for_row(row),
                status: SeatStatus::Available,
            });
        }
    }
    seats
}
