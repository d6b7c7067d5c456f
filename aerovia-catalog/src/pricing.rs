use aerovia_domain::SeatClass;

/// Canonical class multipliers in basis points per hundred (1.0 = 100).
///
/// Historical systems carried a second table (2.5/1.8/1.0) in one code
/// path; this one is the table of record. Anyone migrating priced data
/// from the old service path must renormalize against it.
fn class_multiplier_pct(class: SeatClass) -> i64 {
    match class {
        SeatClass::Economy => 100,
        SeatClass::Premium => 150,
        SeatClass::First => 200,
    }
}

/// Price a seat class off the flight's base price (cents). Integer math,
/// truncating division; base prices are whole cents so the multipliers
/// above never lose precision in practice.
pub fn price_for_class(base_price: i64, class: SeatClass) -> i64 {
    base_price * class_multiplier_pct(class) / 100
}
