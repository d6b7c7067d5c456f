use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 8;

const BARCODE_PREFIX: &str = "BOL";
const BARCODE_HEX_LEN: usize = 12;
const HEX_ALPHABET: &[u8] = b"0123456789ABCDEF";

/// Generate a reservation code: 8 uppercase alphanumeric characters.
/// Uniqueness is enforced at insert time; callers regenerate on collision.
pub fn reservation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a ticket barcode: `BOL` followed by 12 uppercase hex characters.
/// The prefix+length format is an external contract with legacy scanners.
pub fn ticket_barcode() -> String {
    let mut rng = rand::thread_rng();
    let hex: String = (0..BARCODE_HEX_LEN)
        .map(|_| HEX_ALPHABET[rng.gen_range(0..HEX_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", BARCODE_PREFIX, hex)
}
