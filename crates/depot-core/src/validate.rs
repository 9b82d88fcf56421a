//! Field validators for protocol lines and startup arguments.
//!
//! All numeric fields are unsigned decimal: ASCII digits only, the entire
//! field consumed, no sign characters. Protocol values must be positive;
//! only startup seed quantities admit zero.

/// A valid name (depot or good): non-empty, and free of space, newline,
/// carriage return, and the field separator. U+FFFD is rejected too, so a
/// field that arrived as invalid UTF-8 and was decoded lossily can never
/// name a neighbour or a good.
pub fn valid_name(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| !matches!(c, ' ' | '\n' | '\r' | ':' | '\u{FFFD}'))
}

fn parse_decimal(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overflow of u64 rejects the field outright.
    field.parse::<u64>().ok()
}

/// A protocol quantity: positive, within the signed 32-bit range.
pub fn parse_qty(field: &str) -> Option<u32> {
    parse_decimal(field)
        .filter(|&v| v > 0 && v <= i32::MAX as u64)
        .map(|v| v as u32)
}

/// A listening port: positive, fits 16 bits.
pub fn parse_port(field: &str) -> Option<u16> {
    parse_decimal(field)
        .filter(|&v| v > 0 && v <= u16::MAX as u64)
        .map(|v| v as u16)
}

/// A defer key: positive.
pub fn parse_key(field: &str) -> Option<u64> {
    parse_decimal(field).filter(|&v| v > 0)
}

/// A startup seed quantity: zero allowed, within the signed 32-bit range.
pub fn parse_seed_qty(field: &str) -> Option<i32> {
    parse_decimal(field)
        .filter(|&v| v <= i32::MAX as u64)
        .map(|v| v as i32)
}
