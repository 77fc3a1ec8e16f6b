//! Lenient conversion of modem field text into gauge values.
//!
//! A malformed field must never abort a scrape, so both conversions fall back
//! to `0.0` instead of returning an error.

/// Unit suffixes the modem appends, in the order they are tried.
const UNIT_SUFFIXES: [&str; 3] = ["dBmV", "dB", "Hz"];

const TRUTHY: [&str; 5] = ["1", "true", "locked", "yes", "on"];

/// `" 591000000 Hz"` -> `591000000.0`, `"-3.2 dBmV"` -> `-3.2`, `"n/a"` -> `0.0`
///
/// At most one suffix is stripped.
pub fn to_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let number = UNIT_SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed)
        .trim_end();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// `1.0` for `locked`, `Yes`, ` on `, ..., `0.0` for everything else.
pub fn to_bool_number(raw: &str) -> f64 {
    let value = raw.trim().to_lowercase();
    if TRUTHY.contains(&value.as_str()) {
        1.0
    } else {
        0.0
    }
}
