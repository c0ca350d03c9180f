//! Integer minor-unit money formatting.
//!
//! Totals never pass through floating point on their way to text: the major part is the integer
//! quotient by 100 and the minor part is the two-digit remainder.

const MINOR_PER_MAJOR: u64 = 100;

/// Format minor units as major units with two decimals: `123456` -> `"1234.56"`, `-5` -> `"-0.05"`.
pub fn format_minor_units(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        abs / MINOR_PER_MAJOR,
        abs % MINOR_PER_MAJOR
    )
}

/// Like [`format_minor_units`] but always carries an explicit sign: `"+12.30"`, `"-0.05"`.
pub fn format_signed_minor_units(minor: i64) -> String {
    let sign = if minor < 0 { '-' } else { '+' };
    let abs = minor.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        abs / MINOR_PER_MAJOR,
        abs % MINOR_PER_MAJOR
    )
}
