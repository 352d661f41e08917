//! Human-readable formatting for sizes, durations and counters
//!
//! These strings are shown to the user verbatim, so the exact output is part
//! of the contract.

const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count using powers of 1024, two decimals, capped at GB.
///
/// ```
/// use tikloader::utils::format::format_bytes;
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit < BYTE_UNITS.len() - 1 && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let (whole, hundredths) = round_half_up(bytes, divisor, 100);
    format!("{}.{:02} {}", whole, hundredths, BYTE_UNITS[unit])
}

/// `value / divisor` split into whole and fractional parts at `scale`
/// (10 for one decimal, 100 for two), rounding ties away from zero.
fn round_half_up(value: u64, divisor: u64, scale: u64) -> (u128, u128) {
    let (value, divisor, scale) = (value as u128, divisor as u128, scale as u128);
    let scaled = (value * scale * 2 + divisor) / (divisor * 2);
    (scaled / scale, scaled % scale)
}

/// `m:ss` with unpadded minutes; hours are not rolled over.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Compact counter: `999`, `1.5K`, `2.3M`
pub fn format_number(n: u64) -> String {
    let (divisor, suffix) = if n >= 1_000_000 {
        (1_000_000, "M")
    } else if n >= 1_000 {
        (1_000, "K")
    } else {
        return n.to_string();
    };
    let (whole, tenths) = round_half_up(n, divisor, 10);
    format!("{}.{}{}", whole, tenths, suffix)
}
