//! Console glyphs and size formatting for the conversion summary

use console::Emoji;

/// Marks a written output file
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Marks the inlined-references count
pub const INFO: Emoji = Emoji("ℹ️", "i");

/// Marks skipped references
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Size of inlined data for the summary line
///
/// Whole bytes below 1 KiB, otherwise two decimals in the largest binary unit
/// that keeps the value at or above one.
///
/// # Examples
///
/// ```
/// use css_datauri::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(2048), "2.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
