//! Text helpers for printed tickets and receipts.

use arenaticket_client::types::{luanda, parse_timestamp};
use chrono::{DateTime, Utc};

/// Kwanza amount without decimals, thousands grouped by spaces.
///
/// ```
/// # use arenaticket_admin::printer::format_currency;
/// assert_eq!(format_currency(15000.0), "15 000 Kz");
/// assert_eq!(format_currency(999.6), "1 000 Kz");
/// ```
#[must_use]
pub fn format_currency(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{grouped} Kz")
}

/// Server timestamp as `dd/mm/yyyy HH:MM` in Luanda time.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn format_date(iso: &str) -> String {
    parse_timestamp(iso).map_or_else(|| iso.to_string(), format_instant)
}

/// Instant as `dd/mm/yyyy HH:MM` in Luanda time.
#[must_use]
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.with_timezone(&luanda()).format("%d/%m/%Y %H:%M").to_string()
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
