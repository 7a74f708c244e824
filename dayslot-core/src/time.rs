//! Time utilities: minutes-from-midnight <-> wall-clock text.

use crate::task::Minutes;
use anyhow::Result;
use chrono::{NaiveTime, Timelike};

const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Parse a clock time like "8:00am", "12:30 PM" or "14:05" into minutes
/// from midnight.
pub fn parse_clock(text: &str) -> Result<Minutes> {
    let mut normalized = text.trim().to_lowercase().replace(' ', "");

    let parsed = if normalized.ends_with("am") || normalized.ends_with("pm") {
        // "9pm" -> "9:00pm"
        if !normalized.contains(':') {
            normalized.insert_str(normalized.len() - 2, ":00");
        }
        NaiveTime::parse_from_str(&normalized, "%I:%M%p")
    } else {
        NaiveTime::parse_from_str(&normalized, "%H:%M")
    };

    let t = parsed.map_err(|e| anyhow::anyhow!("invalid clock time '{text}': {e}"))?;
    Ok(t.hour() * 60 + t.minute())
}

/// Format minutes from midnight as "8:00am". Times past midnight wrap and
/// are marked with "(+Nd)".
pub fn format_clock(minutes: Minutes) -> String {
    let days = minutes / MINUTES_PER_DAY;
    let of_day = minutes % MINUTES_PER_DAY;
    let clock = NaiveTime::from_hms_opt(of_day / 60, of_day % 60, 0)
        .map(|t| t.format("%-I:%M%P").to_string())
        .unwrap_or_else(|| format!("{}h{:02}", of_day / 60, of_day % 60));

    if days == 0 {
        clock
    } else {
        format!("{clock} (+{days}d)")
    }
}

/// Format an elapsed span as "2h05min".
pub fn format_elapsed(minutes: Minutes) -> String {
    format!("{}h{:02}min", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twelve_and_twenty_four_hour_clocks() {
        assert_eq!(parse_clock("8:00am").unwrap(), 480);
        assert_eq!(parse_clock("12:30 PM").unwrap(), 750);
        assert_eq!(parse_clock("12:00am").unwrap(), 0);
        assert_eq!(parse_clock("9pm").unwrap(), 1260);
        assert_eq!(parse_clock("14:05").unwrap(), 845);
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("breakfast").is_err());
    }

    #[test]
    fn formats_clock_and_elapsed() {
        assert_eq!(format_clock(480), "8:00am");
        assert_eq!(format_clock(725), "12:05pm");
        assert_eq!(format_clock(0), "12:00am");
        assert_eq!(format_clock(1445), "12:05am (+1d)");
        assert_eq!(format_elapsed(125), "2h05min");
        assert_eq!(format_elapsed(0), "0h00min");
    }
}
