//! Number and fight-time formatting for cooldown reports.
//!
//! Everything the presentation layer prints about a window (totals, rates,
//! fight-relative timestamps) goes through here so the text stays consistent.
//! European style swaps `.` and `,`.

fn europeanize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' => ',',
            ',' => '.',
            other => other,
        })
        .collect()
}

#[inline]
fn maybe_eu(s: String, european: bool) -> String {
    if european { europeanize(&s) } else { s }
}

/// Format a window total with K/M suffix.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_amount;
/// assert_eq!(format_amount(150, false), "150");
/// assert_eq!(format_amount(1_500, false), "1.50K");
/// assert_eq!(format_amount(2_250_000, false), "2.25M");
/// assert_eq!(format_amount(1_500, true), "1,50K");
/// ```
pub fn format_amount(n: i64, european: bool) -> String {
    let abs = n.unsigned_abs();
    let s = if abs >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    };
    maybe_eu(s, european)
}

/// Per-second rate of `total` over a window of `duration_ms`.
///
/// A zero-length window has no meaningful rate and yields `"0"`.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_rate;
/// assert_eq!(format_rate(150_000, 25_000, false), "6.00K");
/// assert_eq!(format_rate(10, 0, false), "0");
/// ```
pub fn format_rate(total: i64, duration_ms: i64, european: bool) -> String {
    if duration_ms <= 0 {
        return "0".to_string();
    }
    let per_sec = (total as f64 * 1000.0 / duration_ms as f64).round() as i64;
    format_amount(per_sec, european)
}

/// Share of `part` in `total` with one decimal.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_share;
/// assert_eq!(format_share(3, 10, false), "30.0%");
/// assert_eq!(format_share(3, 10, true), "30,0%");
/// assert_eq!(format_share(1, 0, false), "0%");
/// ```
pub fn format_share(part: i64, total: i64, european: bool) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    maybe_eu(format!("{:.1}%", part as f64 / total as f64 * 100.0), european)
}

/// Fight-relative time as `M:SS.mmm`.
///
/// Events before the pull (negative offsets) are clamped to `0:00.000`.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_fight_time;
/// assert_eq!(format_fight_time(1_000, 26_250), "0:25.250");
/// assert_eq!(format_fight_time(0, 125_004), "2:05.004");
/// assert_eq!(format_fight_time(5_000, 1_000), "0:00.000");
/// ```
pub fn format_fight_time(fight_start_ms: i64, timestamp_ms: i64) -> String {
    let offset = (timestamp_ms - fight_start_ms).max(0);
    let mins = offset / 60_000;
    let secs = (offset % 60_000) / 1000;
    let millis = offset % 1000;
    format!("{}:{:02}.{:03}", mins, secs, millis)
}

/// A window's span as `start - end`, or `start - open` while it has no end.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_window_span;
/// assert_eq!(format_window_span(0, 5_000, Some(30_000)), "0:05.000 - 0:30.000");
/// assert_eq!(format_window_span(0, 5_000, None), "0:05.000 - open");
/// ```
pub fn format_window_span(fight_start_ms: i64, start_ms: i64, end_ms: Option<i64>) -> String {
    let start = format_fight_time(fight_start_ms, start_ms);
    match end_ms {
        Some(end) => format!("{} - {}", start, format_fight_time(fight_start_ms, end)),
        None => format!("{} - open", start),
    }
}

/// Whole-second duration as `M:SS`.
///
/// # Examples
/// ```
/// use throughput_types::formatting::format_duration_ms;
/// assert_eq!(format_duration_ms(25_000), "0:25");
/// assert_eq!(format_duration_ms(125_900), "2:05");
/// ```
pub fn format_duration_ms(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0, false), "0");
        assert_eq!(format_amount(999, false), "999");
        assert_eq!(format_amount(1_000, false), "1.00K");
        assert_eq!(format_amount(999_999, false), "1000.00K");
        assert_eq!(format_amount(1_000_000, false), "1.00M");
        assert_eq!(format_amount(-1_500, false), "-1.50K");
    }

    #[test]
    fn test_format_amount_european() {
        assert_eq!(format_amount(500, true), "500");
        assert_eq!(format_amount(15_000, true), "15,00K");
        assert_eq!(format_amount(1_500_000, true), "1,50M");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(150, 25_000, false), "6");
        assert_eq!(format_rate(25_000, 1_000, false), "25.00K");
        assert_eq!(format_rate(25_000, -5, false), "0");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(1, 3, false), "33.3%");
        assert_eq!(format_share(0, 5, false), "0.0%");
        assert_eq!(format_share(5, 5, true), "100,0%");
    }

    #[test]
    fn test_format_fight_time() {
        assert_eq!(format_fight_time(0, 0), "0:00.000");
        assert_eq!(format_fight_time(0, 59_999), "0:59.999");
        assert_eq!(format_fight_time(0, 60_000), "1:00.000");
        assert_eq!(format_fight_time(10_000, 9_000), "0:00.000");
    }

    #[test]
    fn test_format_window_span() {
        assert_eq!(format_window_span(1_000, 1_000, Some(26_000)), "0:00.000 - 0:25.000");
        assert_eq!(format_window_span(0, 12_345, None), "0:12.345 - open");
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(0), "0:00");
        assert_eq!(format_duration_ms(59_999), "0:59");
        assert_eq!(format_duration_ms(-10), "0:00");
    }

    #[test]
    fn test_europeanize() {
        assert_eq!(europeanize("1.50K"), "1,50K");
        assert_eq!(europeanize("1,500,000"), "1.500.000");
        assert_eq!(europeanize("500"), "500");
    }
}
