//! Coarse human-readable time spans ("2 hr 5 min", "3.4 sec", "12 days ago").
//!
//! Presentation only; nothing in the model branches on these strings.

const ONE_SECOND: i64 = 1_000;
const ONE_MINUTE: i64 = 60 * ONE_SECOND;
const ONE_HOUR: i64 = 60 * ONE_MINUTE;
const ONE_DAY: i64 = 24 * ONE_HOUR;
const ONE_MONTH: i64 = 30 * ONE_DAY;
const ONE_YEAR: i64 = 365 * ONE_DAY;

/// Format a span of milliseconds using its two most significant units.
///
/// The second unit is printed, even when zero, while the first is below 10.
/// Negative input is treated as zero.
pub fn time_span_string(millis: i64) -> String {
    let millis = millis.max(0);

    let years = millis / ONE_YEAR;
    let rest = millis % ONE_YEAR;
    let months = rest / ONE_MONTH;
    let rest = rest % ONE_MONTH;
    let days = rest / ONE_DAY;
    let rest = rest % ONE_DAY;
    let hours = rest / ONE_HOUR;
    let rest = rest % ONE_HOUR;
    let minutes = rest / ONE_MINUTE;
    let rest = rest % ONE_MINUTE;
    let seconds = rest / ONE_SECOND;
    let millisecs = rest % ONE_SECOND;

    if years > 0 {
        two_units(years, "yr", months, "mo")
    } else if months > 0 {
        two_units(months, "mo", days, day_unit(days))
    } else if days > 0 {
        two_units(days, day_unit(days), hours, "hr")
    } else if hours > 0 {
        two_units(hours, "hr", minutes, "min")
    } else if minutes > 0 {
        two_units(minutes, "min", seconds, "sec")
    } else if seconds >= 10 {
        format!("{} sec", seconds)
    } else if seconds >= 1 {
        format!("{} sec", trim_decimal(seconds as f64 + (millisecs / 100) as f64 / 10.0))
    } else if millisecs >= 100 {
        format!("{} sec", trim_decimal((millisecs / 10) as f64 / 100.0))
    } else {
        format!("{} ms", millisecs)
    }
}

/// `time_span_string` followed by "ago".
pub fn past_time_string(millis: i64) -> String {
    format!("{} ago", time_span_string(millis))
}

fn two_units(big: i64, big_unit: &str, small: i64, small_unit: &str) -> String {
    if big < 10 {
        format!("{} {} {} {}", big, big_unit, small, small_unit)
    } else {
        format!("{} {}", big, big_unit)
    }
}

fn day_unit(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

fn trim_decimal(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_values() {
        assert_eq!(time_span_string(0), "0 ms");
        assert_eq!(time_span_string(42), "42 ms");
        assert_eq!(time_span_string(250), "0.25 sec");
    }

    #[test]
    fn seconds_keep_one_decimal_below_ten() {
        assert_eq!(time_span_string(3_000), "3 sec");
        assert_eq!(time_span_string(3_450), "3.4 sec");
        assert_eq!(time_span_string(12_999), "12 sec");
    }

    #[test]
    fn two_leading_units() {
        assert_eq!(time_span_string(ONE_HOUR + 5 * ONE_MINUTE), "1 hr 5 min");
        assert_eq!(time_span_string(3 * ONE_HOUR), "3 hr 0 min");
        assert_eq!(time_span_string(12 * ONE_HOUR + 5 * ONE_MINUTE), "12 hr");
        assert_eq!(time_span_string(ONE_DAY + 2 * ONE_HOUR), "1 day 2 hr");
        assert_eq!(time_span_string(2 * ONE_DAY), "2 days 0 hr");
        assert_eq!(time_span_string(ONE_MONTH + ONE_DAY), "1 mo 1 day");
        assert_eq!(time_span_string(2 * ONE_YEAR + ONE_MONTH), "2 yr 1 mo");
    }

    #[test]
    fn zero_second_unit_is_kept_below_ten() {
        assert_eq!(time_span_string(ONE_MINUTE), "1 min 0 sec");
        assert_eq!(time_span_string(ONE_DAY), "1 day 0 hr");
        assert_eq!(time_span_string(ONE_YEAR), "1 yr 0 mo");
        assert_eq!(time_span_string(10 * ONE_MINUTE), "10 min");
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(time_span_string(-5), "0 ms");
    }

    #[test]
    fn past_time_appends_ago() {
        assert_eq!(past_time_string(3 * ONE_HOUR), "3 hr 0 min ago");
    }
}
