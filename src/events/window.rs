//! Rolling query window: one calendar month back, one calendar year ahead

use chrono::{DateTime, Months, Utc};

/// clist filter format: ISO-8601 without fractional seconds or offset
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window around `now` using calendar-month arithmetic.
    ///
    /// Day-of-month is clamped when the target month is shorter
    /// (March 31 minus one month is February 28/29).
    pub fn around(now: DateTime<Utc>) -> Self {
        let start = now.checked_sub_months(Months::new(1)).unwrap_or(now);
        let end = now.checked_add_months(Months::new(12)).unwrap_or(now);
        Self { start, end }
    }

    pub fn current() -> Self {
        Self::around(Utc::now())
    }

    /// `start__gt` value
    pub fn start_param(&self) -> String {
        self.start.format(API_TIME_FORMAT).to_string()
    }

    /// `end__lt` value
    pub fn end_param(&self) -> String {
        self.end.format(API_TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap();
        let window = QueryWindow::around(now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 15, 8, 30, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_window_clamps_short_months() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let window = QueryWindow::around(now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());

        let leap = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let window = QueryWindow::around(leap);
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_params_drop_fractional_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 58).unwrap()
            + chrono::Duration::milliseconds(742);
        let window = QueryWindow::around(now);
        assert_eq!(window.start_param(), "2023-12-10T23:59:58");
        assert_eq!(window.end_param(), "2025-01-10T23:59:58");
    }
}
