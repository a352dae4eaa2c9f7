//! Uptime arithmetic.

use serde::{Deserialize, Serialize};

pub const SECOND_SECONDS: u64 = 1;
pub const MINUTE_SECONDS: u64 = 60;
pub const HOUR_SECONDS: u64 = 60 * MINUTE_SECONDS;
pub const DAY_SECONDS: u64 = 24 * HOUR_SECONDS;
pub const WEEK_SECONDS: u64 = 7 * DAY_SECONDS;
/// 365-day year, no leap-year adjustment.
pub const YEAR_SECONDS: u64 = 365 * DAY_SECONDS;

/// Total seconds for an uptime expressed in calendar units.
pub fn to_seconds(years: u64, weeks: u64, days: u64, hours: u64, minutes: u64, seconds: u64) -> f64 {
    [
        (years, YEAR_SECONDS),
        (weeks, WEEK_SECONDS),
        (days, DAY_SECONDS),
        (hours, HOUR_SECONDS),
        (minutes, MINUTE_SECONDS),
        (seconds, SECOND_SECONDS),
    ]
    .iter()
    .map(|&(count, unit)| count as f64 * unit as f64)
    .sum()
}

/// Uptime split into the units the device reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimeParts {
    pub years: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl UptimeParts {
    /// Total uptime in seconds.
    pub fn total_seconds(&self) -> f64 {
        to_seconds(
            self.years,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_multipliers() {
        assert_eq!(to_seconds(0, 0, 0, 0, 0, 1), 1.0);
        assert_eq!(to_seconds(0, 0, 0, 0, 1, 0), 60.0);
        assert_eq!(to_seconds(0, 0, 0, 1, 0, 0), 3600.0);
        assert_eq!(to_seconds(0, 0, 1, 0, 0, 0), 86400.0);
        assert_eq!(to_seconds(0, 1, 0, 0, 0, 0), 604800.0);
        assert_eq!(to_seconds(1, 0, 0, 0, 0, 0), 31536000.0);
    }

    #[test]
    fn test_linear() {
        let a = to_seconds(0, 2, 3, 4, 5, 6);
        let b = to_seconds(0, 1, 1, 1, 1, 1);
        assert_eq!(a + b, to_seconds(0, 3, 4, 5, 6, 7));
        assert_eq!(2.0 * b, to_seconds(0, 2, 2, 2, 2, 2));
    }

    #[test]
    fn test_parts_total() {
        let parts = UptimeParts {
            days: 3,
            hours: 15,
            ..Default::default()
        };
        assert_eq!(parts.total_seconds(), 313200.0);
        assert_eq!(UptimeParts::default().total_seconds(), 0.0);
    }
}
