//! Elapsed-time formatting for the `timer` display target.
//!
//! Two renderings exist: a compact human form (`"1d 1h 1min 1s"`) and a plain
//! rounded seconds count (`"90 seconds"`). Both take whole milliseconds.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// An elapsed time split into whole days, hours, minutes and seconds.
/// The sub-second remainder is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ElapsedParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedParts {
    /// Decomposes `ms`, consuming the largest unit first.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        let mut rest = ms;

        let days = rest / MS_PER_DAY;
        rest -= days * MS_PER_DAY;

        let hours = rest / MS_PER_HOUR;
        rest -= hours * MS_PER_HOUR;

        let minutes = rest / MS_PER_MINUTE;
        rest -= minutes * MS_PER_MINUTE;

        let seconds = rest / MS_PER_SECOND;

        ElapsedParts {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Milliseconds represented by the parts (always a whole number of seconds).
    #[must_use]
    pub fn to_millis(&self) -> u64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }
}

impl From<Duration> for ElapsedParts {
    fn from(d: Duration) -> Self {
        ElapsedParts::from_millis(duration_millis(d))
    }
}

impl fmt::Display for ElapsedParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Once a larger unit is shown, every smaller unit is shown too,
        // even when zero ("1h 0min 0s").
        let mut started = false;
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
            started = true;
        }
        if self.hours > 0 || started {
            write!(f, "{}h ", self.hours)?;
            started = true;
        }
        if self.minutes > 0 || started {
            write!(f, "{}min ", self.minutes)?;
        }
        write!(f, "{}s", self.seconds)
    }
}

/// Formats `ms` milliseconds as `(Nd )?(Nh )?(Nmin )?Ns`.
#[must_use]
pub fn format_millis(ms: u64) -> String {
    ElapsedParts::from_millis(ms).to_string()
}

/// Same as [`format_millis`] for a `Duration`, truncated to whole milliseconds.
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    format_millis(duration_millis(d))
}

/// Formats `ms` as a rounded seconds count, e.g. `"2 seconds"` for 1500 ms.
#[must_use]
pub fn format_seconds(ms: u64) -> String {
    let secs = ms / MS_PER_SECOND + u64::from(ms % MS_PER_SECOND >= MS_PER_SECOND / 2);
    format!("{secs} seconds")
}

/// Clamps durations beyond `u64::MAX` milliseconds (~584 million years).
#[inline]
pub fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Which rendering the `timer` target uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStyle {
    /// Rounded whole seconds: "93 seconds".
    Seconds,
    /// Largest applicable units: "1min 33s".
    #[default]
    Human,
}

impl TimerStyle {
    #[must_use]
    pub fn render(self, ms: u64) -> String {
        match self {
            TimerStyle::Seconds => format_seconds(ms),
            TimerStyle::Human => format_millis(ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_values() {
        assert_eq!(format_millis(0), "0s");
        assert_eq!(format_millis(999), "0s");
        assert_eq!(format_millis(1_000), "1s");
        assert_eq!(format_millis(61_000), "1min 1s");
        assert_eq!(format_millis(3_600_000), "1h 0min 0s");
        assert_eq!(format_millis(90_061_000), "1d 1h 1min 1s");
    }

    #[test]
    fn zero_fills_after_days() {
        assert_eq!(format_millis(MS_PER_DAY), "1d 0h 0min 0s");
        assert_eq!(format_millis(MS_PER_DAY + 5 * MS_PER_SECOND), "1d 0h 0min 5s");
    }

    #[test]
    fn minutes_without_hours() {
        assert_eq!(format_millis(59 * MS_PER_MINUTE + 59_999), "59min 59s");
        assert_eq!(format_millis(MS_PER_MINUTE), "1min 0s");
    }

    #[test]
    fn decomposes_into_parts() {
        let parts = ElapsedParts::from_millis(2 * MS_PER_DAY + 3 * MS_PER_HOUR + 4 * MS_PER_MINUTE + 5_678);
        assert_eq!(
            parts,
            ElapsedParts {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
            }
        );
        assert_eq!(parts.to_millis(), 2 * MS_PER_DAY + 3 * MS_PER_HOUR + 4 * MS_PER_MINUTE + 5_000);
    }

    #[test]
    fn duration_input_truncates_to_millis() {
        assert_eq!(format_elapsed(Duration::from_micros(1_999_999)), "1s");
        assert_eq!(format_elapsed(Duration::from_secs(3_661)), "1h 1min 1s");
        assert_eq!(ElapsedParts::from(Duration::from_secs(61)).minutes, 1);
    }

    #[test]
    fn huge_durations_do_not_overflow() {
        let s = format_elapsed(Duration::MAX);
        assert!(s.ends_with('s'));
        assert!(s.contains("d "));
    }

    #[test]
    fn seconds_variant_rounds_half_up() {
        assert_eq!(format_seconds(0), "0 seconds");
        assert_eq!(format_seconds(499), "0 seconds");
        assert_eq!(format_seconds(500), "1 seconds");
        assert_eq!(format_seconds(1_499), "1 seconds");
        assert_eq!(format_seconds(1_500), "2 seconds");
        assert_eq!(format_seconds(90_061_000), "90061 seconds");
    }

    #[test]
    fn style_dispatch() {
        assert_eq!(TimerStyle::Human.render(61_000), "1min 1s");
        assert_eq!(TimerStyle::Seconds.render(61_000), "61 seconds");
        assert_eq!(TimerStyle::default(), TimerStyle::Human);
    }
}
