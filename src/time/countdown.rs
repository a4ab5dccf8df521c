const MS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Remaining time until the countdown target, in whole milliseconds.
///
/// The value is signed: stepping the animation past the target keeps subtracting seconds and the
/// duration goes negative. Decomposition into [`TimeComponents`] saturates at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountdownDuration {
    millis: i64,
}

impl CountdownDuration {
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            millis: secs * MS_PER_SECOND,
        }
    }

    pub const fn as_millis(self) -> i64 {
        self.millis
    }

    pub fn total_seconds(self) -> i64 {
        self.millis.div_euclid(MS_PER_SECOND)
    }

    pub fn total_minutes(self) -> i64 {
        self.millis.div_euclid(MS_PER_SECOND * SECONDS_PER_MINUTE)
    }

    pub fn total_hours(self) -> i64 {
        self.millis.div_euclid(MS_PER_SECOND * SECONDS_PER_HOUR)
    }

    pub fn total_days(self) -> i64 {
        self.millis.div_euclid(MS_PER_SECOND * SECONDS_PER_DAY)
    }

    pub fn is_positive(self) -> bool {
        self.millis > 0
    }

    /// Step one animation frame back in time.
    pub fn subtract_second(&mut self) {
        self.millis = self.millis.saturating_sub(MS_PER_SECOND);
    }

    /// Split into days/hours/minutes/seconds.
    ///
    /// Each unit is the floored total minus the larger units already taken, so the sub-day units
    /// stay in `0..24`, `0..60`, `0..60`. Durations at or below zero yield all zeros.
    pub fn components(self) -> TimeComponents {
        if self.millis <= 0 {
            return TimeComponents::default();
        }

        let days = self.total_days();
        let hours = self.total_hours() - days * 24;
        let minutes = self.total_minutes() - days * 24 * 60 - hours * 60;
        let seconds = self.total_seconds()
            - days * SECONDS_PER_DAY
            - hours * SECONDS_PER_HOUR
            - minutes * SECONDS_PER_MINUTE;

        TimeComponents {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds: seconds as u64,
        }
    }
}

/// Counter values shown on one frame, in display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TimeComponents {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeComponents {
    pub fn values(self) -> [u64; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }

    /// Zero-padded display strings: `[days, hours, minutes, seconds]`.
    pub fn padded(self) -> [String; 4] {
        self.values().map(pad2)
    }
}

/// Pad to at least two digits; wider values keep their natural width.
pub fn pad2(v: u64) -> String {
    format!("{v:02}")
}
