//! Time service trait with desktop and fixed implementations.

use pocket_types::error::Result;

/// A simple wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SystemTime {
    /// Short `HH:MM` form used by the lock screen and the home clock widget.
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::fmt::Display for SystemTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Abstraction over platform time services.
pub trait TimeService {
    /// Current wall-clock time.
    fn now(&self) -> Result<SystemTime>;
}

/// Desktop implementation backed by `std::time`.
#[derive(Debug, Default)]
pub struct DesktopPlatform;

impl DesktopPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl TimeService for DesktopPlatform {
    fn now(&self) -> Result<SystemTime> {
        use std::time::SystemTime as StdTime;
        let secs = StdTime::now()
            .duration_since(StdTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Ok(from_unix_secs(secs))
    }
}

/// A clock frozen at a given instant. Used by tests and scripted sessions.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl TimeService for FixedClock {
    fn now(&self) -> Result<SystemTime> {
        Ok(self.0)
    }
}

/// Break a Unix timestamp down to UTC calendar fields.
pub(crate) fn from_unix_secs(secs: u64) -> SystemTime {
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let (year, month, day) = days_to_ymd(days);
    SystemTime {
        year,
        month,
        day,
        hour: (time_of_day / 3600) as u8,
        minute: ((time_of_day % 3600) / 60) as u8,
        second: (time_of_day % 60) as u8,
    }
}

/// Convert days since Unix epoch to (year, month, day).
pub(crate) fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let feb = if is_leap(year) { 29 } else { 28 };
    let month_days: [u64; 12] = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 12u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    (year, month, (days + 1) as u8)
}

pub(crate) fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}
