//! Host clock
//!
//! In real-time mode sleeps block the thread and wall time comes from the
//! host. Otherwise time only advances when the shell sleeps, which makes a
//! replayed script produce the same screen every run.

use std::thread;
use std::time::{Duration, Instant};

use btnos_core::traits::{LocalTime, SystemClock};
use chrono::{Datelike, Local, NaiveDateTime, TimeDelta, Timelike};

pub struct HostClock {
    mode: Mode,
}

enum Mode {
    Realtime { boot: Instant },
    Virtual { start: NaiveDateTime, elapsed_ms: u64 },
}

impl HostClock {
    /// Follow the host's clock and really sleep
    pub fn realtime() -> Self {
        Self {
            mode: Mode::Realtime {
                boot: Instant::now(),
            },
        }
    }

    /// Start at `start` and only move on when slept
    pub fn fixed(start: NaiveDateTime) -> Self {
        Self {
            mode: Mode::Virtual {
                start,
                elapsed_ms: 0,
            },
        }
    }
}

fn local_time(t: &NaiveDateTime) -> LocalTime {
    LocalTime {
        year: u16::try_from(t.year()).unwrap_or(0),
        month: t.month() as u8,
        day: t.day() as u8,
        hour: t.hour() as u8,
        minute: t.minute() as u8,
        second: t.second() as u8,
        weekday: t.weekday().num_days_from_monday() as u8,
    }
}

impl SystemClock for HostClock {
    fn now_ms(&mut self) -> u64 {
        match &self.mode {
            Mode::Realtime { boot } => u64::try_from(boot.elapsed().as_millis()).unwrap_or(u64::MAX),
            Mode::Virtual { elapsed_ms, .. } => *elapsed_ms,
        }
    }

    fn local_time(&mut self) -> LocalTime {
        match &self.mode {
            Mode::Realtime { .. } => local_time(&Local::now().naive_local()),
            Mode::Virtual { start, elapsed_ms } => {
                let ms = i64::try_from(*elapsed_ms).unwrap_or(i64::MAX);
                let now = start
                    .checked_add_signed(TimeDelta::milliseconds(ms))
                    .unwrap_or(*start);
                local_time(&now)
            }
        }
    }

    fn sleep_ms(&mut self, ms: u32) {
        match &mut self.mode {
            Mode::Realtime { .. } => thread::sleep(Duration::from_millis(u64::from(ms))),
            Mode::Virtual { elapsed_ms, .. } => *elapsed_ms += u64::from(ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
    }

    #[test]
    fn test_virtual_time_moves_only_on_sleep() {
        let mut clock = HostClock::fixed(start());
        assert_eq!(clock.now_ms(), 0);
        let t = clock.local_time();
        assert_eq!((t.year, t.month, t.day), (2024, 2, 29));
        assert_eq!((t.hour, t.minute, t.second), (23, 59, 59));
        // Thursday
        assert_eq!(t.weekday, 3);

        clock.sleep_ms(1500);
        assert_eq!(clock.now_ms(), 1500);
        let t = clock.local_time();
        assert_eq!((t.month, t.day, t.hour, t.second), (3, 1, 0, 0));
        assert_eq!(t.weekday, 4);
    }

    #[test]
    fn test_realtime_is_monotonic() {
        let mut clock = HostClock::realtime();
        let a = clock.now_ms();
        clock.sleep_ms(2);
        assert!(clock.now_ms() >= a + 2);
    }
}
