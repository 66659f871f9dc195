//! Wall clock and monotonic time trait

/// Broken-down local time as read from the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
}

/// Trait for the system clock
pub trait SystemClock {
    /// Milliseconds since boot, never decreasing
    fn now_ms(&mut self) -> u64;

    /// Current local time
    fn local_time(&mut self) -> LocalTime;

    /// Block for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32);
}
