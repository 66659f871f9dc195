//! Clock text for the title bar

use core::fmt::Write;

use heapless::String;

use crate::traits::{LocalTime, SystemClock};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formatted time, `HH:MM:SS` and `HH:MM:SS Www Mon D`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockText {
    pub time: String<8>,
    pub date: String<24>,
}

pub fn format(t: &LocalTime) -> ClockText {
    let mut time = String::new();
    let _ = write!(time, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second);

    let weekday = WEEKDAYS.get(usize::from(t.weekday)).copied().unwrap_or("???");
    let month = usize::from(t.month)
        .checked_sub(1)
        .and_then(|m| MONTHS.get(m))
        .copied()
        .unwrap_or("???");
    let mut date = String::new();
    let _ = write!(date, "{} {} {} {}", time, weekday, month, t.day);

    ClockText { time, date }
}

/// Read and format the current time
pub fn read(clock: &mut dyn SystemClock) -> ClockText {
    let text = format(&clock.local_time());
    debug!("clock {}", text.date.as_str());
    text
}
