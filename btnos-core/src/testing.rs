//! In-memory drivers for exercising the shell off-target
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the tests of crates that build on it.

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use core::net::Ipv4Addr;

use crate::geometry::{Point, Rect};
use crate::traits::{
    AccessPoint, Color, Display, DisplayError, Font, Imu, ImuSample, LocalTime, PeripheralError,
    Peripherals, Power, Storage, StorageError, SystemClock, TouchController, TouchError, Wifi,
    MAX_SCAN_RESULTS,
};

/// One recorded display call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Clear(Color),
    Fill(Rect, Color),
    Outline(Rect, Color),
    Text {
        font: Font,
        text: String,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    },
    HLine {
        x: u16,
        y: u16,
        len: u16,
        color: Color,
    },
    Pixel {
        x: u16,
        y: u16,
        color: Color,
    },
}

impl Op {
    /// Large-font text op
    pub fn text(text: &str, x: u16, y: u16, fg: Color, bg: Color) -> Op {
        Op::Text {
            font: Font::Large,
            text: text.to_string(),
            x,
            y,
            fg,
            bg,
        }
    }
}

/// Display that records every call
#[derive(Debug, Default)]
pub struct MockDisplay {
    pub ops: Vec<Op>,
    /// Fail every call with this error
    pub fail: Option<DisplayError>,
}

impl MockDisplay {
    /// Every string drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }

    /// Text ops drawn with a given background
    pub fn text_with_bg(&self, needle: &str, bg: Color) -> bool {
        self.ops.iter().any(|op| {
            matches!(op, Op::Text { text, bg: b, .. } if text == needle && *b == bg)
        })
    }

    fn record(&mut self, op: Op) -> Result<(), DisplayError> {
        if let Some(e) = self.fail {
            return Err(e);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Display for MockDisplay {
    fn size(&self) -> (u16, u16) {
        (320, 240)
    }

    fn clear(&mut self, color: Color) -> Result<(), DisplayError> {
        self.record(Op::Clear(color))
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.record(Op::Fill(rect, color))
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.record(Op::Outline(rect, color))
    }

    fn draw_text(
        &mut self,
        font: Font,
        text: &str,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError> {
        self.record(Op::Text {
            font,
            text: text.to_string(),
            x,
            y,
            fg,
            bg,
        })
    }

    fn draw_hline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), DisplayError> {
        self.record(Op::HLine { x, y, len, color })
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), DisplayError> {
        self.record(Op::Pixel { x, y, color })
    }
}

/// Touch controller that replays a fixed list of readings
///
/// Each read consumes one entry; once empty it reports no contact.
#[derive(Debug, Default)]
pub struct ScriptedTouch {
    script: VecDeque<Option<Point>>,
    pub reads: usize,
}

impl ScriptedTouch {
    pub fn new(script: impl IntoIterator<Item = Option<Point>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            reads: 0,
        }
    }

    /// Append `count` copies of a reading
    pub fn hold(&mut self, point: Option<Point>, count: usize) {
        for _ in 0..count {
            self.script.push_back(point);
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TouchController for ScriptedTouch {
    fn read_point(&mut self) -> Result<Option<Point>, TouchError> {
        self.reads += 1;
        Ok(self.script.pop_front().flatten())
    }
}

/// Clock that only advances when slept on
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    pub now_ms: u64,
    pub local: LocalTime,
}

impl FakeClock {
    pub fn at(local: LocalTime) -> Self {
        Self { now_ms: 0, local }
    }
}

impl SystemClock for FakeClock {
    fn now_ms(&mut self) -> u64 {
        self.now_ms
    }

    fn local_time(&mut self) -> LocalTime {
        self.local
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
    }
}

/// Records power requests
#[derive(Debug, Default)]
pub struct FakePower {
    pub calls: Vec<&'static str>,
}

impl Power for FakePower {
    fn power_down(&mut self) {
        self.calls.push("power_down");
    }

    fn hard_reset(&mut self) {
        self.calls.push("hard_reset");
    }
}

/// Radio that associates after a number of status polls
#[derive(Debug, Default)]
pub struct FakeWifi {
    pub connected: bool,
    /// `None` never associates
    pub connect_after_polls: Option<u32>,
    pub polls: u32,
    pub connecting: bool,
    pub networks: Vec<(&'static str, i8)>,
    pub joined: Option<String>,
}

impl Wifi for FakeWifi {
    fn is_connected(&mut self) -> bool {
        if self.connecting {
            self.polls += 1;
            if self.connect_after_polls.is_some_and(|n| self.polls >= n) {
                self.connecting = false;
                self.connected = true;
            }
        }
        self.connected
    }

    fn begin_connect(&mut self, essid: &str, _password: &str) -> Result<(), PeripheralError> {
        self.connecting = true;
        self.polls = 0;
        self.joined = Some(essid.to_string());
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connecting = false;
        self.connected = false;
    }

    fn address(&mut self) -> Ipv4Addr {
        if self.connected {
            Ipv4Addr::new(192, 168, 1, 42)
        } else {
            Ipv4Addr::UNSPECIFIED
        }
    }

    fn scan(
        &mut self,
        out: &mut heapless::Vec<AccessPoint, MAX_SCAN_RESULTS>,
    ) -> Result<(), PeripheralError> {
        out.clear();
        for (ssid, rssi) in &self.networks {
            let mut name = heapless::String::new();
            let _ = name.push_str(ssid);
            if out.push(AccessPoint { ssid: name, rssi: *rssi }).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// IMU returning a fixed reading
#[derive(Debug, Default)]
pub struct FakeImu {
    pub reading: ImuSample,
    pub offset: [f32; 3],
    pub samples: u32,
    pub fail: bool,
}

impl Imu for FakeImu {
    fn calibrate(&mut self) -> Result<[f32; 3], PeripheralError> {
        Ok(self.offset)
    }

    fn sample(&mut self) -> Result<ImuSample, PeripheralError> {
        if self.fail {
            return Err(PeripheralError::Io);
        }
        self.samples += 1;
        Ok(self.reading)
    }
}

/// In-memory SD card
#[derive(Debug, Default)]
pub struct FakeStorage {
    pub mounted: bool,
    pub files: Vec<(String, Vec<u8>)>,
    /// Paths removed, in order
    pub removed: Vec<String>,
    pub bus_releases: u32,
}

impl FakeStorage {
    pub fn contents(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.as_slice())
    }

    fn file_mut(&mut self, path: &str) -> Result<&mut Vec<u8>, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        self.files
            .iter_mut()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data)
            .ok_or(StorageError::NotFound)
    }
}

impl Storage for FakeStorage {
    fn mount(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Err(StorageError::AlreadyMounted);
        }
        self.mounted = true;
        Ok(())
    }

    fn create(&mut self, path: &str) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        self.files.retain(|(p, _)| p != path);
        self.files.push((path.to_string(), Vec::new()));
        Ok(())
    }

    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        self.file_mut(path)?.extend_from_slice(data);
        Ok(())
    }

    fn file_size(&mut self, path: &str) -> Result<u32, StorageError> {
        Ok(self.file_mut(path)?.len() as u32)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.file_mut(path)?;
        self.files.retain(|(p, _)| p != path);
        self.removed.push(path.to_string());
        Ok(())
    }

    fn release_bus(&mut self) {
        self.bus_releases += 1;
    }
}

/// All fakes in one bundle
#[derive(Debug, Default)]
pub struct FakePeripherals {
    pub power: FakePower,
    pub wifi: FakeWifi,
    pub imu: FakeImu,
    pub storage: FakeStorage,
}

impl Peripherals for FakePeripherals {
    fn power(&mut self) -> &mut dyn Power {
        &mut self.power
    }

    fn wifi(&mut self) -> &mut dyn Wifi {
        &mut self.wifi
    }

    fn imu(&mut self) -> &mut dyn Imu {
        &mut self.imu
    }

    fn storage(&mut self) -> &mut dyn Storage {
        &mut self.storage
    }
}

/// Centre of a rectangle, handy for scripting taps
pub fn center(rect: Rect) -> Point {
    Point::new(rect.x + rect.w / 2, rect.y + rect.h / 2)
}
