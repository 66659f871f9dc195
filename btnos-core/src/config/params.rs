//! Device parameters shared with apps

use core::fmt::Write;

use heapless::String;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of a filesystem path
pub const PATH_LEN: usize = 48;

/// Longest IMU sampling interval offered by the Wait button
pub const IMU_WAIT_MAX_MS: u16 = 1000;
pub const IMU_WAIT_STEP_MS: u16 = 100;

/// Largest IMU capture offered by the Size button
pub const IMU_SIZE_MAX: u16 = 1000;
pub const IMU_SIZE_STEP: u16 = 20;

/// File format for recorded IMU captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImuLogFormat {
    #[default]
    Csv,
    Json,
}

/// Mutable settings read and written by apps
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceParams {
    /// Network to join from the Wi-Fi app
    pub essid: String<32>,
    pub password: String<64>,
    /// SD card mount point
    pub mount_dir: String<PATH_LEN>,
    /// Delay between IMU samples
    pub imu_wait_ms: u16,
    /// Number of IMU samples per capture
    pub imu_size: u16,
    pub json_file: String<PATH_LEN>,
    pub csv_file: String<PATH_LEN>,
    pub imu_log: ImuLogFormat,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            essid: String::new(),
            password: String::new(),
            mount_dir: path("/sd"),
            imu_wait_ms: 0,
            imu_size: 0,
            json_file: path("/imu.json"),
            csv_file: path("/imu.csv"),
            imu_log: ImuLogFormat::Csv,
        }
    }
}

fn path(s: &str) -> String<PATH_LEN> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

impl DeviceParams {
    /// File name used for the configured log format
    pub fn imu_file(&self) -> &str {
        match self.imu_log {
            ImuLogFormat::Csv => self.csv_file.as_str(),
            ImuLogFormat::Json => self.json_file.as_str(),
        }
    }

    /// Absolute path of the IMU log on the card
    ///
    /// Returns `None` if the joined path does not fit.
    pub fn imu_path(&self) -> Option<String<PATH_LEN>> {
        let mut out = String::new();
        write!(out, "{}{}", self.mount_dir, self.imu_file()).ok()?;
        Some(out)
    }

    /// Advance the sampling interval, wrapping past the maximum
    pub fn cycle_imu_wait(&mut self) -> u16 {
        self.imu_wait_ms = cycle(self.imu_wait_ms, IMU_WAIT_STEP_MS, IMU_WAIT_MAX_MS);
        self.imu_wait_ms
    }

    /// Advance the capture size, wrapping past the maximum
    pub fn cycle_imu_size(&mut self) -> u16 {
        self.imu_size = cycle(self.imu_size, IMU_SIZE_STEP, IMU_SIZE_MAX);
        self.imu_size
    }
}

fn cycle(value: u16, step: u16, max: u16) -> u16 {
    let next = value.saturating_add(step);
    if next > max {
        0
    } else {
        next
    }
}
