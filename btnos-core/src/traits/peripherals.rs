//! Power, radio, motion sensor and storage traits
//!
//! Apps reach these through the [`Peripherals`] bundle so that the dispatcher
//! can hand a single `&mut dyn Peripherals` to every handler.

use core::fmt;
use core::net::Ipv4Addr;
use core::ops::{Deref, DerefMut};

use heapless::{String, Vec};

/// Errors from radio and sensor peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralError {
    /// Peripheral not initialized or powered down
    NotReady,
    /// Operation did not finish in time
    Timeout,
    /// Bus or radio transfer failed
    Io,
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeripheralError::NotReady => f.write_str("peripheral not ready"),
            PeripheralError::Timeout => f.write_str("peripheral timed out"),
            PeripheralError::Io => f.write_str("peripheral io error"),
        }
    }
}

impl core::error::Error for PeripheralError {}

/// Errors from the SD card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No card mounted
    NotMounted,
    /// Mount requested while a card is already mounted
    AlreadyMounted,
    /// Path does not exist
    NotFound,
    /// Directory still has entries
    NotEmpty,
    /// Path is too long for the filesystem
    InvalidPath,
    /// Card read or write failed
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotMounted => f.write_str("card not mounted"),
            StorageError::AlreadyMounted => f.write_str("card already mounted"),
            StorageError::NotFound => f.write_str("no such file"),
            StorageError::NotEmpty => f.write_str("directory not empty"),
            StorageError::InvalidPath => f.write_str("invalid card path"),
            StorageError::Io => f.write_str("card io error"),
        }
    }
}

impl core::error::Error for StorageError {}

/// Power management IC
pub trait Power {
    /// Cut power to the device
    fn power_down(&mut self);

    /// Full reboot
    fn hard_reset(&mut self);
}

/// Maximum SSID length in bytes
pub const SSID_LEN: usize = 32;

/// Maximum number of scan results kept
pub const MAX_SCAN_RESULTS: usize = 24;

/// One access point from a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPoint {
    pub ssid: String<SSID_LEN>,
    /// Signal strength in dBm
    pub rssi: i8,
}

/// Station mode Wi-Fi radio
pub trait Wifi {
    fn is_connected(&mut self) -> bool;

    /// Start associating; completion is observed through `is_connected`
    fn begin_connect(&mut self, essid: &str, password: &str) -> Result<(), PeripheralError>;

    fn disconnect(&mut self);

    /// Station address, `0.0.0.0` when not connected
    fn address(&mut self) -> Ipv4Addr;

    /// Scan for access points, strongest first
    fn scan(&mut self, out: &mut Vec<AccessPoint, MAX_SCAN_RESULTS>) -> Result<(), PeripheralError>;
}

/// One IMU reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuSample {
    /// Acceleration in g
    pub accel: [f32; 3],
    /// Angular rate in deg/s
    pub gyro: [f32; 3],
    /// Die temperature in Celsius
    pub temperature_c: f32,
}

/// Six axis accelerometer and gyroscope
pub trait Imu {
    /// Measure the gyro zero offset while the device is at rest
    fn calibrate(&mut self) -> Result<[f32; 3], PeripheralError>;

    fn sample(&mut self) -> Result<ImuSample, PeripheralError>;
}

/// SD card filesystem
///
/// The card shares its SPI bus with the display. Every user must call
/// [`Storage::release_bus`] when done; [`StorageSession`] does this on drop.
pub trait Storage {
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Create or truncate a file
    fn create(&mut self, path: &str) -> Result<(), StorageError>;

    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    fn file_size(&mut self, path: &str) -> Result<u32, StorageError>;

    /// Remove a file, or a directory if it is empty
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;

    /// Hand the SPI bus back to the display
    fn release_bus(&mut self);
}

/// Bundle of the non-UI peripherals
pub trait Peripherals {
    fn power(&mut self) -> &mut dyn Power;
    fn wifi(&mut self) -> &mut dyn Wifi;
    fn imu(&mut self) -> &mut dyn Imu;
    fn storage(&mut self) -> &mut dyn Storage;
}

/// Mounted SD card, releases the bus when dropped
pub struct StorageSession<'a> {
    storage: &'a mut dyn Storage,
}

impl<'a> StorageSession<'a> {
    /// Mount the card
    ///
    /// A card that is already mounted is reused. On any other failure the
    /// bus is released before returning.
    pub fn open(storage: &'a mut dyn Storage) -> Result<Self, StorageError> {
        match storage.mount() {
            Ok(()) => Ok(Self { storage }),
            Err(StorageError::AlreadyMounted) => {
                debug!("sd card already mounted");
                Ok(Self { storage })
            }
            Err(e) => {
                storage.release_bus();
                Err(e)
            }
        }
    }
}

impl<'a> Deref for StorageSession<'a> {
    type Target = dyn Storage + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.storage
    }
}

impl<'a> DerefMut for StorageSession<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.storage
    }
}

impl Drop for StorageSession<'_> {
    fn drop(&mut self) {
        self.storage.release_bus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingStorage {
        mount_result: Option<StorageError>,
        releases: u32,
        appended: usize,
    }

    impl Storage for CountingStorage {
        fn mount(&mut self) -> Result<(), StorageError> {
            match self.mount_result {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
        fn create(&mut self, _path: &str) -> Result<(), StorageError> {
            Ok(())
        }
        fn append(&mut self, _path: &str, data: &[u8]) -> Result<(), StorageError> {
            self.appended += data.len();
            Ok(())
        }
        fn file_size(&mut self, _path: &str) -> Result<u32, StorageError> {
            Ok(self.appended as u32)
        }
        fn remove(&mut self, _path: &str) -> Result<(), StorageError> {
            Ok(())
        }
        fn release_bus(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    fn test_session_releases_bus_on_drop() {
        let mut storage = CountingStorage::default();
        {
            let mut session = StorageSession::open(&mut storage).unwrap();
            session.append("/a.csv", b"abc").unwrap();
        }
        assert_eq!(storage.releases, 1);
        assert_eq!(storage.appended, 3);
    }

    #[test]
    fn test_already_mounted_is_reused() {
        let mut storage = CountingStorage {
            mount_result: Some(StorageError::AlreadyMounted),
            ..Default::default()
        };
        let session = StorageSession::open(&mut storage);
        assert!(session.is_ok());
        drop(session);
        assert_eq!(storage.releases, 1);
    }

    #[test]
    fn test_failed_mount_still_releases() {
        let mut storage = CountingStorage {
            mount_result: Some(StorageError::Io),
            ..Default::default()
        };
        assert_eq!(
            StorageSession::open(&mut storage).err(),
            Some(StorageError::Io)
        );
        assert_eq!(storage.releases, 1);
    }
}
