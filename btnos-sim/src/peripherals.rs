//! Host stand-ins for the Core2's power IC, radio, IMU and SD card
//!
//! The SD card is a directory on the host: `/sd/imu.csv` on the device is
//! `<card dir>/sd/imu.csv` here.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::{Component, Path, PathBuf};

use btnos_core::config::PATH_LEN;
use btnos_core::traits::{
    AccessPoint, Imu, ImuSample, PeripheralError, Peripherals, Power, Storage, StorageError, Wifi,
    MAX_SCAN_RESULTS, SSID_LEN,
};
use log::{debug, info, trace, warn};

use crate::config::NetworkEntry;

/// Status polls before a known network reports connected
const ASSOCIATE_POLLS: u32 = 3;

/// Power requests seen so far
#[derive(Debug, Default)]
pub struct HostPower {
    pub requests: Vec<&'static str>,
}

impl Power for HostPower {
    fn power_down(&mut self) {
        info!("power down");
        self.requests.push("power_down");
    }

    fn hard_reset(&mut self) {
        warn!("hard reset");
        self.requests.push("hard_reset");
    }
}

#[derive(Debug)]
enum Link {
    Down,
    /// Associating with a known network
    Joining { polls: u32 },
    /// Target not in range, never completes
    Searching,
    Up,
}

/// Radio that sees a fixed list of access points
#[derive(Debug)]
pub struct SimWifi {
    networks: Vec<NetworkEntry>,
    link: Link,
}

impl SimWifi {
    pub fn new(networks: &[NetworkEntry]) -> Self {
        let mut networks = networks.to_vec();
        networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));
        Self {
            networks,
            link: Link::Down,
        }
    }
}

impl Wifi for SimWifi {
    fn is_connected(&mut self) -> bool {
        if let Link::Joining { polls } = &mut self.link {
            *polls += 1;
            if *polls >= ASSOCIATE_POLLS {
                self.link = Link::Up;
            }
        }
        matches!(self.link, Link::Up)
    }

    fn begin_connect(&mut self, essid: &str, _password: &str) -> Result<(), PeripheralError> {
        if essid.is_empty() {
            return Err(PeripheralError::NotReady);
        }
        self.link = if self.networks.iter().any(|n| n.ssid == essid) {
            debug!("joining '{}'", essid);
            Link::Joining { polls: 0 }
        } else {
            debug!("'{}' not in range", essid);
            Link::Searching
        };
        Ok(())
    }

    fn disconnect(&mut self) {
        self.link = Link::Down;
    }

    fn address(&mut self) -> Ipv4Addr {
        match self.link {
            Link::Up => Ipv4Addr::new(192, 168, 4, 23),
            _ => Ipv4Addr::UNSPECIFIED,
        }
    }

    fn scan(
        &mut self,
        out: &mut heapless::Vec<AccessPoint, MAX_SCAN_RESULTS>,
    ) -> Result<(), PeripheralError> {
        out.clear();
        for network in &self.networks {
            let mut ssid: heapless::String<SSID_LEN> = heapless::String::new();
            for c in network.ssid.chars() {
                if ssid.push(c).is_err() {
                    break;
                }
            }
            if out.push(AccessPoint { ssid, rssi: network.rssi }).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// IMU lying flat on a slowly rocking table
#[derive(Debug, Default)]
pub struct SimImu {
    ticks: u32,
}

impl Imu for SimImu {
    fn calibrate(&mut self) -> Result<[f32; 3], PeripheralError> {
        Ok([0.12, -0.31, 0.05])
    }

    fn sample(&mut self) -> Result<ImuSample, PeripheralError> {
        self.ticks = self.ticks.wrapping_add(1);
        let phase = self.ticks as f32 * 0.2;
        Ok(ImuSample {
            accel: [0.05 * phase.sin(), 0.03 * phase.cos(), 1.0],
            gyro: [4.0 * phase.cos(), -2.5 * phase.sin(), 0.4],
            temperature_c: 31.5 + 0.1 * (phase * 0.1).sin(),
        })
    }
}

/// SD card backed by a host directory
#[derive(Debug)]
pub struct DirStorage {
    root: PathBuf,
    mounted: bool,
    pub bus_releases: u32,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: false,
            bus_releases: 0,
        }
    }

    /// Host path for a card path
    fn host_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        if path.len() > PATH_LEN {
            return Err(StorageError::InvalidPath);
        }
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath);
        }
        Ok(self.root.join(relative))
    }
}

fn storage_error(e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        _ => {
            warn!("card io: {}", e);
            StorageError::Io
        }
    }
}

impl Storage for DirStorage {
    fn mount(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Err(StorageError::AlreadyMounted);
        }
        fs::create_dir_all(&self.root).map_err(storage_error)?;
        self.mounted = true;
        info!("card mounted at {}", self.root.display());
        Ok(())
    }

    fn create(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.host_path(path)?;
        if let Some(parent) = host.parent() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }
        fs::File::create(&host).map_err(storage_error)?;
        Ok(())
    }

    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let host = self.host_path(path)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&host)
            .map_err(storage_error)?;
        file.write_all(data).map_err(storage_error)
    }

    fn file_size(&mut self, path: &str) -> Result<u32, StorageError> {
        let host = self.host_path(path)?;
        let len = fs::metadata(&host).map_err(storage_error)?.len();
        u32::try_from(len).map_err(|_| StorageError::Io)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        let host = self.host_path(path)?;
        let meta = fs::metadata(&host).map_err(storage_error)?;
        if meta.is_dir() {
            let mut entries = fs::read_dir(&host).map_err(storage_error)?;
            if entries.next().is_some() {
                return Err(StorageError::NotEmpty);
            }
            fs::remove_dir(&host).map_err(storage_error)
        } else {
            fs::remove_file(&host).map_err(storage_error)
        }
    }

    fn release_bus(&mut self) {
        self.bus_releases += 1;
        trace!("spi bus back to display");
    }
}

pub struct HostPeripherals {
    pub power: HostPower,
    pub wifi: SimWifi,
    pub imu: SimImu,
    pub storage: DirStorage,
}

impl HostPeripherals {
    pub fn new(networks: &[NetworkEntry], card_dir: impl Into<PathBuf>) -> Self {
        Self {
            power: HostPower::default(),
            wifi: SimWifi::new(networks),
            imu: SimImu::default(),
            storage: DirStorage::new(card_dir),
        }
    }
}

impl Peripherals for HostPeripherals {
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
