//! `device.toml` loading
//!
//! ```toml
//! [params]
//! essid = "workshop"
//! imu_log = "json"
//!
//! [[app]]
//! slot = 1
//! kind = "wifi"
//! tasks = [{ key = 7, label = "Time" }]
//!
//! [[network]]
//! ssid = "workshop"
//! rssi = -48
//! ```
//!
//! Slot and key ranges are not checked here. A bad entry reaches the
//! dispatcher, which treats it as fatal and resets the device.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use btnos_apps::{DoodleApp, ImuApp, WifiApp};
use btnos_core::button::label;
use btnos_core::config::{AppInstall, DeviceParams};
use btnos_core::AppHandler;
use log::debug;
use serde::Deserialize;

/// Embedded default configuration
const EMBEDDED_CONFIG: &str = include_str!("../../device.toml");

/// Which app implementation backs a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    Wifi,
    Imu,
    Doodle,
}

impl AppKind {
    /// The app's own labels for `slot`
    pub fn registration(self, slot: u8) -> AppInstall {
        match self {
            AppKind::Wifi => WifiApp::registration(slot),
            AppKind::Imu => ImuApp::registration(slot),
            AppKind::Doodle => DoodleApp::registration(slot),
        }
    }

    pub fn handler(self) -> Box<dyn AppHandler> {
        match self {
            AppKind::Wifi => Box::new(WifiApp::new()),
            AppKind::Imu => Box::new(ImuApp::new()),
            AppKind::Doodle => Box::new(DoodleApp::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskEntry {
    pub key: u8,
    pub label: String,
}

/// One `[[app]]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppEntry {
    pub slot: u8,
    pub kind: AppKind,
    /// Overrides the app's own label
    #[serde(default)]
    pub label: Option<String>,
    /// Overrides single task labels
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

impl AppEntry {
    /// Registration request with overrides applied
    pub fn install(&self) -> AppInstall {
        let mut install = self.kind.registration(self.slot);
        if let Some(text) = &self.label {
            install.label = label(text);
        }
        for task in &self.tasks {
            install = install.task(task.key, &task.label);
        }
        install
    }
}

/// One simulated access point
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkEntry {
    pub ssid: String,
    pub rssi: i8,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default)]
    pub params: DeviceParams,
    #[serde(default, rename = "app")]
    pub apps: Vec<AppEntry>,
    #[serde(default, rename = "network")]
    pub networks: Vec<NetworkEntry>,
}

impl SimConfig {
    /// Configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_CONFIG).context("embedded device.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(text)?;
        for (i, app) in config.apps.iter().enumerate() {
            if config.apps[..i].iter().any(|other| other.slot == app.slot) {
                bail!("slot {} configured twice", app.slot);
            }
        }
        debug!("{} apps, {} networks", config.apps.len(), config.networks.len());
        Ok(config)
    }
}
