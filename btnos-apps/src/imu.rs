//! IMU viewer and logger
//!
//! | Button | Label | Action                                                  |
//! |--------|-------|---------------------------------------------------------|
//! | 5      | IMU   | take `imu_size` samples, show the first rows            |
//! | 6      | Wait  | cycle the sample interval 0..=1000 ms by 100            |
//! | 7      | Size  | cycle the sample count 0..=1000 by 20                   |
//! | 8      | CSV   | record samples to the SD card, then show a summary      |
//!
//! A capture first erases the previous log. Records are appended one at a
//! time, each under its own [`StorageSession`], so the display gets the
//! shared bus back between samples and nothing is buffered in RAM.

use core::fmt::Write;

use btnos_core::app::{AppContext, AppHandler};
use btnos_core::button::{ButtonEdit, TaskSlot};
use btnos_core::clock;
use btnos_core::config::{AppInstall, ImuLogFormat};
use btnos_core::error::ShellError;
use btnos_core::render::{Text, TextStyle};
use btnos_core::traits::{Color, Font, ImuSample, StorageError, StorageSession};
use heapless::String;
use serde::Serialize;

/// CSV column names
pub const CSV_HEADER: &str = "timestamp,accl_x,accl_y,accl_z,gyro_x,gyro_y,gyro_z,temp\n";

/// Live rows that fit above the footer
pub const MAX_LIVE_ROWS: u16 = 10;

const ROW_PITCH: u16 = 12;
const FOOTER_Y: u16 = 188;

fn fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

/// One CSV line, temperature in Fahrenheit
pub fn csv_record(ts_ms: u64, s: &ImuSample) -> String<128> {
    let mut line = String::new();
    let _ = write!(
        line,
        "{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.1}\n",
        ts_ms,
        s.accel[0],
        s.accel[1],
        s.accel[2],
        s.gyro[0],
        s.gyro[1],
        s.gyro[2],
        fahrenheit(s.temperature_c)
    );
    line
}

/// Room for one JSON record at full float precision
pub const JSON_RECORD_LEN: usize = 192;

#[derive(Serialize)]
struct JsonRecord {
    ts: u64,
    accl: [f32; 3],
    gyro: [f32; 3],
    temp: f32,
}

/// One JSON object, without separators
pub fn json_record(
    ts_ms: u64,
    s: &ImuSample,
) -> Result<String<JSON_RECORD_LEN>, serde_json_core::ser::Error> {
    serde_json_core::to_string(&JsonRecord {
        ts: ts_ms,
        accl: s.accel,
        gyro: s.gyro,
        temp: fahrenheit(s.temperature_c),
    })
}

#[derive(Debug, Default)]
pub struct ImuApp;

impl ImuApp {
    pub fn new() -> Self {
        Self
    }

    pub fn registration(slot: u8) -> AppInstall {
        AppInstall::new(slot, "IMU")
            .task(5, "IMU")
            .task(6, "Wait")
            .task(7, "Size")
            .task(8, "CSV")
    }

    fn live(&mut self, cx: &mut AppContext<'_>) -> Result<(), ShellError> {
        let size = cx.params.imu_size;
        let wait = u32::from(cx.params.imu_wait_ms);
        cx.wipe()?;
        cx.write(
            &[
                Text::at("accl_x", 24, 48),
                Text::at("accl_y", 128, 48),
                Text::at("accl_z", 216, 48),
                Text::at("g", 280, 48),
            ],
            TextStyle::new(Font::Small, Color::WHITE),
        )?;

        for i in 0..size {
            let s = cx.peripherals.imu().sample()?;
            if i < MAX_LIVE_ROWS {
                let y = 60 + i * ROW_PITCH;
                let mut cols: [String<12>; 3] = Default::default();
                for (col, v) in cols.iter_mut().zip(s.accel) {
                    let _ = write!(col, "{:.3}", v);
                }
                cx.write(
                    &[
                        Text::at(&cols[0], 0, y),
                        Text::at(&cols[1], 104, y),
                        Text::at(&cols[2], 208, y),
                    ],
                    TextStyle::default(),
                )?;
            }
            cx.clock.sleep_ms(wait);
        }

        let mut footer: String<48> = String::new();
        let _ = write!(
            footer,
            "ts:{} sec, wait:{} ms",
            cx.clock.now_ms() / 1000,
            wait
        );
        cx.write(
            &[Text::at(&footer, 0, FOOTER_Y)],
            TextStyle::new(Font::Small, Color::WHITE),
        )
    }

    /// Relabel a setting button and print its value under the label
    fn show_setting(
        cx: &mut AppContext<'_>,
        task: TaskSlot,
        label: &str,
        value: u16,
    ) -> Result<(), ShellError> {
        cx.edit_task(task, ButtonEdit::new().label(label).font(Font::Small))?;
        let r = cx.button(cx.task_button(task)).rect;
        let mut text: String<6> = String::new();
        let _ = write!(text, "{}", value);
        cx.write(&[Text::at(&text, r.x + 28, r.y + 24)], TextStyle::default())
    }

    fn record(&mut self, cx: &mut AppContext<'_>) -> Result<(), ShellError> {
        let path = cx
            .params
            .imu_path()
            .ok_or(ShellError::Storage(StorageError::InvalidPath))?;
        let format = cx.params.imu_log;
        let size = cx.params.imu_size;
        let wait = u32::from(cx.params.imu_wait_ms);

        let offset = cx.peripherals.imu().calibrate()?;
        debug!("gyro offset {:?}", offset);
        {
            let mut sd = StorageSession::open(cx.peripherals.storage())?;
            match sd.remove(&path) {
                Ok(()) => debug!("erased old {}", path.as_str()),
                Err(StorageError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
            sd.create(&path)?;
            let head = match format {
                ImuLogFormat::Csv => CSV_HEADER,
                ImuLogFormat::Json => "[",
            };
            sd.append(&path, head.as_bytes())?;
        }

        let mut written = 0u16;
        for n in 0..size {
            let s = cx.peripherals.imu().sample()?;
            let ts = cx.clock.now_ms();
            let mut sd = StorageSession::open(cx.peripherals.storage())?;
            match format {
                ImuLogFormat::Csv => sd.append(&path, csv_record(ts, &s).as_bytes())?,
                ImuLogFormat::Json => match json_record(ts, &s) {
                    Ok(obj) => {
                        if written > 0 {
                            sd.append(&path, b",")?;
                        }
                        sd.append(&path, obj.as_bytes())?;
                    }
                    Err(_) => {
                        warn!("record {} does not fit, skipped", n + 1);
                        drop(sd);
                        cx.clock.sleep_ms(wait);
                        continue;
                    }
                },
            }
            written += 1;
            drop(sd);
            trace!("record {} at {}", n + 1, ts);
            cx.clock.sleep_ms(wait);
        }

        let bytes = {
            let mut sd = StorageSession::open(cx.peripherals.storage())?;
            if format == ImuLogFormat::Json {
                sd.append(&path, b"]")?;
            }
            sd.file_size(&path)?
        };
        info!("wrote {} records, {} bytes to {}", written, bytes, path.as_str());

        let when = clock::read(&mut *cx.clock);
        let mut size_text: String<16> = String::new();
        let _ = write!(size_text, "{} bytes", bytes);
        let mut gyro: String<40> = String::new();
        let _ = write!(gyro, "[{:.2}, {:.2}, {:.2}]", offset[0], offset[1], offset[2]);

        cx.wipe()?;
        let rows: [(&str, &str); 5] = [
            ("", "Processing Details"),
            ("filename:", path.as_str()),
            ("size:", size_text.as_str()),
            ("timestamp:", when.time.as_str()),
            ("gyroCalib:", gyro.as_str()),
        ];
        for (i, (key, value)) in rows.iter().enumerate() {
            let y = 46 + 16 * i as u16;
            cx.write(
                &[Text::at(key, 0, y), Text::at(value, 80, y)],
                TextStyle::default(),
            )?;
        }
        Ok(())
    }
}

impl AppHandler for ImuApp {
    fn on_task(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        match task.number() {
            5 => self.live(cx),
            6 => {
                let wait = cx.params.cycle_imu_wait();
                info!("imu wait {} ms", wait);
                Self::show_setting(cx, task, "Wait", wait)
            }
            7 => {
                let size = cx.params.cycle_imu_size();
                info!("imu size {}", size);
                Self::show_setting(cx, task, "Size", size)
            }
            _ => self.record(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::Rig;
    use btnos_core::config::Layout;
    use btnos_core::testing::Op;
    use btnos_core::traits::PeripheralError;

    fn task(n: u8) -> TaskSlot {
        TaskSlot::new(n).unwrap()
    }

    fn level() -> ImuSample {
        ImuSample {
            accel: [0.0, 0.0, 1.0],
            gyro: [0.0, 0.0, 0.0],
            temperature_c: 25.0,
        }
    }

    fn rig() -> Rig {
        let mut rig = Rig::new(2);
        rig.peripherals.imu.reading = level();
        rig
    }

    #[test]
    fn test_csv_record() {
        assert_eq!(
            csv_record(1234, &level()).as_str(),
            "1234,0.000,0.000,1.000,0.000,0.000,0.000,77.0\n"
        );
    }

    #[test]
    fn test_json_record() {
        assert_eq!(
            json_record(5, &level()).unwrap().as_str(),
            "{\"ts\":5,\"accl\":[0.0,0.0,1.0],\"gyro\":[0.0,0.0,0.0],\"temp\":77.0}"
        );
    }

    #[test]
    fn test_wait_cycles_and_shows_value() {
        let mut rig = rig();
        ImuApp.on_task(&mut rig.cx(), task(6)).unwrap();
        assert_eq!(rig.params.imu_wait_ms, 100);
        let r = Layout::CORE2.tasks[1];
        assert!(rig.display.ops.iter().any(|op| matches!(
            op,
            Op::Text { font: Font::Small, text, .. } if text == "Wait"
        )));
        assert!(rig.display.ops.iter().any(|op| matches!(
            op,
            Op::Text { text, x, y, .. } if text == "100" && *x == r.x + 28 && *y == r.y + 24
        )));

        rig.params.imu_wait_ms = 1000;
        ImuApp.on_task(&mut rig.cx(), task(6)).unwrap();
        assert_eq!(rig.params.imu_wait_ms, 0);
    }

    #[test]
    fn test_size_cycles() {
        let mut rig = rig();
        ImuApp.on_task(&mut rig.cx(), task(7)).unwrap();
        ImuApp.on_task(&mut rig.cx(), task(7)).unwrap();
        assert_eq!(rig.params.imu_size, 40);
        assert!(rig.display.has_text("40"));
    }

    #[test]
    fn test_live_rows_capped() {
        let mut rig = rig();
        rig.params.imu_size = 20;
        rig.params.imu_wait_ms = 50;
        ImuApp.on_task(&mut rig.cx(), task(5)).unwrap();

        assert_eq!(rig.peripherals.imu.samples, 20);
        let rows = rig
            .display
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text { x: 208, .. }))
            .count();
        assert_eq!(rows, usize::from(MAX_LIVE_ROWS));
        assert_eq!(rig.clock.now_ms, 1000);
        assert!(rig.display.has_text("ts:1 sec, wait:50 ms"));
    }

    #[test]
    fn test_live_sample_error_abandons() {
        let mut rig = rig();
        rig.params.imu_size = 5;
        rig.peripherals.imu.fail = true;
        assert_eq!(
            ImuApp.on_task(&mut rig.cx(), task(5)),
            Err(ShellError::Peripheral(PeripheralError::Io))
        );
    }

    #[test]
    fn test_record_csv() {
        let mut rig = rig();
        rig.params.imu_size = 3;
        rig.params.imu_wait_ms = 10;
        ImuApp.on_task(&mut rig.cx(), task(8)).unwrap();

        let data = rig.peripherals.storage.contents("/sd/imu.csv").unwrap();
        let text = core::str::from_utf8(data).unwrap();
        let lines: std::vec::Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER.trim_end());
        assert_eq!(lines[2], "10,0.000,0.000,1.000,0.000,0.000,0.000,77.0");
        // create + one per record + size query
        assert_eq!(rig.peripherals.storage.bus_releases, 5);

        let mut size = std::string::String::new();
        write!(size, "{} bytes", data.len()).unwrap();
        assert!(rig.display.has_text("/sd/imu.csv"));
        assert!(rig.display.has_text(&size));
        assert!(rig.display.has_text("[0.00, 0.00, 0.00]"));
    }

    #[test]
    fn test_record_json() {
        let mut rig = rig();
        rig.params.imu_size = 2;
        rig.params.imu_log = ImuLogFormat::Json;
        ImuApp.on_task(&mut rig.cx(), task(8)).unwrap();

        let data = rig.peripherals.storage.contents("/sd/imu.json").unwrap();
        let text = core::str::from_utf8(data).unwrap();
        assert!(text.starts_with("[{\"ts\":0,"));
        assert!(text.ends_with("}]"));
        assert_eq!(text.matches("},{").count(), 1);
    }

    #[test]
    fn test_record_erases_previous_log() {
        let mut worn = rig();
        worn.params.imu_size = 1;
        worn.peripherals.storage.files.push((
            std::string::String::from("/sd/imu.csv"),
            b"stale".to_vec(),
        ));
        ImuApp.on_task(&mut worn.cx(), task(8)).unwrap();
        assert_eq!(worn.peripherals.storage.removed, ["/sd/imu.csv"]);
        let data = worn.peripherals.storage.contents("/sd/imu.csv").unwrap();
        assert!(data.starts_with(CSV_HEADER.as_bytes()));

        // Nothing to erase on a fresh card
        let mut fresh = rig();
        fresh.params.imu_size = 1;
        ImuApp.on_task(&mut fresh.cx(), task(8)).unwrap();
        assert!(fresh.peripherals.storage.removed.is_empty());
    }

    #[test]
    fn test_record_releases_bus_on_failure() {
        let mut rig = rig();
        rig.params.imu_size = 3;
        rig.peripherals.imu.fail = true;
        assert!(ImuApp.on_task(&mut rig.cx(), task(8)).is_err());
        assert_eq!(rig.peripherals.storage.bus_releases, 1);
        assert_eq!(
            rig.peripherals.storage.contents("/sd/imu.csv"),
            Some(CSV_HEADER.as_bytes())
        );
    }
}
