//! Wi-Fi app
//!
//! | Button | Label | Action                                           |
//! |--------|-------|--------------------------------------------------|
//! | 5      | Wifi  | connect or disconnect; green when connected      |
//! | 6      | Scan  | list nearby networks with signal bars            |
//! | 7      | Clk   | current time in seven-segment digits             |
//! | 8      | Wipe  | clear the work area                              |
//!
//! Touching the work area refreshes the color of button 5.

use core::fmt::Write;
use core::net::Ipv4Addr;

use btnos_core::app::{AppContext, AppHandler};
use btnos_core::button::{ButtonEdit, TaskSlot};
use btnos_core::clock;
use btnos_core::config::AppInstall;
use btnos_core::error::ShellError;
use btnos_core::geometry::{Point, Rect};
use btnos_core::render::{Segment, Text, TextStyle};
use btnos_core::traits::{AccessPoint, Color, Font, MAX_SCAN_RESULTS};
use heapless::{String, Vec};

/// How long to wait for the radio to associate
pub const CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Status poll interval while connecting
const CONNECT_POLL_MS: u32 = 100;

/// Rows that fit in the work area
pub const MAX_SCAN_ROWS: usize = 14;

/// Status line position
const STATUS_Y: u16 = 96;

/// Seven-segment clock position
const CLOCK_AT: (u16, u16) = (10, 90);

/// Fill colors of bars 1..=4
const BAR_COLORS: [Color; 4] = [Color::RED, Color::YELLOW, Color::BLUE, Color::GREEN];

/// Signal strength in bars, 1..=4
pub fn signal_bars(rssi: i8) -> u8 {
    match rssi {
        r if r >= -67 => 4,
        r if r >= -78 => 3,
        r if r >= -80 => 2,
        _ => 1,
    }
}

#[derive(Debug, Default)]
pub struct WifiApp;

impl WifiApp {
    pub fn new() -> Self {
        Self
    }

    /// Button labels for this app in `slot`
    pub fn registration(slot: u8) -> AppInstall {
        AppInstall::new(slot, "WiFi")
            .task(5, "Wifi")
            .task(6, "Scan")
            .task(7, "Clk")
            .task(8, "Wipe")
    }

    fn status(cx: &mut AppContext<'_>, line: &str) -> Result<(), ShellError> {
        cx.write(&[Text::at(line, 0, STATUS_Y)], TextStyle::default())
    }

    fn show_link(cx: &mut AppContext<'_>, connected: bool) -> Result<(), ShellError> {
        let bg = if connected { Color::GREEN } else { Color::RED };
        cx.edit_task(TaskSlot::ALL[0], ButtonEdit::new().bg(bg))
    }

    /// Join the configured network, giving up after [`CONNECT_TIMEOUT_MS`]
    ///
    /// Returns the address, `0.0.0.0` if the radio never associated.
    fn connect(cx: &mut AppContext<'_>) -> Ipv4Addr {
        let wifi = cx.peripherals.wifi();
        if wifi.is_connected() {
            return wifi.address();
        }
        info!("connecting to '{}'", cx.params.essid.as_str());
        if let Err(e) = wifi.begin_connect(&cx.params.essid, &cx.params.password) {
            warn!("connect failed to start: {:?}", e);
        }
        let start = cx.clock.now_ms();
        while !cx.peripherals.wifi().is_connected() {
            if cx.clock.now_ms().saturating_sub(start) > CONNECT_TIMEOUT_MS {
                warn!("no association with '{}'", cx.params.essid.as_str());
                break;
            }
            cx.clock.sleep_ms(CONNECT_POLL_MS);
        }
        cx.peripherals.wifi().address()
    }

    fn toggle(&mut self, cx: &mut AppContext<'_>) -> Result<(), ShellError> {
        let mut line: String<80> = String::new();
        if cx.peripherals.wifi().is_connected() {
            Self::status(cx, "disconnecting ..")?;
            cx.peripherals.wifi().disconnect();
            let ip = cx.peripherals.wifi().address();
            let _ = write!(line, "disconnected -> {}", ip);
            Self::status(cx, &line)?;
            return Self::show_link(cx, false);
        }

        let _ = write!(
            line,
            "connecting to '{}' with {} sec timeout",
            cx.params.essid,
            CONNECT_TIMEOUT_MS / 1000
        );
        Self::status(cx, &line)?;
        let ip = Self::connect(cx);
        info!("address {:?}", ip.octets());
        cx.wipe()?;
        line.clear();
        let _ = write!(line, "got ip address -> {}", ip);
        Self::status(cx, &line)?;
        if !ip.is_unspecified() {
            Self::show_link(cx, true)?;
        }
        Ok(())
    }

    fn scan(&mut self, cx: &mut AppContext<'_>) -> Result<(), ShellError> {
        let mut found: Vec<AccessPoint, MAX_SCAN_RESULTS> = Vec::new();
        cx.peripherals.wifi().scan(&mut found)?;
        info!("scanned {} networks", found.len());
        if found.is_empty() {
            return Ok(());
        }

        let mut title: String<24> = String::new();
        let _ = write!(title, "ssid's scanned {}", found.len());
        cx.write(
            &[
                Text::at(&title, 12, 44),
                Text::at("sig", 162, 44),
                Text::at("bars", 248, 44),
            ],
            TextStyle::new(Font::Small, Color::YELLOW),
        )?;

        for (i, ap) in found.iter().take(MAX_SCAN_ROWS).enumerate() {
            let y = 56 + 10 * i as u16;
            let mut rssi: String<8> = String::new();
            let _ = write!(rssi, "{}", ap.rssi);
            cx.write(
                &[Text::at(&ap.ssid, 2, y), Text::at(&rssi, 162, y)],
                TextStyle::default(),
            )?;
            for (n, color) in BAR_COLORS
                .iter()
                .enumerate()
                .take(usize::from(signal_bars(ap.rssi)))
            {
                let x = 194 + 32 * n as u16;
                cx.display.fill_rect(Rect::new(x, y, 30, 8), *color)?;
            }
        }
        Ok(())
    }

    fn big_clock(&mut self, cx: &mut AppContext<'_>) -> Result<(), ShellError> {
        let text = clock::read(&mut *cx.clock);
        cx.wipe()?;
        cx.renderer().draw_digits(
            &text.time,
            CLOCK_AT.0,
            CLOCK_AT.1,
            Segment::default(),
            Color::GREEN,
        )?;
        Ok(())
    }
}

impl AppHandler for WifiApp {
    fn on_area_touch(&mut self, cx: &mut AppContext<'_>, point: Point) -> Result<(), ShellError> {
        debug!("wifi area touch at {}", point);
        let connected = cx.peripherals.wifi().is_connected();
        Self::show_link(cx, connected)
    }

    fn on_task(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        match task.number() {
            5 => self.toggle(cx),
            6 => self.scan(cx),
            7 => self.big_clock(cx),
            _ => cx.wipe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::Rig;
    use btnos_core::button::{AppSlot, ButtonId};
    use btnos_core::config::{DeviceParams, Layout};
    use btnos_core::dispatch::{Device, Dispatcher};
    use btnos_core::state::ShellState;
    use btnos_core::testing::{
        center, FakeClock, FakePeripherals, MockDisplay, Op, ScriptedTouch,
    };

    fn task(n: u8) -> TaskSlot {
        TaskSlot::new(n).unwrap()
    }

    #[test]
    fn test_signal_bars() {
        assert_eq!(signal_bars(-40), 4);
        assert_eq!(signal_bars(-67), 4);
        assert_eq!(signal_bars(-68), 3);
        assert_eq!(signal_bars(-78), 3);
        assert_eq!(signal_bars(-79), 2);
        assert_eq!(signal_bars(-80), 2);
        assert_eq!(signal_bars(-81), 1);
        assert_eq!(signal_bars(-128), 1);
    }

    #[test]
    fn test_area_touch_shows_link_state() {
        let mut rig = Rig::new(1);
        WifiApp.on_area_touch(&mut rig.cx(), Point::new(10, 100)).unwrap();
        assert!(rig.display.text_with_bg("Btn5", Color::RED));

        rig.peripherals.wifi.connected = true;
        WifiApp.on_area_touch(&mut rig.cx(), Point::new(10, 100)).unwrap();
        assert!(rig.display.text_with_bg("Btn5", Color::GREEN));
    }

    #[test]
    fn test_connect_succeeds() {
        let mut rig = Rig::new(1);
        rig.params.essid = "home".try_into().unwrap();
        rig.peripherals.wifi.connect_after_polls = Some(5);
        WifiApp.on_task(&mut rig.cx(), task(5)).unwrap();

        assert_eq!(rig.peripherals.wifi.joined.as_deref(), Some("home"));
        assert!(rig
            .display
            .has_text("connecting to 'home' with 15 sec timeout"));
        assert!(rig.display.has_text("got ip address -> 192.168.1.42"));
        assert!(rig.display.text_with_bg("Btn5", Color::GREEN));
        assert!(rig.clock.now_ms < CONNECT_TIMEOUT_MS);
    }

    #[test]
    fn test_connect_times_out() {
        let mut rig = Rig::new(1);
        WifiApp.on_task(&mut rig.cx(), task(5)).unwrap();

        assert!(rig.display.has_text("got ip address -> 0.0.0.0"));
        assert!(!rig.display.text_with_bg("Btn5", Color::GREEN));
        assert!(rig.clock.now_ms > CONNECT_TIMEOUT_MS);
        assert!(rig.clock.now_ms <= CONNECT_TIMEOUT_MS + 2 * u64::from(CONNECT_POLL_MS));
    }

    #[test]
    fn test_disconnect() {
        let mut rig = Rig::new(1);
        rig.peripherals.wifi.connected = true;
        WifiApp.on_task(&mut rig.cx(), task(5)).unwrap();
        assert!(!rig.peripherals.wifi.connected);
        assert!(rig.display.has_text("disconnected -> 0.0.0.0"));
        assert!(rig.display.text_with_bg("Btn5", Color::RED));
    }

    #[test]
    fn test_scan_lists_at_most_fourteen() {
        let mut rig = Rig::new(1);
        rig.peripherals.wifi.networks = (0..20).map(|i| ("net", -60 - i as i8)).collect();
        WifiApp.on_task(&mut rig.cx(), task(6)).unwrap();

        assert!(rig.display.has_text("ssid's scanned 20"));
        let rows = rig.display.texts().iter().filter(|t| **t == "net").count();
        assert_eq!(rows, MAX_SCAN_ROWS);
        // Row 0 at -60 dBm gets four bars
        for n in 0..4u16 {
            assert!(rig
                .display
                .ops
                .contains(&Op::Fill(Rect::new(194 + 32 * n, 56, 30, 8), BAR_COLORS[n as usize])));
        }
    }

    #[test]
    fn test_empty_scan_draws_nothing() {
        let mut rig = Rig::new(1);
        WifiApp.on_task(&mut rig.cx(), task(6)).unwrap();
        assert!(rig.display.ops.is_empty());
    }

    #[test]
    fn test_clock_uses_segments() {
        let mut rig = Rig::new(1);
        WifiApp.on_task(&mut rig.cx(), task(7)).unwrap();
        let green = rig
            .display
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Fill(_, c) if *c == Color::GREEN))
            .count();
        assert!(green > 0);
    }

    /// Tap the app, use it, leave, go home
    #[test]
    fn test_wifi_session_end_to_end() {
        let mut app = WifiApp::new();
        let mut d = Dispatcher::new(
            Device {
                display: MockDisplay::default(),
                touch: ScriptedTouch::default(),
                clock: FakeClock::default(),
                peripherals: FakePeripherals::default(),
            },
            DeviceParams::default(),
        );
        d.install_app(&WifiApp::registration(1), &mut app).unwrap();
        d.start().unwrap();

        let own = center(Layout::CORE2.apps[0]);
        let scan = center(Layout::CORE2.tasks[1]);
        d.touch_mut().hold(Some(own), 1);
        d.touch_mut().hold(None, 1);
        // Inside the task loop: finger still on the app button, then scan
        d.touch_mut().hold(Some(own), 1);
        d.touch_mut().hold(Some(scan), 1);
        d.touch_mut().hold(Some(Point::new(own.x + 3, own.y)), 1);
        // Back in the outer loop: tap the app button again
        d.touch_mut().hold(Some(own), 1);
        d.touch_mut().hold(None, 1);

        let mut states = std::vec::Vec::new();
        while d.touch_mut().remaining() > 0 {
            d.step().unwrap();
            states.push(d.state());
        }

        let slot = AppSlot::ALL[0];
        assert_eq!(
            states,
            [
                ShellState::Home,
                ShellState::TaskLoop(slot),
                ShellState::TaskLoop(slot),
                ShellState::TaskLoop(slot),
                ShellState::AppScreen(slot),
                ShellState::AppScreen(slot),
                ShellState::Home,
            ]
        );
        assert!(d.display().text_with_bg("QUIT", Color::RED));
        assert!(d.display().has_text("Scan"));
        assert_eq!(
            d.registry().descriptor(ButtonId::App(slot)).label.as_str(),
            "WiFi"
        );
        assert_eq!(d.registry().screen().len(), 9);
    }

    /// Enter with a tap, leave with a later touch on the same button
    #[test]
    fn test_enter_and_leave_restores_home_button() {
        let mut app = WifiApp::new();
        let mut d = Dispatcher::new(
            Device {
                display: MockDisplay::default(),
                touch: ScriptedTouch::default(),
                clock: FakeClock::default(),
                peripherals: FakePeripherals::default(),
            },
            DeviceParams::default(),
        );
        let install = AppInstall::new(1, "WiFi")
            .task(5, "Scan")
            .task(6, "Clk")
            .task(7, "")
            .task(8, "Wipe");
        d.install_app(&install, &mut app).unwrap();
        d.start().unwrap();

        let slot = AppSlot::ALL[0];
        let own = center(Layout::CORE2.apps[0]);
        d.touch_mut().hold(Some(own), 1);
        d.touch_mut().hold(None, 1);
        d.step().unwrap();
        d.step().unwrap();
        assert_eq!(d.state(), ShellState::TaskLoop(slot));

        let screen = d.registry().screen();
        assert_eq!(screen.len(), 9);
        assert!(screen.contains(ButtonId::App(slot)));
        assert!(!screen.contains(ButtonId::Title));
        assert!(!screen.contains(ButtonId::App(AppSlot::ALL[1])));
        for t in TaskSlot::ALL {
            assert!(screen.contains(ButtonId::Task(slot, t)));
        }
        for id in ButtonId::FRAME {
            assert!(screen.contains(id));
        }
        assert!(d.display().text_with_bg("QUIT", Color::RED));
        assert!(d.display().has_text("Scan"));
        assert!(d.display().has_text("Clk"));
        assert_eq!(
            d.registry().descriptor(ButtonId::Task(slot, task(7))).label.as_str(),
            ""
        );
        let entered = d.display().ops.len();

        // No contact first, so the next touch on the button is not the
        // finger that opened the app
        d.touch_mut().hold(None, 1);
        d.touch_mut().hold(Some(own), 1);
        d.step().unwrap();
        assert_eq!(d.state(), ShellState::TaskLoop(slot));
        d.step().unwrap();
        assert_eq!(d.state(), ShellState::AppScreen(slot));

        d.touch_mut().hold(Some(own), 1);
        d.touch_mut().hold(None, 1);
        d.step().unwrap();
        d.step().unwrap();
        assert_eq!(d.state(), ShellState::Home);
        assert_eq!(d.registry().screen().len(), 9);
        assert!(d.registry().screen().contains(ButtonId::Title));

        let app = d.registry().descriptor(ButtonId::App(slot));
        assert_eq!(app.label.as_str(), "WiFi");
        assert_eq!(app.bg, Color::BLACK);
        let repainted = d.display().ops[entered..].iter().any(|op| {
            matches!(op, Op::Text { text, bg, .. } if text == "WiFi" && *bg == Color::BLACK)
        });
        assert!(repainted);
    }
}
