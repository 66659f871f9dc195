//! Test bench for calling an app directly, without the dispatcher

use btnos_core::app::AppContext;
use btnos_core::button::{AppSlot, ButtonRegistry};
use btnos_core::config::{DeviceParams, Layout};
use btnos_core::session::Session;
use btnos_core::testing::{FakeClock, FakePeripherals, MockDisplay};

pub struct Rig {
    pub slot: AppSlot,
    pub display: MockDisplay,
    pub registry: ButtonRegistry,
    pub session: Session,
    pub params: DeviceParams,
    pub clock: FakeClock,
    pub peripherals: FakePeripherals,
}

impl Rig {
    /// App screen for `slot` already up
    pub fn new(slot: u8) -> Self {
        let slot = AppSlot::new(slot).unwrap();
        let mut registry = ButtonRegistry::new(Layout::CORE2);
        registry.show_app(slot);
        Self {
            slot,
            display: MockDisplay::default(),
            registry,
            session: Session::new(),
            params: DeviceParams::default(),
            clock: FakeClock::default(),
            peripherals: FakePeripherals::default(),
        }
    }

    pub fn cx(&mut self) -> AppContext<'_> {
        AppContext {
            slot: self.slot,
            display: &mut self.display,
            registry: &mut self.registry,
            session: &mut self.session,
            params: &mut self.params,
            clock: &mut self.clock,
            peripherals: &mut self.peripherals,
        }
    }
}
