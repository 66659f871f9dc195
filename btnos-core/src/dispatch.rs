//! Event dispatcher
//!
//! Owns the hardware, the button registry and the session, and runs the
//! two nested loops of the shell:
//!
//! - the outer loop polls for tap/hold gestures on the home screen (and on
//!   an app screen after its task loop has exited) and routes them to the
//!   frame, title and app buttons;
//! - the inner task loop samples raw touches while an app screen is up and
//!   hands them to the app's [`AppHandler`].
//!
//! Each call to [`Dispatcher::step`] performs one poll. Time only passes
//! through [`SystemClock::sleep_ms`], so a fake clock makes the whole shell
//! deterministic.

use crate::app::{AppContext, AppHandler, NoopApp};
use crate::button::{AppSlot, ButtonEdit, ButtonId, ButtonRegistry, ScreenKind};
use crate::clock;
use crate::config::{AppInstall, ConfigError, DeviceParams, Layout};
use crate::error::ShellError;
use crate::geometry::{Point, Rect};
use crate::poller::{Gesture, GestureAction, TouchPoller};
use crate::render::Renderer;
use crate::session::{ClockMode, Session};
use crate::state::{ShellEvent, ShellState, TaskHit, TaskLoop};
use crate::traits::{Color, Display, Font, Peripherals, SystemClock, TouchController};

/// Delay between touch polls
pub const POLL_INTERVAL_MS: u32 = 20;

/// Pause before cutting power so the log line gets out
pub const POWER_DOWN_DELAY_MS: u32 = 2000;

/// Width cleared for the short time display in the title bar
const SHORT_CLOCK_WIDTH: u16 = 144;

/// Hardware handed to the dispatcher
pub struct Device<D, T, C, P> {
    pub display: D,
    pub touch: T,
    pub clock: C,
    pub peripherals: P,
}

#[derive(Debug, Clone, Copy)]
enum AppCall {
    Area(Point),
    Task(crate::button::TaskSlot),
}

pub struct Dispatcher<'h, D, T, C, P> {
    display: D,
    poller: TouchPoller<T>,
    clock: C,
    peripherals: P,
    registry: ButtonRegistry,
    session: Session,
    params: DeviceParams,
    handlers: [Option<&'h mut dyn AppHandler>; 4],
    state: ShellState,
    task_loop: Option<TaskLoop>,
}

impl<'h, D, T, C, P> Dispatcher<'h, D, T, C, P>
where
    D: Display,
    T: TouchController,
    C: SystemClock,
    P: Peripherals,
{
    pub fn new(device: Device<D, T, C, P>, params: DeviceParams) -> Self {
        Self::with_layout(device, params, Layout::CORE2)
    }

    pub fn with_layout(device: Device<D, T, C, P>, params: DeviceParams, layout: Layout) -> Self {
        Self {
            display: device.display,
            poller: TouchPoller::new(device.touch),
            clock: device.clock,
            peripherals: device.peripherals,
            registry: ButtonRegistry::new(layout),
            session: Session::new(),
            params,
            handlers: [None, None, None, None],
            state: ShellState::Boot,
            task_loop: None,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn registry(&self) -> &ButtonRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn params(&self) -> &DeviceParams {
        &self.params
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn peripherals(&self) -> &P {
        &self.peripherals
    }

    pub fn touch_mut(&mut self) -> &mut T {
        self.poller.touch_mut()
    }

    /// Label an app slot and attach its handler
    ///
    /// The request is checked in full before anything changes. A bad request
    /// is fatal: the device is reset and the registry left untouched.
    pub fn install_app(
        &mut self,
        install: &AppInstall,
        handler: &'h mut dyn AppHandler,
    ) -> Result<AppSlot, ConfigError> {
        self.register(install, Some(handler))
    }

    /// Label an app slot, keeping whatever handler it already has
    pub fn install_labels(&mut self, install: &AppInstall) -> Result<AppSlot, ConfigError> {
        self.register(install, None)
    }

    fn register(
        &mut self,
        install: &AppInstall,
        handler: Option<&'h mut dyn AppHandler>,
    ) -> Result<AppSlot, ConfigError> {
        let registration = match install.validate() {
            Ok(r) => r,
            Err(e) => {
                error!("app install rejected: {:?}", e);
                if let Err(e) = self.apply(ShellEvent::HardReset) {
                    warn!("reset failed: {:?}", e);
                }
                return Err(e);
            }
        };
        self.registry.install(&registration);
        if let Some(handler) = handler {
            self.handlers[registration.slot.index()] = Some(handler);
        }
        info!(
            "installed {} in slot {}",
            registration.label.as_str(),
            registration.slot.number()
        );
        Ok(registration.slot)
    }

    /// Draw the home screen and start polling gestures
    pub fn home_screen(&mut self) -> Result<(), ShellError> {
        let text = clock::read(&mut self.clock);
        self.registry.define_frame(&text.date);
        self.registry.show_home();
        self.task_loop = None;
        self.state = ShellState::Home;
        self.session.screen = ScreenKind::Home;
        self.session.clock_mode = ClockMode::Date;

        let painted = self.paint_home();
        self.poller.rebind(self.registry.zones());
        info!("home screen");
        painted
    }

    fn paint_home(&mut self) -> Result<(), ShellError> {
        let mut r = Renderer::new(&mut self.display);
        r.edit(&mut self.registry, ButtonId::Work, &ButtonEdit::new())?;
        r.splash()?;
        for button in self
            .registry
            .iter_visible()
            .filter(|b| b.id != ButtonId::Work && !b.id.is_frame())
        {
            r.paint(button)?;
        }
        Ok(())
    }

    /// Draw an app's screen and enter its task loop
    pub fn app_screen(&mut self, slot: AppSlot) -> Result<(), ShellError> {
        let id = ButtonId::App(slot);
        self.registry.show_app(slot);
        self.task_loop = Some(TaskLoop::new(slot));
        self.state = ShellState::TaskLoop(slot);
        self.session.screen = ScreenKind::App(slot);

        let saved = self.registry.descriptor(id).clone();
        let painted = self.paint_app(id);
        // QUIT is only painted; the stored label stays the app's name
        let button = self.registry.define(id);
        button.label = saved.label;
        button.bg = saved.bg;

        self.poller.rebind(self.registry.zones());
        info!("app screen {}", slot.number());
        painted
    }

    fn paint_app(&mut self, id: ButtonId) -> Result<(), ShellError> {
        let mut r = Renderer::new(&mut self.display);
        r.edit(
            &mut self.registry,
            id,
            &ButtonEdit::new().label("QUIT").bg(Color::RED),
        )?;
        r.edit(&mut self.registry, ButtonId::Work, &ButtonEdit::new())?;
        for button in self.registry.iter_visible().filter(|b| !b.id.is_frame()) {
            r.paint(button)?;
        }
        Ok(())
    }

    /// Draw the home screen if nothing is up yet
    pub fn start(&mut self) -> Result<(), ShellError> {
        if self.state == ShellState::Boot {
            self.apply(ShellEvent::ShowHome)?;
        }
        Ok(())
    }

    /// One poll of the active loop
    pub fn step(&mut self) -> Result<(), ShellError> {
        match self.state {
            ShellState::Boot => self.start(),
            ShellState::Home | ShellState::AppScreen(_) => {
                self.clock.sleep_ms(POLL_INTERVAL_MS);
                let now = self.clock.now_ms();
                match self.poller.poll_gesture(now)? {
                    Some(gesture) => self.on_gesture(gesture),
                    None => Ok(()),
                }
            }
            ShellState::TaskLoop(slot) => {
                self.clock.sleep_ms(POLL_INTERVAL_MS);
                self.task_step(slot)
            }
            ShellState::PoweredDown | ShellState::Resetting => Ok(()),
        }
    }

    /// Step until the device powers down or resets
    ///
    /// Errors from a single step are logged and the loop carries on.
    pub fn run(&mut self) -> ShellState {
        while !self.state.is_terminal() {
            if let Err(e) = self.step() {
                warn!("step failed: {:?}", e);
            }
        }
        self.state
    }

    fn apply(&mut self, event: ShellEvent) -> Result<(), ShellError> {
        let prev = self.state;
        let next = prev.transition(event);
        trace!("{:?} + {:?} -> {:?}", prev, event, next);

        match next {
            ShellState::Home if event == ShellEvent::ShowHome || prev != next => {
                self.home_screen()
            }
            ShellState::TaskLoop(slot) if prev != next => self.app_screen(slot),
            ShellState::AppScreen(_) => {
                self.state = next;
                self.task_loop = None;
                self.poller.reset_gesture();
                Ok(())
            }
            ShellState::PoweredDown if prev != next => {
                self.state = next;
                info!("powering down");
                self.clock.sleep_ms(POWER_DOWN_DELAY_MS);
                self.peripherals.power().power_down();
                Ok(())
            }
            ShellState::Resetting if prev != next => {
                self.state = next;
                warn!("hard reset");
                if let Err(e) = self.display.clear(Color::BLACK) {
                    warn!("clear before reset failed: {:?}", e);
                }
                self.peripherals.power().hard_reset();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_gesture(&mut self, gesture: Gesture) -> Result<(), ShellError> {
        let hold = gesture.action == GestureAction::Hold;
        match gesture.button {
            ButtonId::App(slot) => self.apply(ShellEvent::SelectApp(slot)),
            ButtonId::A if hold => self.apply(ShellEvent::PowerDown),
            ButtonId::C if hold => self.apply(ShellEvent::HardReset),
            ButtonId::A | ButtonId::C => {
                info!("{} tap not implemented", gesture.button);
                Ok(())
            }
            ButtonId::B => self.apply(ShellEvent::ShowHome),
            ButtonId::Title => self.show_clock(gesture.action),
            ButtonId::Work | ButtonId::Task(..) => {
                debug!("no outer handler for {}", gesture.button);
                Ok(())
            }
        }
    }

    /// Tap flips between the short time and the full date. Hold always
    /// shows the full date.
    fn show_clock(&mut self, action: GestureAction) -> Result<(), ShellError> {
        let text = clock::read(&mut self.clock);
        let title = self.registry.layout().title;
        let mode = match action {
            GestureAction::Tap => self.session.clock_mode.toggled(),
            GestureAction::Hold => ClockMode::Date,
        };
        let (area, label) = match mode {
            ClockMode::Time => (
                Rect::new(title.x, title.y, SHORT_CLOCK_WIDTH, title.h),
                text.time.as_str(),
            ),
            ClockMode::Date => (title, text.date.as_str()),
        };
        self.display.fill_rect(area, Color::BLACK)?;
        self.display.draw_text(
            Font::Large,
            label,
            title.x,
            title.y + 12,
            Color::YELLOW,
            Color::BLACK,
        )?;
        self.session.clock_mode = mode;
        Ok(())
    }

    fn task_step(&mut self, slot: AppSlot) -> Result<(), ShellError> {
        let sample = self.poller.current_point()?;
        let layout = *self.registry.layout();
        let hit = self
            .task_loop
            .get_or_insert_with(|| TaskLoop::new(slot))
            .feed(sample, &layout);

        match hit {
            None => Ok(()),
            Some(TaskHit::Exit) => {
                info!("leaving task loop {}", slot.number());
                self.apply(ShellEvent::ExitTaskLoop)
            }
            Some(TaskHit::WorkArea(p)) => self.call_app(slot, AppCall::Area(p)),
            Some(TaskHit::Task(t)) => {
                debug!("task {} on app {}", t.number(), slot.number());
                self.call_app(slot, AppCall::Task(t))
            }
        }
    }

    fn call_app(&mut self, slot: AppSlot, call: AppCall) -> Result<(), ShellError> {
        let mut cx = AppContext {
            slot,
            display: &mut self.display,
            registry: &mut self.registry,
            session: &mut self.session,
            params: &mut self.params,
            clock: &mut self.clock,
            peripherals: &mut self.peripherals,
        };
        match self.handlers[slot.index()].as_deref_mut() {
            Some(handler) => deliver(handler, &mut cx, call),
            None => deliver(&mut NoopApp, &mut cx, call),
        }
    }
}

fn deliver<H: AppHandler + ?Sized>(
    handler: &mut H,
    cx: &mut AppContext<'_>,
    call: AppCall,
) -> Result<(), ShellError> {
    match call {
        AppCall::Area(p) => handler.on_area_touch(cx, p),
        AppCall::Task(t) => handler.on_task(cx, t),
    }
}
