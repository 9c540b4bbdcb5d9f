use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use logix_core::crash;
use logix_core::time::TickSchedule;
use logix_platform::{console, WindowConfig};
use logix_render::GpuContext;

use crate::game::Game;
use crate::host::{GameWindow, Host, RunOutcome};

/// Updates allowed back to back before a render gets a turn.
const MAX_CATCH_UP_CYCLES: u32 = 5;

/// Run the update ticks due at `now`, at most `MAX_CATCH_UP_CYCLES` of them.
/// Each tick is stamped with its scheduled instant, so catch-up cycles see
/// one interval as their delta. `cycle` returns `false` to stop early.
fn run_due_cycles(schedule: &mut TickSchedule, now: Instant, mut cycle: impl FnMut(Instant) -> bool) -> u32 {
    let mut cycles = 0;
    while cycles < MAX_CATCH_UP_CYCLES && schedule.is_due(now) {
        let tick_at = schedule.next_due();
        cycles += 1;
        let keep_going = cycle(tick_at);
        if !schedule.advance(now) || !keep_going {
            break;
        }
    }
    cycles
}

fn next_wake(updates: &TickSchedule, renders: &TickSchedule) -> Instant {
    updates.next_due().min(renders.next_due())
}

/// A crash always asks for acknowledgement on a terminal; a clean run only
/// when the console was requested.
fn should_wait_for_key(interactive: bool, console_visible: bool, crashed: bool) -> bool {
    interactive && (console_visible || crashed)
}

struct WinitWindow(Arc<Window>);

impl GameWindow for WinitWindow {
    fn set_title(&self, title: &str) {
        self.0.set_title(title);
    }

    fn inner_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }

    fn request_inner_size(&self, width: u32, height: u32) {
        let _ = self.0.request_inner_size(PhysicalSize::new(width, height));
    }

    fn request_redraw(&self) {
        self.0.request_redraw();
    }

    fn close(&self) {
        self.0.set_visible(false);
    }
}

struct App<'h, G: Game> {
    host: &'h mut Host<G>,
    window: Option<Arc<Window>>,
    updates: TickSchedule,
    renders: TickSchedule,
}

impl<'h, G: Game> App<'h, G> {
    fn new(host: &'h mut Host<G>) -> Self {
        let now = Instant::now();
        let updates = TickSchedule::new(host.engine().target_cps(), now);
        let renders = TickSchedule::new(host.engine().target_fps(), now);
        Self {
            host,
            window: None,
            updates,
            renders,
        }
    }

    fn exit_if_finished(&self, event_loop: &ActiveEventLoop) {
        if self.host.is_finished() {
            event_loop.exit();
        }
    }
}

impl<G: Game> ApplicationHandler for App<'_, G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let config = WindowConfig::from(self.host.config());
        let window = match logix_platform::create_window(event_loop, &config) {
            Ok(window) => window,
            Err(err) => {
                self.host
                    .fail(anyhow::Error::new(err).context("Failed to create the game window").into());
                event_loop.exit();
                return;
            }
        };
        let gpu = match GpuContext::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(err) => {
                self.host
                    .fail(anyhow::Error::new(err).context("Failed to create the graphics context").into());
                event_loop.exit();
                return;
            }
        };

        self.host
            .attach(Box::new(WinitWindow(window.clone())), Box::new(gpu));
        self.window = Some(window);
        self.host.load();

        let now = Instant::now();
        self.updates = TickSchedule::new(self.host.engine().target_cps(), now);
        self.renders = TickSchedule::new(self.host.engine().target_fps(), now);
        self.exit_if_finished(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.host.is_running() {
            self.exit_if_finished(event_loop);
            return;
        }

        let now = Instant::now();
        let host = &mut *self.host;
        run_due_cycles(&mut self.updates, now, |tick_at| {
            host.update(tick_at);
            host.is_running()
        });

        self.renders.set_rate(self.host.engine().target_fps());
        if self.renders.is_due(now) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        let wake_at = next_wake(&self.updates, &self.renders);
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
        self.exit_if_finished(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.host.close_requested();
            }

            WindowEvent::Resized(physical_size) => {
                self.host
                    .resize(physical_size.width, physical_size.height);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if self.renders.is_due(now) {
                    self.renders.advance(now);
                    self.host.render(now);
                }
            }

            _ => {}
        }
        self.exit_if_finished(event_loop);
    }
}

/// Run `host` to completion on the current thread.
///
/// Resources are released and the game's shutdown hook has run by the time
/// this returns. When a console is attached the process waits for a keypress
/// first so the log stays readable.
pub fn run<G: Game>(mut host: Host<G>) -> RunOutcome {
    crash::install_panic_hook();
    let console_visible = host.engine().log.console_visible();
    let interactive = console::is_interactive();
    if console_visible {
        host.set_console_width(console::width());
        console::set_title(&format!("{} console", host.config().name));
    }

    if host.start() {
        match EventLoop::new() {
            Ok(event_loop) => {
                event_loop.set_control_flow(ControlFlow::Poll);
                let mut app = App::new(&mut host);
                if let Err(err) = event_loop.run_app(&mut app) {
                    host.fail(anyhow::Error::new(err).context("The event loop failed").into());
                }
            }
            Err(err) => {
                host.fail(anyhow::Error::new(err).context("Failed to create the event loop").into());
            }
        }
    }

    host.dispose();
    let outcome = host.outcome();

    if should_wait_for_key(interactive, console_visible, outcome.crashed) {
        if let Err(err) = console::wait_for_key("Press any key to exit.") {
            log::debug!("Could not wait for a keypress: {err}");
        }
    }
    if console_visible {
        console::set_title("");
    }
    outcome
}
