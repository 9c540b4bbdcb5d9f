//! The game-loop host.
//!
//! `Host` owns the game, the engine context and the window, and moves through
//! `Constructed → Running → (Crashed | Stopped) → Disposed`. It never talks to
//! winit or wgpu itself: the driver in `app` feeds it ticks and window events,
//! which keeps every lifecycle rule testable with fakes.
//!
//! Any error or panic escaping a game hook is a fault. A fault crashes the
//! game safely: the report is printed, the window closes, and disposal still
//! releases tracked resources before `shutdown(true)` runs.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use logix_core::crash::{self, CrashReport};
use logix_core::graphics::GraphicsApi;
use logix_core::logger::MESSAGE_COLUMN;
use logix_core::time::RateMeter;
use logix_core::title::{TitleTemplate, TitleValues};
use logix_core::{EngineError, HostConfig, LaunchOptions, Logger, LOGIX_ENGINE_VERSION};
use logix_render::{AssetSource, DirectoryAssets};

use crate::engine::Engine;
use crate::game::{CloseVote, Game};

const MIN_WRAP_WIDTH: usize = 20;

/// The platform window as the host sees it.
pub trait GameWindow {
    fn set_title(&self, title: &str);
    fn inner_size(&self) -> (u32, u32);
    fn request_inner_size(&self, width: u32, height: u32);
    fn request_redraw(&self);
    fn close(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Constructed,
    Running,
    Crashed,
    Stopped,
    Disposed,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub crashed: bool,
    pub report: Option<CrashReport>,
}

pub enum Fault {
    Error(anyhow::Error),
    Panic(Box<dyn Any + Send>),
}

impl From<anyhow::Error> for Fault {
    fn from(err: anyhow::Error) -> Self {
        Fault::Error(err)
    }
}

impl From<EngineError> for Fault {
    fn from(err: EngineError) -> Self {
        Fault::Error(err.into())
    }
}

pub struct Host<G: Game> {
    game: G,
    engine: Engine,
    config: HostConfig,
    state: HostState,
    crashed: bool,
    disposed: bool,
    loaded: bool,
    deferred_fault: Option<anyhow::Error>,
    window: Option<Box<dyn GameWindow>>,
    title: TitleTemplate,
    update_meter: RateMeter,
    render_meter: RateMeter,
    console_width: Option<usize>,
    report: Option<CrashReport>,
}

impl<G: Game> Host<G> {
    /// Build a host reading assets from `config.asset_root`.
    pub fn new<I, S>(game: G, config: HostConfig, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let assets = Box::new(DirectoryAssets::new(config.asset_root.clone()));
        Self::with_assets(game, config, args, assets)
    }

    pub fn with_assets<I, S>(game: G, config: HostConfig, args: I, assets: Box<dyn AssetSource>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let launch = LaunchOptions::parse(args);
        let log = Logger::new();
        log.set_debug(launch.debug);
        log.set_console_visible(launch.console_visible());
        for arg in &launch.unknown {
            log.warning(format!("Unknown startup argument '{arg}' was ignored"));
        }

        let deferred_fault = config.validate().err().map(anyhow::Error::from);
        let engine = Engine::new(log, &config, launch, assets);
        let title = TitleTemplate::new(config.title_format.clone());
        let update_meter = RateMeter::new(f64::from(config.target_cps));
        let render_meter = RateMeter::new(f64::from(config.target_fps));

        Self {
            game,
            engine,
            config,
            state: HostState::Constructed,
            crashed: false,
            disposed: false,
            loaded: false,
            deferred_fault,
            window: None,
            title,
            update_meter,
            render_meter,
            console_width: None,
            report: None,
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HostState::Running
    }

    /// Crashed, stopped or disposed: the event loop should exit.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            HostState::Crashed | HostState::Stopped | HostState::Disposed
        )
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Console columns available for crash reports. Without a width reports
    /// are not wrapped.
    pub fn set_console_width(&mut self, columns: usize) {
        self.console_width = Some(columns);
    }

    /// Queue type names for the console highlighter. Only allowed before the
    /// game starts.
    pub fn register_types(&mut self, names: &[&str]) {
        if self.state != HostState::Constructed {
            self.record_fault(EngineError::DeveloperMisuse(
                "Types can only be registered before the game is started".to_string(),
            ));
            return;
        }
        for name in names {
            self.engine.log.register_type(*name);
        }
    }

    /// Print the console header and raise any fault recorded while the host
    /// was being built. Returns whether the event loop should be entered.
    pub fn start(&mut self) -> bool {
        if self.engine.log.console_visible() {
            self.engine.log.engine(format!(
                "LogixEngine {LOGIX_ENGINE_VERSION} console for {} {}",
                self.config.name, self.config.version
            ));
        }
        match self.deferred_fault.take() {
            Some(fault) => {
                self.fail(Fault::Error(fault));
                false
            }
            None => true,
        }
    }

    /// Hand the host its window and graphics context.
    pub fn attach(&mut self, window: Box<dyn GameWindow>, gpu: Box<dyn GraphicsApi>) {
        if self.state != HostState::Constructed {
            self.engine
                .log
                .warning("Ignoring a second window; the game is already attached");
            return;
        }
        let (width, height) = window.inner_size();
        if width > 0 && height > 0 {
            self.engine.set_dimensions(width, height);
        }
        self.engine.attach_gpu(gpu);
        self.window = Some(window);
        self.state = HostState::Running;
    }

    /// Run the load phase once.
    pub fn load(&mut self) {
        if self.loaded || self.state != HostState::Running {
            return;
        }
        self.loaded = true;

        self.engine.log.info(format!("Starting game {}", self.config.name));
        self.engine.log.engine(format!(
            "This game is using LogixEngine version {LOGIX_ENGINE_VERSION}"
        ));
        if !self.invoke(|game, engine| game.pre_warm(engine)) {
            return;
        }
        if !self.invoke(|game, engine| game.load(engine)) {
            return;
        }
        self.engine.log.flush_registered_types();
        self.engine.log.info("Loading completed");
        if !self.invoke(|game, engine| game.load_completed(engine)) {
            return;
        }
        self.refresh_title(false);
    }

    pub fn update(&mut self, now: Instant) {
        if !self.loaded || self.state != HostState::Running {
            return;
        }
        let delta = self.update_meter.tick(now);
        self.engine.set_measured_rates(Some(self.update_meter.rate()), None);
        if !self.invoke(|game, engine| game.cycle(engine, delta)) {
            return;
        }
        if !self.config.title_in_render {
            self.refresh_title(false);
        }
    }

    pub fn render(&mut self, now: Instant) {
        if !self.loaded || self.state != HostState::Running {
            return;
        }
        let delta = self.render_meter.tick(now);
        self.engine.set_measured_rates(None, Some(self.render_meter.rate()));
        self.draw(delta);
    }

    /// Render hook, title refresh and present, without touching the frame
    /// meter.
    fn draw(&mut self, delta: f64) {
        if !self.loaded || self.state != HostState::Running {
            return;
        }
        if !self.invoke(|game, engine| game.render(engine, delta)) {
            return;
        }
        if self.config.title_in_render {
            self.refresh_title(false);
        }
        if let Err(err) = self.engine.gpu().present() {
            self.fail(EngineError::from(err).into());
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.state != HostState::Running {
            return;
        }
        if width == 0 || height == 0 {
            self.engine
                .log
                .debug(format!("Ignoring resize to {width}x{height} while minimised"));
            return;
        }

        let clamped_width = width.max(self.config.min_width);
        let clamped_height = height.max(self.config.min_height);
        if (clamped_width, clamped_height) != (width, height) {
            if let Some(window) = &self.window {
                window.request_inner_size(clamped_width, clamped_height);
            }
        }
        self.engine.set_dimensions(clamped_width, clamped_height);
        self.engine.gpu().resize(clamped_width, clamped_height);
        self.engine.log.debug(format!(
            "Window resized to {clamped_width}x{clamped_height}"
        ));

        self.refresh_title(true);
        if !self.engine.launch_options().dont_render_while_resizing {
            self.draw(0.0);
        }
    }

    /// Returns `true` when the close goes ahead.
    pub fn close_requested(&mut self) -> bool {
        if self.state != HostState::Running {
            return true;
        }
        let vote = if self.config.allow_close_cancel {
            let game = &mut self.game;
            let engine = &mut self.engine;
            match crash::capture_panics(AssertUnwindSafe(|| game.close_requested(engine))) {
                Ok(vote) => vote,
                Err(payload) => {
                    self.fail(Fault::Panic(payload));
                    return true;
                }
            }
        } else {
            None
        };

        if vote == Some(CloseVote::Veto) {
            self.engine.log.info("The game cancelled the close request");
            return false;
        }
        self.engine.log.info("Close request accepted, stopping the game");
        self.state = HostState::Stopped;
        if let Some(window) = &self.window {
            window.close();
        }
        true
    }

    /// Crash the game safely: report the fault and close the window. Only the
    /// first fault is reported in full.
    pub fn fail(&mut self, fault: Fault) {
        let report = match fault {
            Fault::Error(err) => CrashReport::from_error(&err),
            Fault::Panic(payload) => {
                let details = crash::take_panic_details();
                CrashReport::from_panic(
                    payload.as_ref(),
                    details.as_ref().and_then(|d| d.location.as_deref()),
                    details.as_ref().map(|d| &d.backtrace),
                )
            }
        };

        if self.crashed {
            let summary = report
                .causes
                .first()
                .map(|cause| cause.summary())
                .unwrap_or_default();
            self.engine
                .log
                .error(format!("Another fault occurred after the crash: {summary}"));
            return;
        }

        self.crashed = true;
        if self.state != HostState::Disposed {
            self.state = HostState::Crashed;
        }
        self.engine.log.reset_indentation();
        self.print_report(&report);
        if let Some(window) = &self.window {
            window.close();
        }
        self.report = Some(report);
    }

    /// Release tracked resources, then run the game's shutdown hook. Only the
    /// first call does anything.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Err(err) = self.engine.cleanup_resources() {
            self.engine.log.error(format!("Resource cleanup failed: {err}"));
        }

        let crashed = self.crashed;
        let game = &mut self.game;
        let engine = &mut self.engine;
        if let Err(payload) = crash::capture_panics(AssertUnwindSafe(|| game.shutdown(engine, crashed))) {
            self.fail(Fault::Panic(payload));
        }
        self.state = HostState::Disposed;
        self.engine.log.debug("Game disposed");
    }

    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            crashed: self.crashed,
            report: self.report.clone(),
        }
    }

    fn record_fault(&mut self, err: EngineError) {
        if self.state == HostState::Constructed {
            if self.deferred_fault.is_none() {
                self.deferred_fault = Some(err.into());
            }
        } else {
            self.fail(err.into());
        }
    }

    /// Run one game hook, turning an error or panic into a crash.
    fn invoke(&mut self, hook: impl FnOnce(&mut G, &mut Engine) -> anyhow::Result<()>) -> bool {
        if self.state != HostState::Running {
            return false;
        }
        let game = &mut self.game;
        let engine = &mut self.engine;
        match crash::capture_panics(AssertUnwindSafe(|| hook(game, engine))) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                self.fail(Fault::Error(err));
                false
            }
            Err(payload) => {
                self.fail(Fault::Panic(payload));
                false
            }
        }
    }

    fn refresh_title(&mut self, rates_unknown: bool) {
        let Some(window) = &self.window else {
            return;
        };
        let engine = &self.engine;
        let title = self.title.render(&TitleValues {
            name: engine.name(),
            version: engine.version(),
            measured_cps: engine.cps(),
            target_cps: engine.target_cps(),
            measured_fps: engine.fps(),
            target_fps: engine.target_fps(),
            width: engine.width(),
            height: engine.height(),
            rates_unknown,
        });
        window.set_title(&title);
    }

    fn print_report(&self, report: &CrashReport) {
        let log = &self.engine.log;
        if log.console_visible() {
            let width = self
                .console_width
                .map(|columns| columns.saturating_sub(MESSAGE_COLUMN).max(MIN_WRAP_WIDTH));
            for (i, line) in report.lines(width).into_iter().enumerate() {
                if i == 0 {
                    log.critical(line);
                } else {
                    log.critical_continued(line);
                }
            }
        } else {
            for line in report.lines(None) {
                log.write_raw(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{png_bytes, FakeGpu, FakeWindow, SharedJournal};
    use anyhow::Context;
    use logix_core::logger::Severity;
    use logix_render::{MemoryAssets, TextureOptions};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Script {
        events: Vec<String>,
        fail_in: Option<&'static str>,
        panic_in: Option<&'static str>,
        vote: Option<CloseVote>,
    }

    struct TestGame {
        script: Rc<RefCell<Script>>,
    }

    impl TestGame {
        fn step(&self, hook: &'static str) -> anyhow::Result<()> {
            let mut script = self.script.borrow_mut();
            script.events.push(hook.to_string());
            if script.panic_in == Some(hook) {
                drop(script);
                panic!("{hook} exploded");
            }
            if script.fail_in == Some(hook) {
                return Err(EngineError::AssetNotFound {
                    path: "textures/missing.png".into(),
                })
                .context(format!("{hook} failed"));
            }
            Ok(())
        }
    }

    impl Game for TestGame {
        fn pre_warm(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
            self.step("pre_warm")
        }

        fn load(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
            self.step("load")?;
            engine.load_texture("loading_texture", "textures/gui/loading.png", &TextureOptions::default())?;
            engine.load_texture("block_placeholder", "textures/blocks/placeholder.png", &TextureOptions::default())?;
            Ok(())
        }

        fn load_completed(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
            self.step("load_completed")
        }

        fn cycle(&mut self, _engine: &mut Engine, _delta: f64) -> anyhow::Result<()> {
            self.step("cycle")
        }

        fn render(&mut self, _engine: &mut Engine, _delta: f64) -> anyhow::Result<()> {
            self.step("render")
        }

        fn shutdown(&mut self, _engine: &mut Engine, crashed: bool) {
            self.script
                .borrow_mut()
                .events
                .push(format!("shutdown({crashed})"));
        }

        fn close_requested(&mut self, _engine: &mut Engine) -> Option<CloseVote> {
            self.script.borrow().vote
        }
    }

    struct Fixture {
        host: Host<TestGame>,
        script: Rc<RefCell<Script>>,
        journal: SharedJournal,
    }

    impl Fixture {
        fn events(&self) -> Vec<String> {
            self.script.borrow().events.clone()
        }

        fn attach_and_load(&mut self) {
            assert!(self.host.start());
            let window = FakeWindow {
                journal: self.journal.clone(),
                size: (1280, 720),
            };
            self.host
                .attach(Box::new(window), Box::new(FakeGpu::new(self.journal.clone())));
            self.host.load();
        }
    }

    fn fixture_with(config: HostConfig, args: &[&str], script: Script) -> Fixture {
        let script = Rc::new(RefCell::new(script));
        let assets = MemoryAssets::new()
            .with("textures/gui/loading.png", png_bytes())
            .with("textures/blocks/placeholder.png", png_bytes());
        let game = TestGame {
            script: script.clone(),
        };
        Fixture {
            host: Host::with_assets(game, config, args.iter().copied(), Box::new(assets)),
            script,
            journal: SharedJournal::default(),
        }
    }

    fn fixture(script: Script) -> Fixture {
        fixture_with(HostConfig::default(), &[], script)
    }

    #[test]
    fn normal_run_walks_every_phase_once() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        assert_eq!(fx.host.state(), HostState::Running);

        let now = Instant::now();
        fx.host.update(now);
        fx.host.render(now);
        assert!(fx.host.close_requested());
        assert_eq!(fx.host.state(), HostState::Stopped);

        fx.host.dispose();
        fx.host.dispose();
        assert_eq!(fx.host.state(), HostState::Disposed);
        assert_eq!(
            fx.events(),
            vec!["pre_warm", "load", "load_completed", "cycle", "render", "shutdown(false)"]
        );

        let journal = fx.journal.borrow();
        assert_eq!(journal.presents, 1);
        assert_eq!(journal.deleted_textures, vec![1, 2]);
        assert!(journal.closed);
        assert!(!fx.host.outcome().crashed);
    }

    #[test]
    fn load_logs_the_engine_banner() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        let records = fx.host.engine().log.records();
        assert!(records.iter().any(|r| {
            r.severity == Severity::Engine
                && r.message == format!("This game is using LogixEngine version {LOGIX_ENGINE_VERSION}")
        }));
        assert!(records.iter().any(|r| r.message == "Loading completed"));
    }

    #[test]
    fn render_error_crashes_safely_and_still_cleans_up() {
        let mut fx = fixture(Script {
            fail_in: Some("render"),
            ..Script::default()
        });
        fx.attach_and_load();
        fx.host.render(Instant::now());

        assert_eq!(fx.host.state(), HostState::Crashed);
        assert!(fx.host.is_finished());
        assert!(fx.journal.borrow().closed);
        assert_eq!(fx.journal.borrow().presents, 0);

        fx.host.dispose();
        assert_eq!(fx.journal.borrow().deleted_textures, vec![1, 2]);
        assert_eq!(fx.events().last().map(String::as_str), Some("shutdown(true)"));

        let outcome = fx.host.outcome();
        assert!(outcome.crashed);
        let report = outcome.report.expect("crash report");
        let kinds: Vec<&str> = report.causes.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Error", "AssetNotFound"]);
        assert_eq!(report.causes[0].message, "render failed");
    }

    #[test]
    fn panics_in_hooks_are_contained() {
        let mut fx = fixture(Script {
            panic_in: Some("cycle"),
            ..Script::default()
        });
        fx.attach_and_load();
        fx.host.update(Instant::now());
        fx.host.render(Instant::now());

        assert_eq!(fx.host.state(), HostState::Crashed);
        fx.host.dispose();
        let report = fx.host.outcome().report.expect("crash report");
        assert_eq!(report.causes[0].kind, "Panic");
        assert_eq!(report.causes[0].message, "cycle exploded");
        // Render never ran after the crash.
        assert!(!fx.events().contains(&"render".to_string()));
        assert_eq!(fx.host.engine().log.depth(), 0);
    }

    #[test]
    fn crash_report_is_written_raw_without_a_console() {
        let mut fx = fixture(Script {
            fail_in: Some("load"),
            ..Script::default()
        });
        fx.attach_and_load();
        let records = fx.host.engine().log.records();
        let raw: Vec<&str> = records
            .iter()
            .filter(|r| r.severity == Severity::Raw)
            .map(|r| r.message.as_str())
            .collect();
        assert_eq!(raw[0], crash::HEADLINE);
        assert_eq!(raw[1], "Caused by an Error with the message: load failed");
        // The game crashed before load_completed.
        assert_eq!(fx.events(), vec!["pre_warm", "load"]);
    }

    #[test]
    fn crash_report_goes_through_critical_records_with_a_console() {
        let mut fx = fixture_with(
            HostConfig::default(),
            &["-console"],
            Script {
                fail_in: Some("pre_warm"),
                ..Script::default()
            },
        );
        fx.host.set_console_width(80);
        fx.attach_and_load();
        let critical: Vec<_> = fx
            .host
            .engine()
            .log
            .records()
            .into_iter()
            .filter(|r| r.severity == Severity::Critical)
            .collect();
        assert_eq!(critical[0].message, crash::HEADLINE);
        assert!(!critical[0].continued);
        assert!(critical[1..].iter().all(|r| r.continued));
        assert!(critical[1..]
            .iter()
            .filter(|r| !r.message.starts_with("  at: "))
            .all(|r| r.message.chars().count() <= 80 - MESSAGE_COLUMN));
    }

    #[test]
    fn invalid_config_crashes_before_the_loop() {
        let config = HostConfig {
            target_fps: 0,
            ..HostConfig::default()
        };
        let mut fx = fixture_with(config, &[], Script::default());
        assert!(!fx.host.start());
        assert_eq!(fx.host.state(), HostState::Crashed);

        fx.host.dispose();
        assert_eq!(fx.events(), vec!["shutdown(true)"]);
        let report = fx.host.outcome().report.expect("report");
        assert_eq!(report.causes[0].kind, "InvalidTargetRate");
    }

    #[test]
    fn registered_types_are_flushed_during_load() {
        let mut fx = fixture_with(HostConfig::default(), &["-debug"], Script::default());
        fx.host.register_types(&["Block", "Item", "Player", "Chunk"]);
        fx.attach_and_load();
        assert!(fx
            .host
            .engine()
            .log
            .records()
            .iter()
            .any(|r| r.message == "Registered types: Block, Item, Player, Chunk"));
    }

    #[test]
    fn registering_types_after_start_is_misuse() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        fx.host.register_types(&["Late"]);
        assert_eq!(fx.host.state(), HostState::Crashed);
        let report = fx.host.outcome().report.expect("report");
        assert_eq!(report.causes[0].kind, "DeveloperMisuse");
    }

    #[test]
    fn resize_clamps_to_the_minimum_and_rerenders() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        fx.host.resize(300, 900);

        let engine = fx.host.engine();
        assert_eq!((engine.width(), engine.height()), (640, 900));
        assert_eq!((engine.half_width(), engine.half_height()), (320.0, 450.0));

        let journal = fx.journal.borrow();
        assert_eq!(journal.requested_sizes, vec![(640, 900)]);
        assert_eq!(journal.resizes, vec![(640, 900)]);
        assert!(journal.titles.iter().any(|t| t.contains("───/─── cycles/sec")));
        assert_eq!(journal.presents, 1);
    }

    #[test]
    fn resize_render_leaves_the_frame_meter_alone() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        let fps_before = fx.host.engine().fps();
        fx.host.resize(1600, 900);
        fx.host.resize(1700, 950);

        assert_eq!(fx.journal.borrow().presents, 2);
        assert_eq!(fx.host.render_meter.tick_count, 0);
        assert_eq!(fx.host.engine().fps(), fps_before);
        let renders = fx.events().iter().filter(|e| *e == "render").count();
        assert_eq!(renders, 2);
    }

    #[test]
    fn drwr_skips_the_resize_render() {
        let mut fx = fixture_with(HostConfig::default(), &["-DRWR"], Script::default());
        fx.attach_and_load();
        fx.host.resize(1024, 768);
        assert_eq!(fx.journal.borrow().presents, 0);
        assert!(fx.journal.borrow().requested_sizes.is_empty());
        assert!(!fx.events().contains(&"render".to_string()));
    }

    #[test]
    fn minimised_resize_is_ignored() {
        let mut fx = fixture(Script::default());
        fx.attach_and_load();
        fx.host.resize(0, 0);
        assert!(fx.journal.borrow().resizes.is_empty());
        assert_eq!(fx.host.engine().width(), 1280);
    }

    #[test]
    fn veto_keeps_the_game_running_when_allowed() {
        let config = HostConfig {
            allow_close_cancel: true,
            ..HostConfig::default()
        };
        let mut fx = fixture_with(
            config,
            &[],
            Script {
                vote: Some(CloseVote::Veto),
                ..Script::default()
            },
        );
        fx.attach_and_load();
        assert!(!fx.host.close_requested());
        assert_eq!(fx.host.state(), HostState::Running);
        assert!(!fx.journal.borrow().closed);
    }

    #[test]
    fn veto_is_ignored_when_cancelling_is_not_allowed() {
        let mut fx = fixture(Script {
            vote: Some(CloseVote::Veto),
            ..Script::default()
        });
        fx.attach_and_load();
        assert!(fx.host.close_requested());
        assert_eq!(fx.host.state(), HostState::Stopped);
    }

    #[test]
    fn unknown_arguments_only_warn() {
        let fx = fixture_with(HostConfig::default(), &["-fullscreen"], Script::default());
        let records = fx.host.engine().log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert!(records[0].message.contains("-fullscreen"));
    }

    #[test]
    fn title_follows_the_update_phase_when_configured() {
        let config = HostConfig {
            title_in_render: false,
            name: "X".to_string(),
            title_format: "%name% %tcps% %res%".to_string(),
            ..HostConfig::default()
        };
        let mut fx = fixture_with(config, &[], Script::default());
        fx.attach_and_load();
        let before = fx.journal.borrow().titles.len();

        fx.host.render(Instant::now());
        assert_eq!(fx.journal.borrow().titles.len(), before);

        fx.host.update(Instant::now());
        assert_eq!(fx.journal.borrow().titles.last().map(String::as_str), Some("X 30.0 1280×720"));
    }
}
