mod blocks;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;

use logix_core::{time, LaunchOptions};
use logix_engine::{Engine, Game, Host, HostConfig, TextureOptions};

use crate::blocks::{verify_block_table, Block};

const STARTUP_WIDTH: u32 = 1280;
const STARTUP_HEIGHT: u32 = 720;
const MIN_WIDTH: u32 = 640;
const MIN_HEIGHT: u32 = 480;
const STARTUP_CPS: u32 = 30;
const STARTUP_FPS: u32 = 60;

const CONFIG_FILE: &str = "terrascape.json";

/// Names highlighted by the debug console.
const HIGHLIGHT_TYPES: &[&str] = &["Block", "Item", "Player", "Chunk"];

struct Terrascape;

impl Game for Terrascape {
    fn pre_warm(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        if engine.debug_mode() {
            engine.log.debug(profiler_summary(time::clock_resolution()));
        }
        verify_block_table(&engine.log)?;
        Ok(())
    }

    fn load(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        let log = engine.log.clone();
        log.profile("Loading assets", true, || -> anyhow::Result<()> {
            log.profile("Loading textures", true, || -> anyhow::Result<()> {
                let options = TextureOptions::default();
                engine.load_texture("loading_texture", "textures/gui/loading.png", &options)?;
                engine.load_texture("block_placeholder", "textures/blocks/placeholder.png", &options)?;
                Ok(())
            })?;

            log.profile("Loading shaders", true, || -> anyhow::Result<()> {
                engine
                    .load_shader(
                        "interface_shader",
                        "shaders/ui_shader.vert",
                        "shaders/ui_shader.frag",
                        false,
                    )
                    .context("Failed to load the interface shader")?;
                Ok(())
            })
        })
    }

    fn load_completed(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        engine.log.info("Terrascape is running");
        for block in Block::ALL {
            engine
                .log
                .debug(format!("Block '{block}' IsRendered: {}", block.info().is_rendered));
        }
        Ok(())
    }

    fn cycle(&mut self, _engine: &mut Engine, _delta: f64) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(&mut self, _engine: &mut Engine, _delta: f64) -> anyhow::Result<()> {
        Ok(())
    }

    fn shutdown(&mut self, engine: &mut Engine, crashed: bool) {
        let suffix = if crashed { " because of a crash" } else { "" };
        engine.log.debug(format!("Shutting down{suffix}"));
    }
}

fn profiler_summary(resolution: Option<Duration>) -> String {
    match resolution {
        Some(step) => {
            let ticks = (1.0 / step.as_secs_f64()).round();
            let high_res = if time::is_high_resolution(step) { "Yes" } else { "No" };
            format!("Profiler resolution: {ticks:.0} ticks/sec, High res: {high_res}")
        }
        None => "Profiler resolution: unknown, High res: No".to_string(),
    }
}

fn default_config() -> HostConfig {
    HostConfig {
        name: "Terrascape".to_string(),
        version: "1.0.0".to_string(),
        startup_width: STARTUP_WIDTH,
        startup_height: STARTUP_HEIGHT,
        min_width: MIN_WIDTH,
        min_height: MIN_HEIGHT,
        target_cps: STARTUP_CPS,
        target_fps: STARTUP_FPS,
        asset_root: default_asset_root(),
        ..HostConfig::default()
    }
}

/// `assets/` next to the working directory, falling back to the copy shipped
/// with the crate.
fn default_asset_root() -> PathBuf {
    let local = Path::new("assets");
    if local.is_dir() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
    }
}

fn init_logging(launch: &LaunchOptions) {
    let level = if launch.debug {
        LevelFilter::Debug
    } else if launch.console_visible() {
        LevelFilter::Info
    } else {
        LevelFilter::Off
    };
    // The engine logger already formats its records into columns.
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_logging(&LaunchOptions::parse(&args));

    let config = if Path::new(CONFIG_FILE).is_file() {
        match logix_core::config::load_from_path(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        default_config()
    };

    let mut host = Host::new(Terrascape, config, &args);
    host.register_types(HIGHLIGHT_TYPES);

    let outcome = logix_engine::run(host);
    if outcome.crashed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
