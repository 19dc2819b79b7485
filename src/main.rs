//! Terminal defrag runner (default binary).
//!
//! The foreground thread owns input, resize handling and shutdown; a pulse
//! thread ticks the animation. Both share one mutex-guarded stage.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tui_defrag::core::RenderPort;
use tui_defrag::input::{poll_input, InputEvent};
use tui_defrag::runtime::{
    apply_resize, spawn_pulse, Control, PollFailures, ResizeMonitor, RuntimeConfig, Stage,
};
use tui_defrag::term::{fits, min_size, CrosstermPort};

type DefragStage = Stage<CrosstermPort, StdRng>;

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    init_logging(&config)?;
    info!("Starting tui-defrag...");
    info!("{:?}", config);

    let mut port = CrosstermPort::new();
    if let Err(e) = port.enter() {
        let _ = port.exit();
        return Err(e.context("failed to initialize terminal"));
    }

    let (w, h) = port.size();
    if !fits(w, h) {
        port.exit()?;
        let (min_w, min_h) = min_size();
        bail!("terminal is {}x{}, need at least {}x{}", w, h, min_w, min_h);
    }

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stage = Arc::new(Mutex::new(Stage::new(port, rng, config.engine_config())));
    let control = Arc::new(Control::new());

    let result = run(&config, &control, &stage, (w, h));
    if let Err(e) = &result {
        error!("runtime error: {:#}", e);
    }

    shutdown(&control, &stage)?;
    info!("tui-defrag exited");
    result
}

fn init_logging(config: &RuntimeConfig) -> Result<()> {
    // stdout belongs to the alternate screen, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn run(
    config: &RuntimeConfig,
    control: &Arc<Control>,
    stage: &Arc<Mutex<DefragStage>>,
    initial: (u16, u16),
) -> Result<()> {
    apply_resize(control, stage, initial).context("initial layout failed")?;

    let pulse = spawn_pulse(
        "defrag-pulse",
        config.draw_interval,
        Arc::clone(control),
        Arc::clone(stage),
    )?;
    let result = foreground_loop(config, control, stage, initial);

    control.shutdown();
    if !pulse.join_timeout(config.join_timeout) {
        warn!("pulse thread still running at shutdown");
    }
    result
}

fn foreground_loop(
    config: &RuntimeConfig,
    control: &Control,
    stage: &Mutex<DefragStage>,
    initial: (u16, u16),
) -> Result<()> {
    let mut monitor = ResizeMonitor::new(initial);
    let mut failures = PollFailures::default();

    while !control.stop.is_stopped() {
        let event = failures.absorb(poll_input(config.poll_timeout))?;
        if event == InputEvent::Quit {
            info!("quit requested");
            break;
        }

        let polled = terminal::size().ok();
        if let Some(size) = monitor.observe(event, polled) {
            if let Err(e) = apply_resize(control, stage, size) {
                warn!("resize to {}x{} failed: {:#}", size.0, size.1, e);
            }
        }
    }
    Ok(())
}

/// Stop the pulse thread and put the terminal back.
fn shutdown(control: &Control, stage: &Mutex<DefragStage>) -> Result<()> {
    control.shutdown();

    // A detached pulse thread may still hold the lock.
    match stage.try_lock() {
        Ok(mut stage) => stage.port_mut().exit(),
        Err(std::sync::TryLockError::Poisoned(poisoned)) => {
            PoisonError::into_inner(poisoned).port_mut().exit()
        }
        Err(std::sync::TryLockError::WouldBlock) => {
            warn!("stage busy at shutdown; restoring terminal directly");
            force_restore()
        }
    }
}

fn force_restore() -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}
