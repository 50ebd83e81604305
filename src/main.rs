#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use gridfall::FrameClock;
use gridfall::app::App;
use gridfall::config::{Config, loader};
use gridfall::input::KeyTracker;
use gridfall::ui;
use log::{debug, error, info, warn};
use ratatui::{Terminal, prelude::*};

fn main() -> Result<()> {
    // Create log file and redirect stderr to it
    let log_path = "gridfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("failed to create log file {log_path}"))?;

    // Safety: both descriptors are open for the whole call; dup2 only swaps
    // what stderr points at
    unsafe {
        libc::dup2(log_file.as_raw_fd(), io::stderr().as_raw_fd());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting gridfall");

    let config = match loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            Config::default()
        }
    };

    // Terminal initialization
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    // Key releases make held keys exact where the terminal supports them
    let enhanced_keys = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("Terminal does not report key releases, held keys are estimated");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let app = App::new(&config);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
        return Err(err);
    }

    info!("Exiting gridfall");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut keys = KeyTracker::default();

    // Flush any pending input events that might be in the buffer
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    debug!("Entering frame loop");

    loop {
        let due = app.world.resource_mut::<FrameClock>().due_frames();
        for _ in 0..due {
            let input = keys.frame_input(Instant::now());
            app.step(input);
        }
        if due > 0 {
            let snapshot = app.snapshot();
            terminal.draw(|f| ui::render(f, &snapshot, app.show_controls))?;
        }

        if app.should_quit {
            return Ok(());
        }

        let wait = app.world.resource::<FrameClock>().until_next();
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                keys.handle(&key, Instant::now());
                if keys.quit_requested() {
                    app.should_quit = true;
                }
            }
        }
    }
}
