use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agentwatch::app::{write_snapshot, App};
use agentwatch::data::activity::UPLOAD_STEP;
use agentwatch::data::duration::parse_duration;
use agentwatch::ui::{self, Theme};
use agentwatch::{events, Driver, EngineConfig, TelemetryEngine, UploadCandidate};

#[derive(Parser, Debug)]
#[command(name = "agentwatch")]
#[command(about = "Live terminal dashboard for simulated AI agent telemetry")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metric/status/alert timer period (e.g., "5s", "500ms")
    #[arg(long)]
    fast_interval: Option<String>,

    /// Health-check timer period (e.g., "30s")
    #[arg(long)]
    slow_interval: Option<String>,

    /// Communication feed timer period (e.g., "15s")
    #[arg(long)]
    feed_interval: Option<String>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Export state to JSON file after --ticks fast ticks and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Number of fast ticks to simulate in export mode
    #[arg(long, default_value = "10", requires = "export")]
    ticks: u32,

    /// Files to run through the simulated upload pipeline
    #[arg(short, long)]
    upload: Vec<PathBuf>,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.export.is_some())?;

    let config = build_config(&args)?;
    let mut engine = TelemetryEngine::from_config(config)?;

    for path in &args.upload {
        let candidate = upload_candidate(path)?;
        // Rejections surface as notifications in the dashboard
        if let Err(e) = engine.start_upload(&candidate) {
            warn!(path = %path.display(), error = %e, "upload rejected");
        }
    }

    if let Some(export_path) = args.export {
        return export_to_file(engine, args.ticks, &export_path);
    }

    run_tui(engine)
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agentwatch=info"))
    };

    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .try_init();
    } else if headless {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .try_init();
    }
    Ok(())
}

/// Merge the optional config file with command-line overrides.
fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match args.config {
        Some(ref path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(ref s) = args.fast_interval {
        config.fast_interval_ms = parse_duration(s)?.as_millis() as u64;
    }
    if let Some(ref s) = args.slow_interval {
        config.slow_interval_ms = parse_duration(s)?.as_millis() as u64;
    }
    if let Some(ref s) = args.feed_interval {
        config.feed_interval_ms = parse_duration(s)?.as_millis() as u64;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn upload_candidate(path: &Path) -> Result<UploadCandidate> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot read upload {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadCandidate::new(name, metadata.len()))
}

/// Run `ticks` fast ticks without timers and write the final state.
///
/// Slow and feed timers fire in proportion to their periods, and uploads
/// advance as many steps as would fit into each fast period.
fn export_to_file(mut engine: TelemetryEngine, ticks: u32, export_path: &Path) -> Result<()> {
    let fast = engine.config().fast_interval();
    let slow = engine.config().slow_interval();
    let feed = engine.config().feed_interval();
    let steps_per_tick =
        (fast.as_millis() / UPLOAD_STEP.as_millis()).clamp(1, u32::MAX as u128) as u32;

    let start = Instant::now();
    for i in 1..=ticks {
        let elapsed = simulated_elapsed(fast, i)?;
        let previous = elapsed - fast;
        let base = start
            .checked_add(previous)
            .context("Simulated time exceeds the clock range")?;

        for step in 1..=steps_per_tick {
            engine.step_activities(base + UPLOAD_STEP * step);
        }

        engine.tick();
        engine.alert_tick();
        for _ in crossings(previous, elapsed, slow) {
            engine.health_tick();
        }
        for _ in crossings(previous, elapsed, feed) {
            engine.message_tick();
        }
    }

    write_snapshot(&engine.snapshot(), export_path)?;
    info!(ticks, path = %export_path.display(), "exported state");
    println!("Exported state to {}", export_path.display());
    Ok(())
}

/// Simulated time at the end of fast tick `tick` (1-based).
fn simulated_elapsed(fast: Duration, tick: u32) -> Result<Duration> {
    fast.checked_mul(tick)
        .with_context(|| format!("Simulated time overflows at tick {}", tick))
}

/// Multiples of `period` within `(from, to]`.
fn crossings(from: Duration, to: Duration, period: Duration) -> std::ops::Range<u128> {
    let period = period.as_millis().max(1);
    (from.as_millis() / period)..(to.as_millis() / period)
}

fn run_tui(engine: TelemetryEngine) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let driver = Driver::spawn(engine, runtime.handle());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(Box::new(driver), Theme::auto_detect());
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the app drops the driver handle, which stops the timers
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        app.poll_snapshot();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
