mod app;
mod audio;
mod clock;
mod domain;
mod input;
mod logging;
mod persistence;
mod stats;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use audio::{AmbiencePlayer, CommandHandle, Cues};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use domain::AmbienceSelection;
use persistence::{
    config_file, ensure_pomora_dir, init_local_dir, load_settings, log_file, store_file, KvStore,
    Settings,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use stats::StatsStore;
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "pomora")]
#[command(about = "A calm, terminal-based focus timer with ambient sounds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Focus length in minutes (overrides config.json)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    focus: Option<u32>,

    /// Break length in minutes (overrides config.json)
    #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..))]
    break_minutes: Option<u32>,

    /// Ambient sound: none, rain, white or cafe
    #[arg(long, value_parser = parse_sound)]
    sound: Option<AmbienceSelection>,

    /// Start a 25/5 pomodoro right away
    #[arg(long)]
    quick: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .pomora directory in the current directory
    Init,
    /// Print how many focus sessions were completed today
    Stats,
}

fn parse_sound(value: &str) -> Result<AmbienceSelection, String> {
    AmbienceSelection::from_tag(value)
        .ok_or_else(|| format!("unknown sound '{}' (expected none, rain, white or cafe)", value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let dir = init_local_dir()?;
            println!("Initialized pomora directory: {}", dir.display());
            println!();
            println!("Pomora will now keep its settings and stats in this directory.");
            println!("Put sound files in {} to use them.", dir.join("sounds").display());
            Ok(())
        }
        Some(Commands::Stats) => {
            let mut store = KvStore::open(store_file()?)?;
            let count = StatsStore::new().load(&mut store)?;
            println!("Focus sessions completed today: {}", count);
            Ok(())
        }
        None => run_tui(&cli),
    }
}

/// Apply command-line overrides on top of config.json
fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(focus) = cli.focus {
        settings.focus_minutes = focus;
    }
    if let Some(break_minutes) = cli.break_minutes {
        settings.break_minutes = break_minutes;
    }
    if let Some(sound) = cli.sound {
        settings.ambience = sound;
    }
}

/// Register one player handle per ambience sound
fn build_ambience(settings: &Settings, base: &Path) -> AmbiencePlayer {
    let mut player = AmbiencePlayer::new();
    for &selection in AmbienceSelection::audible() {
        let Some(sound) = settings.sounds.ambience(selection) else {
            continue;
        };
        let source = sound.resolve(base);
        let is_stream = sound.is_stream();
        let handle = if is_stream {
            CommandHandle::stream(settings.player.clone(), source)
        } else {
            CommandHandle::clip(settings.player.clone(), source, true)
        };
        player.register(selection, Box::new(handle), is_stream);
    }
    player
}

fn build_cues(settings: &Settings, base: &Path) -> Cues {
    let click = CommandHandle::clip(settings.player.clone(), settings.sounds.click.resolve(base), false);
    let gong = CommandHandle::clip(settings.player.clone(), settings.sounds.gong.resolve(base), false);
    Cues::new(Some(Box::new(click)), Some(Box::new(gong)))
}

fn run_tui(cli: &Cli) -> Result<()> {
    let data_dir = ensure_pomora_dir()?;
    logging::init_logging(&log_file()?)?;
    eprintln!("Using pomora directory: {}", data_dir.display());

    let mut settings = load_settings(config_file()?)?;
    apply_overrides(&mut settings, cli);
    info!(focus = settings.focus_minutes, break_minutes = settings.break_minutes, sound = settings.ambience.to_tag(), "starting");

    let store = KvStore::open(store_file()?)?;
    let ambience = build_ambience(&settings, &data_dir);
    let cues = build_cues(&settings, &data_dir);
    let mut app = AppState::new(&settings, store, ambience, cues)?;

    if cli.quick {
        app.quick_start();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle("Pomora"))?;
    terminal.show_cursor()?;

    // Nothing keeps playing after the window is gone
    app.ambience.stop();
    info!("exiting");

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut shown_title = String::new();

    loop {
        app.update(Instant::now(), chrono::Local::now().date_naive());

        if app.view.title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&app.view.title))?;
            shown_title = app.view.title.clone();
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }
    }
}
