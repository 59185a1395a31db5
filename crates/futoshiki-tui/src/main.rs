mod app;
mod render;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futoshiki_core::{Config, DateKey, Game, PersistenceGateway};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Play today's 4x4 Futoshiki in the terminal
#[derive(Parser, Debug)]
#[command(name = "futoshiki", version)]
struct Args {
    /// Catalog URL or path to a local puzzles.json
    #[arg(long)]
    catalog: Option<String>,
    /// Directory for saved state and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Play as if today were this date (YYYYMMDD or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: Option<DateKey>,
    /// Catalog fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn parse_date(s: &str) -> Result<DateKey, String> {
    DateKey::parse(s).map_err(|e| e.to_string())
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env();
    args.apply(&mut config);

    init_logging(&config);
    log::info!("starting with {:?}", config);

    let today = args.date.clone().unwrap_or_else(DateKey::today);
    let gateway = PersistenceGateway::new(config.state_backend());
    let game = match Game::start(&today, config.catalog_source(), gateway) {
        Ok(game) => game,
        Err(e) => {
            log::error!("could not start puzzle {}: {}", today, e);
            eprintln!("Could not load the puzzle for {}: {}", today, e);
            if e.is_retryable() {
                eprintln!("Check your connection and try again.");
            }
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, App::new(game));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the board
fn init_logging(config: &Config) {
    let path = config.log_path();
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled: cannot open {}: {}", path.display(), e);
            return;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let tick_rate = App::TICK_RATE;
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, &app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
