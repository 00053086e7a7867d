use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use schulte::{
    app::{App, Control},
    app_dirs::AppDirs,
    best_time::{BestTimes, SqliteStore},
    config::{ConfigStore, FileConfigStore, Settings},
    logging::init_file_logger,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    sequence::Mode,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// schulte table attention trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Find the symbols of a shuffled grid in order as fast as you can. Keep your eyes on the centre and use peripheral vision; personal bests are kept per grid size and mode."
)]
pub struct Cli {
    /// grid size (3 to 9)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u8).range(3..=9))]
    size: Option<u8>,

    /// target order
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// hide the fixation point at the grid centre
    #[clap(long)]
    no_fixation: bool,

    /// do not highlight the next target
    #[clap(long)]
    no_highlight: bool,

    /// best-time database to use instead of the default location
    #[clap(long)]
    db: Option<PathBuf>,
}

impl Cli {
    /// Command line values win over persisted settings
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(size) = self.size {
            settings.size = size as usize;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if self.no_fixation {
            settings.show_fixation = false;
        }
        if self.no_highlight {
            settings.highlight_target = false;
        }
        settings.normalized()
    }

    fn db_path(&self) -> Option<PathBuf> {
        self.db.clone().or_else(AppDirs::db_path)
    }
}

fn open_best_times(path: Option<PathBuf>) -> BestTimes {
    match path.map(SqliteStore::open) {
        Some(Ok(store)) => BestTimes::new(Box::new(store)),
        Some(Err(e)) => {
            warn!("best times not persisted, database unavailable: {e}");
            BestTimes::in_memory()
        }
        None => {
            warn!("best times not persisted, no state directory");
            BestTimes::in_memory()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = init_file_logger(&log_path) {
            eprintln!("schulte: logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let settings = cli.apply(config_store.load());
    info!(
        "starting with {settings:?}, config at {}",
        config_store.path().display()
    );
    let best_times = open_best_times(cli.db_path());
    let mut app = App::new(settings, best_times, Some(Box::new(config_store)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    // ticks are requested only while the trial runs; leaving Running drops them
    while let Some(event) = runner.step(app.needs_tick()) {
        let now = Instant::now();
        match event {
            AppEvent::Tick => app.on_tick(now),
            AppEvent::Resize => {}
            AppEvent::Click { column, row } => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                app.on_click(column, row, area, now);
            }
            AppEvent::Key(key) => {
                if app.on_key(key, now) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
