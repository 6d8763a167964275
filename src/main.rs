mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use kbplayer::{
    app::App,
    app_dirs::AppDirs,
    clock::SystemClock,
    engine::Engine,
    passages::LanguageMode,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    speech::{CommandSpeaker, NoopSpeaker, Speaker},
    storage::FileStorage,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// typing practice with live speed feedback and spoken words
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Typing practice on English prose and Chinese poetry with live APM and streak tracking, a virtual keyboard, spoken word feedback and a persistent history of finished texts."
)]
pub struct Cli {
    /// start in Chinese mode for this run; the saved language is left alone
    #[clap(long)]
    chinese: bool,

    /// custom text to practise instead of the built-in passages
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// seed for passage selection
    #[clap(long)]
    seed: Option<u64>,

    /// directory holding history and settings (defaults to the platform data dir)
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// never speak, regardless of the pronunciation setting
    #[clap(long)]
    mute: bool,

    /// write logs here; RUST_LOG controls the level
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn build_app(&self) -> App {
        let storage = match &self.data_dir {
            Some(dir) => FileStorage::with_dir(dir.clone()),
            None => FileStorage::new(),
        };
        tracing::debug!(data_dir = %storage.dir().display(), "using storage");
        let rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };

        let mut engine = Engine::new(Box::new(storage), Box::new(SystemClock), rng);
        if self.chinese {
            engine = engine.with_language(LanguageMode::Chinese);
        }
        if let Some(prompt) = &self.prompt {
            engine = engine.with_fixed_text(prompt.clone());
        }

        let speaker: Box<dyn Speaker> = if self.mute {
            Box::new(NoopSpeaker)
        } else {
            Box::new(CommandSpeaker::detect())
        };

        App::new(engine, speaker)
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().or_else(|| {
        std::env::var_os("RUST_LOG").map(|_| AppDirs::default_log_path())
    });
    if let Some(path) = &log_path {
        init_logging(path)?;
    }

    let mut app = cli.build_app();
    tracing::info!(
        language = %app.engine.language(),
        history = app.engine.history().len(),
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    while !app.should_quit() {
        terminal.draw(|f| ui::draw(app, f))?;
        app.handle_event(runner.step());
    }

    tracing::info!("quit");
    Ok(())
}
