//! iQuiz - Multiple-choice quizzes in the terminal
//!
//! Keeps a quiz catalog in sync with a remote JSON feed, falls back to an
//! offline copy when the network is unavailable, and walks through a quiz
//! one question at a time.

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iquiz::app::App;
use iquiz::cache::QuizCache;
use iquiz::cli::{Cli, StartupConfig};
use iquiz::settings::{Settings, SettingsStore};
use iquiz::store::QuizStore;
use iquiz::ui;

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// How long `--list` waits for the network before giving up
const LIST_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Log file name inside the cache directory
const LOG_FILE_NAME: &str = "iquiz.log";

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Initialize the tracing subscriber for logging
///
/// The interface owns the terminal, so logs go to a file in the cache
/// directory. Use the RUST_LOG env var to control the level (e.g. RUST_LOG=debug).
fn init_tracing(cache: Option<&QuizCache>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let dir = cache?.dir().clone();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

/// Loads saved settings, falling back to defaults when they can't be read
fn load_settings(store: Option<&SettingsStore>) -> Settings {
    let Some(store) = store else {
        return Settings::default();
    };
    match store.load() {
        Ok(settings) => settings,
        Err(err) => {
            warn!(%err, path = %store.path().display(), "using default settings");
            Settings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments first (before terminal setup) so errors print cleanly
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let cache = QuizCache::new();
    let _log_guard = init_tracing(cache.as_ref());
    info!("iQuiz starting");

    let settings_store = SettingsStore::new();
    let mut settings = load_settings(settings_store.as_ref());
    config.apply(&mut settings);

    let mut store = QuizStore::new(settings, cache);
    if let Some(settings_store) = settings_store {
        store = store.with_settings_store(settings_store);
    }

    if config.list_only {
        return print_quiz_list(store).await;
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    app.store.start();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("iQuiz shutting down");
    result
}

/// Main event loop
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Fetches the catalog once, prints it, and exits
async fn print_quiz_list(mut store: QuizStore) -> Result<(), Box<dyn std::error::Error>> {
    store.load();

    if store.is_fetching() {
        match tokio::time::timeout(LIST_FETCH_TIMEOUT, store.next_message()).await {
            Ok(Some(message)) => store.handle_message(message),
            Ok(None) => {}
            Err(_) => {
                warn!("timed out waiting for the quiz feed");
                let _ = store.load_from_disk();
            }
        }
    }

    if let Some(err) = store.last_error() {
        eprintln!("Error: {}", err);
    }

    for quiz in store.quizzes() {
        println!(
            "{} {} ({} questions)\n    {}",
            quiz.icon.glyph(),
            quiz.title,
            quiz.question_count(),
            quiz.description
        );
    }

    if store.quizzes().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
