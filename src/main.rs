mod app;
mod content;
mod handlers;
mod hotkeys;
mod logging;
mod prefs;
mod services;
mod sound;
mod state;
mod ui;

use app::{App, AppEvent};
use crossterm::{
    cursor::SetCursorStyle,
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use prefs::{Broadcaster, FileStore, MemoryStore, PreferenceStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use sound::SoundManager;
use state::AppConfig;
use std::{error::Error, io, time::Duration};
use tokio::sync::mpsc;
use tracing::{info, warn};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env();
    if let Err(e) = logging::init(&config) {
        eprintln!("{e}; continuing without a log file");
    }
    info!(?config, "starting");

    // Preferences are loaded before the first frame.
    let store: Box<dyn PreferenceStore> = match &config.prefs_path {
        Some(path) => Box::new(FileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let prefs = Broadcaster::load(store).shared();
    let applied = prefs.apply_overrides(&config.pref_overrides);
    if applied > 0 {
        info!(applied, "preference overrides applied");
    }
    let sound_manager = SoundManager::new(prefs.clone(), sound::device_output_factory());

    // Enable terminal raw mode
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, prefs, sound_manager, event_tx.clone());
    app.sync_consumers();

    // Spawn terminal event handler
    let input = tokio::spawn(async move {
        let mut reader = EventStream::new();
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            let event = tokio::select! {
                _ = interval.tick() => AppEvent::Tick,
                next = reader.next() => match next {
                    Some(Ok(event)) => AppEvent::Terminal(event),
                    Some(Err(e)) => {
                        warn!(error = %e, "terminal input failed");
                        break;
                    }
                    None => break,
                },
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });

    let result = run_app(&mut terminal, &mut app, &mut event_rx).await;

    // Cleanup
    app.shutdown();
    input.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), SetCursorStyle::DefaultUserShape, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("exiting");

    result
}

async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    while !app.ui.should_quit {
        if let Some(style) = app.take_cursor_change() {
            execute!(terminal.backend_mut(), ui::theme::cursor_command(style))?;
        }

        // Render UI
        terminal.draw(|f| ui::ui(f, app))?;

        // Handle events
        match event_rx.recv().await {
            Some(event) => app.handle_event(event),
            None => break,
        }
    }
    Ok(())
}
