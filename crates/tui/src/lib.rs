mod app;
pub mod config;
mod theme;
mod ui;
mod views;

use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use app::App;
use config::TxpanelConfig;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;
use txpanel_api::PlayerRef;
use txpanel_api_client::{ApiClient, ToastLog, Transport};
use txpanel_core::PlayerModal;

/// How long the loop waits for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: TxpanelConfig,
    pub reference: PlayerRef,
}

/// Open the player modal for `reference` and run until the user quits.
pub fn run(options: RunOptions) -> Result<()> {
    let RunOptions { config, reference } = options;

    // Declared first so it outlives the modal and its in-flight calls.
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let mut client = ApiClient::new(&config.server.url, config.server.timeout())
        .with_context(|| format!("failed to build client for {}", config.server.url))?;
    if let Some(token) = config.server.token() {
        client.set_auth(token.to_string());
    }

    let toasts = Arc::new(ToastLog::new());
    let modal = PlayerModal::new(
        client,
        rt.handle().clone(),
        toasts.clone(),
        Arc::new(config.admin.perms()),
        config.modal.options(),
    );
    let mut app = App::new(modal, toasts, reference);
    info!(server = %config.server.url, "opening player modal");
    app.open();

    // Terminal setup
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<T>,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key, Instant::now()) {
                info!("quit requested");
                return Ok(());
            }
        }
    }
}
