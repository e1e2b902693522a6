use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use txpanel_api::PlayerRef;
use txpanel_tui::RunOptions;
use txpanel_tui::config::{self, load_config};

#[derive(Parser)]
#[command(name = "txpanel-tui", about = "Player administration modal for a txpanel server")]
struct Cli {
    /// Server URL, overriding the config file
    #[arg(long)]
    server: Option<String>,

    /// Path to the config file (default: ~/.config/txpanel/txpanel.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open a player by license, whether online or not
    #[arg(long, conflicts_with_all = ["mutex", "netid"])]
    license: Option<String>,

    /// Server mutex of an online player
    #[arg(long, requires = "netid")]
    mutex: Option<String>,

    /// Net id of an online player on the given mutex
    #[arg(long, requires = "mutex")]
    netid: Option<u32>,

    /// Touch mode: Enter inserts a newline in notes, Ctrl+S saves
    #[arg(long)]
    touch: bool,
}

impl Cli {
    fn reference(&self) -> Result<PlayerRef> {
        match (&self.license, &self.mutex, self.netid) {
            (Some(license), _, _) => Ok(PlayerRef::license(license.clone())),
            (None, Some(mutex), Some(netid)) => Ok(PlayerRef::server(mutex.clone(), netid)),
            _ => bail!("pass --license, or --mutex together with --netid"),
        }
    }
}

/// Logs go to a file so they do not tear the alternate screen.
fn init_tracing() -> Result<()> {
    let dir = config::config_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("txpanel-tui.log");
    let file = File::create(&path).with_context(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("txpanel_tui=info,txpanel_core=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let reference = cli.reference()?;

    init_tracing()?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(server) = cli.server {
        config.server.url = server;
    }
    if cli.touch {
        config.modal.touch = true;
    }

    txpanel_tui::run(RunOptions { config, reference })
}
