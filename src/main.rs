use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;

use vitals::app::App;
use vitals::config::{self, Config, load_config, load_config_from_path};
use vitals::event::{Event, EventHandler};
use vitals::store::SampleStore;
use vitals::ui;

#[derive(Parser)]
#[command(
    name = "vitals",
    about = "Terminal system-usage monitor with session recording"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Append tracing output to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = load_config_for_cli(&cli);

    let db_path = cli
        .db
        .clone()
        .or_else(|| config.general.database_path.clone())
        .or_else(config::default_db_path)
        .ok_or_else(|| eyre!("no usable database location; pass --db <path>"))?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SampleStore::open(&db_path)?;

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, store).await;

    ratatui::restore();
    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: Config,
    store: SampleStore,
) -> Result<()> {
    let mut app = App::new(config, store);
    let mut events = EventHandler::new(Duration::from_secs(app.interval_secs));

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                    }
                }
                Event::Tick => app.on_tick(),
                Event::Second => app.on_second(),
                Event::Resize => {}
            }

            if let Some(rate) = app.take_pending_tick_rate() {
                events.set_tick_rate(rate);
            }

            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    // Orderly exit: the connection is released exactly once, here.
    app.close()?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(secs) = cli.interval {
        config.general.poll_interval_secs = secs;
    }

    config
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
