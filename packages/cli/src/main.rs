mod config;

use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use colored::Colorize;
use crossterm::{execute, terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use hcplog_tui::{App, AppOptions};

#[derive(Parser, Debug)]
#[command(name = "hcplog", about = "Log HCP interactions from the terminal", version)]
struct Cli {
    /// Backend API base URL (falls back to HCPLOG_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Event loop tick rate in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_rate: u64,

    /// Show timestamps next to chat messages
    #[arg(long)]
    timestamps: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::resolve(cli.api_url, cli.tick_rate, cli.timestamps)?;

    init_logging()?;
    info!(api_url = %config.api_url, tick_rate_ms = config.tick_rate_ms, "starting hcplog");

    println!("{}", "Starting HCP interaction logger...".green().bold());
    println!("{} {}", "Backend:".cyan(), config.api_url);

    start_tui(config).await
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("hcplog.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hcplog=info,hcplog_tui=info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn start_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(AppOptions {
        api_url: config.api_url,
        tick_rate_ms: config.tick_rate_ms,
        show_timestamps: config.show_timestamps,
    });

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Always restore the terminal, even if the app errored.
    let cleanup_result = (|| -> Result<(), Box<dyn std::error::Error>> {
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
        Ok(())
    })();

    if let Err(cleanup_error) = cleanup_result {
        eprintln!(
            "{} {}",
            "Failed to restore terminal:".red(),
            cleanup_error
        );
    }

    result.map_err(Into::into)
}
