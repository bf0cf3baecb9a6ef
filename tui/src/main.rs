//! AuraCalc TUI Entry Point
//!
//! Launches the terminal calculator with the math assistant panel.
//!
//! Usage:
//!   auracalc [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>   Configuration file (default: ~/.config/auracalc/config.toml)
//!   -m, --model <MODEL>   Override the assistant model
//!
//! Logs go to stderr, filtered by `RUST_LOG`. Redirect them when running
//! interactively: `RUST_LOG=debug auracalc 2>auracalc.log`.

use std::io;
use std::panic;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auracalc_core::{
    default_config_path, load_config_from_path, Calculator, ConfigOverrides, GeminiBackend,
};
use auracalc_tui::App;

/// AuraCalc - keypad calculator with an AI math assistant
#[derive(Parser, Debug)]
#[command(name = "auracalc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "AURACALC_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Assistant model (overrides config and AURACALC_MODEL)
    #[arg(short = 'm', long, value_name = "MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = args.config.or_else(default_config_path);
    let mut config =
        load_config_from_path(config_path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(model) = args.model {
        overrides = overrides.with_model(model);
    }
    overrides
        .apply(&mut config)
        .context("Invalid command-line override")?;

    tracing::info!(
        source = %config.source(),
        model = %config.assistant.model,
        "Configuration loaded"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: auracalc requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    let backend = GeminiBackend::from_config(&config.assistant)
        .context("Failed to create the Gemini client")?;
    if !backend.has_api_key() {
        tracing::warn!("No GEMINI_API_KEY or API_KEY set; assistant requests will fail");
    }
    let calculator = Calculator::from_config(backend, &config.assistant);
    let mut app = App::new(calculator, config.assistant.model.clone());

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
