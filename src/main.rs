// cppvis: terminal client for a C++ token / parse tree service

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cppvis::client::HttpBackend;
use cppvis::config::{usage, Command, Config};
use cppvis::session::dispatch::Dispatcher;
use cppvis::session::Session;
use cppvis::ui::App;

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    // The terminal is in raw mode while the UI runs, so logs go to a file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "cppvis".to_string());

    let config = match Config::from_args(args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", usage(&program));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", usage(&program));
            std::process::exit(2);
        }
    };

    let source = config.initial_source().with_context(|| {
        format!(
            "cannot read '{}'",
            config.source_file.as_deref().unwrap_or(Path::new("")).display()
        )
    })?;

    init_logging(&config.log_file)?;
    info!(backend = %config.backend_url, "cppvis starting");

    let backend = Arc::new(HttpBackend::new(&config.backend_url));
    let dispatcher = Dispatcher::new(backend);
    let mut app = App::new(Session::new(source), dispatcher, config.backend_url.clone());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("cppvis exiting");
    res.context("terminal UI failed")
}
